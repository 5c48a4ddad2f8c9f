#![allow(clippy::unwrap_used)]
// Integration tests for `GatewayClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gatewatch_api::{Error, GatewayClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GatewayClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GatewayClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_on_redirect() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .and(body_string_contains("username=admin"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/admin")
                .insert_header("set-cookie", "session=abc123; Path=/"),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    client.login("admin", &secret).await.unwrap();
}

#[tokio::test]
async fn test_login_failure_rerenders_form() {
    let (server, client) = setup().await;

    // Bad credentials: the gateway re-renders the login page with HTTP 200.
    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong-password".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_api_redirect_means_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/admin/login"))
        .mount(&server)
        .await;

    let result = client.list_sessions().await;

    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

// ── Session list tests ──────────────────────────────────────────────

#[tokio::test]
async fn test_list_sessions() {
    let (server, client) = setup().await;

    let envelope = json!({
        "success": true,
        "users": [
            {
                "id": "*1A",
                "user": "5551230001",
                "address": "10.5.50.20",
                "mac_address": "AA:BB:CC:DD:EE:01",
                "uptime": "2h13m40s",
                "bytes_in": 1_048_576_u64,
                "bytes_out": "524288"
            },
            {
                "id": "*1B",
                "user": "5551230002",
                "address": "10.5.50.21",
                "mac_address": "AA:BB:CC:DD:EE:02",
                "uptime": "5m2s"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let sessions = client.list_sessions().await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, "*1A");
    assert_eq!(sessions[0].bytes_in, 1_048_576);
    assert_eq!(sessions[0].bytes_out, 524_288);
    // Counters absent on the second entry default to zero.
    assert_eq!(sessions[1].bytes_in, 0);
    assert_eq!(sessions[1].bytes_out, 0);
}

#[tokio::test]
async fn test_list_sessions_gateway_failure_is_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "db down" })),
        )
        .mount(&server)
        .await;

    match client.list_sessions().await {
        Err(Error::Gateway { ref message }) => {
            assert_eq!(message, "db down");
        }
        other => panic!("expected Gateway error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_sessions_unparseable_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_sessions().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Disconnect tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_disconnect_session_posts_form_encoded_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/disconnect_user"))
        .and(body_string_contains("user_id=800001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "User 5551230001 has been disconnected."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = client.disconnect_session("800001").await.unwrap();
    assert_eq!(
        message.as_deref(),
        Some("User 5551230001 has been disconnected.")
    );
}

#[tokio::test]
async fn test_disconnect_session_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/disconnect_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Failed to disconnect user from router."
        })))
        .mount(&server)
        .await;

    match client.disconnect_session("*9").await {
        Err(Error::Gateway { ref message }) => {
            assert!(message.contains("Failed to disconnect"));
        }
        other => panic!("expected Gateway error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_disconnect_error_body_with_http_400() {
    let (server, client) = setup().await;

    // Some gateway error paths pair the JSON envelope with a 4xx status;
    // the server message must still come through.
    Mock::given(method("POST"))
        .and(path("/api/disconnect_user"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "No user specified."
        })))
        .mount(&server)
        .await;

    match client.disconnect_session("").await {
        Err(Error::Gateway { ref message }) => {
            assert_eq!(message, "No user specified.");
        }
        other => panic!("expected Gateway error, got: {other:?}"),
    }
}

// ── Sheet refresh tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_sheet_reports_rows() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/refresh_sheet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "rows": 42,
            "message": "Successfully refreshed with 42 rows of data."
        })))
        .mount(&server)
        .await;

    let refresh = client.refresh_sheet().await.unwrap();
    assert_eq!(refresh.rows, Some(42));
    assert!(refresh.message.unwrap().contains("42 rows"));
}

#[tokio::test]
async fn test_refresh_sheet_failure_prefers_error_over_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/refresh_sheet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "authentication failed",
            "message": "The mirror could not be refreshed."
        })))
        .mount(&server)
        .await;

    match client.refresh_sheet().await {
        Err(Error::Gateway { ref message }) => {
            assert_eq!(message, "authentication failed");
        }
        other => panic!("expected Gateway error, got: {other:?}"),
    }
}
