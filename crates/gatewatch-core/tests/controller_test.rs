#![allow(clippy::unwrap_used)]
// Integration tests for `Controller` against a mocked gateway.
//
// The disconnect workflow's refresh discipline is asserted through
// request counting: a successful disconnect performs exactly one session
// refresh, a failed one performs none.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gatewatch_core::{
    Command, CommandResult, Controller, CoreError, GatewayConfig, NoticeLevel, SessionId,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn two_session_body() -> serde_json::Value {
    json!({
        "success": true,
        "users": [
            {
                "id": "*1A",
                "user": "5551230001",
                "address": "10.5.50.20",
                "mac_address": "AA:BB:CC:DD:EE:01",
                "uptime": "2h13m40s",
                "bytes_in": 1_048_576_u64,
                "bytes_out": 524_288_u64
            },
            {
                "id": "*1B",
                "user": "5551230002",
                "address": "10.5.50.21",
                "mac_address": "AA:BB:CC:DD:EE:02",
                "uptime": "5m2s",
                "bytes_in": 1_048_576_u64,
                "bytes_out": 524_288_u64
            }
        ]
    })
}

async fn controller_for(server: &MockServer) -> Controller {
    let mut config = GatewayConfig::new(Url::parse(&server.uri()).unwrap());
    config.poll_interval_secs = 0; // drive refreshes by hand
    Controller::new(config).unwrap()
}

// ── Connect / refresh ───────────────────────────────────────────────

#[tokio::test]
async fn connect_loads_the_initial_snapshot_and_aggregates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_session_body()))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    controller.connect().await.unwrap();

    assert_eq!(controller.store().session_count(), 2);
    let stats = controller.store().stats();
    assert_eq!(stats.connected_count, 2);
    assert_eq!(stats.total_bytes_in, 2_097_152);
    assert_eq!(stats.total_bytes_out, 1_048_576);

    controller.disconnect().await;
}

#[tokio::test]
async fn failed_refresh_keeps_the_last_snapshot_and_notifies() {
    let server = MockServer::start().await;

    // First poll succeeds, every later one reports an application failure.
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_session_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "db down" })),
        )
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    controller.connect().await.unwrap();
    let mut notices = controller.notices();

    let err = controller.refresh().await.unwrap_err();
    assert!(
        matches!(err, CoreError::Gateway { .. }),
        "expected Gateway error, got: {err:?}"
    );
    assert!(err.to_string().contains("db down"));

    // Previously rendered state is untouched.
    assert_eq!(controller.store().session_count(), 2);
    assert_eq!(controller.store().stats().connected_count, 2);

    // The failure reached the operator notice channel with the server
    // message verbatim inside.
    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("db down"));

    controller.disconnect().await;
}

// ── Disconnect workflow ─────────────────────────────────────────────

#[tokio::test]
async fn successful_disconnect_triggers_exactly_one_refresh() {
    let server = MockServer::start().await;

    // One refresh at connect, exactly one more after the disconnect.
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_session_body()))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/disconnect_user"))
        .and(body_string_contains("user_id="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "User 5551230001 has been disconnected."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    controller.connect().await.unwrap();

    let result = controller
        .execute(Command::DisconnectSession {
            id: SessionId::from("*1A"),
        })
        .await
        .unwrap();

    match result {
        CommandResult::Disconnected { label, message } => {
            assert_eq!(label, "5551230001");
            assert!(message.unwrap().contains("disconnected"));
        }
        other => panic!("expected Disconnected, got: {other:?}"),
    }

    controller.disconnect().await;
    server.verify().await;
}

#[tokio::test]
async fn failed_disconnect_performs_no_refresh() {
    let server = MockServer::start().await;

    // Only the connect-time refresh is allowed.
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_session_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/disconnect_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Failed to disconnect user from router."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    controller.connect().await.unwrap();

    let err = controller
        .execute(Command::DisconnectSession {
            id: SessionId::from("*1A"),
        })
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::Gateway { .. }),
        "expected Gateway error, got: {err:?}"
    );

    // The session state is unknown after a failed disconnect; the store
    // still holds the last good snapshot.
    assert_eq!(controller.store().session_count(), 2);

    controller.disconnect().await;
    server.verify().await;
}

// ── Sheet refresh ───────────────────────────────────────────────────

#[tokio::test]
async fn sheet_refresh_reports_rows_and_skips_the_session_poll() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_session_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/refresh_sheet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "rows": 17,
            "message": "Successfully refreshed with 17 rows of data."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    controller.connect().await.unwrap();

    match controller.execute(Command::RefreshSheet).await.unwrap() {
        CommandResult::SheetRefreshed { rows, .. } => assert_eq!(rows, Some(17)),
        other => panic!("expected SheetRefreshed, got: {other:?}"),
    }

    controller.disconnect().await;
    server.verify().await;
}

// ── Operator login ──────────────────────────────────────────────────

#[tokio::test]
async fn connect_logs_in_when_credentials_are_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .and(body_string_contains("username=admin"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/admin")
                .insert_header("set-cookie", "session=tok; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "users": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/logout"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
        .mount(&server)
        .await;

    let mut config = GatewayConfig::new(Url::parse(&server.uri()).unwrap());
    config.poll_interval_secs = 0;
    config.auth = Some(gatewatch_core::AdminCredentials {
        username: "admin".into(),
        password: "hunter2".to_string().into(),
    });

    let controller = Controller::new(config).unwrap();
    controller.connect().await.unwrap();
    assert_eq!(controller.store().session_count(), 0);

    controller.disconnect().await;
    server.verify().await;
}

#[tokio::test]
async fn connect_fails_on_bad_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let mut config = GatewayConfig::new(Url::parse(&server.uri()).unwrap());
    config.poll_interval_secs = 0;
    config.auth = Some(gatewatch_core::AdminCredentials {
        username: "admin".into(),
        password: "wrong".to_string().into(),
    });

    let controller = Controller::new(config).unwrap();
    let err = controller.connect().await.unwrap_err();
    assert!(
        matches!(err, CoreError::AuthenticationFailed { .. }),
        "expected AuthenticationFailed, got: {err:?}"
    );
}
