// The controller owns one gateway connection end to end: operator login,
// the periodic session poll, the command channel for writes, and the
// reactive `SessionStore` every frontend reads from.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gatewatch_api::{GatewayClient, TlsMode, TransportConfig};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{GatewayConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::Session;
use crate::store::SessionStore;

const COMMAND_CHANNEL_SIZE: usize = 16;
const NOTICE_CHANNEL_SIZE: usize = 64;

// ── Connection state ─────────────────────────────────────────────

/// Where the gateway connection currently stands, as a watch value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Notices ──────────────────────────────────────────────────────

/// Severity of an operator notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// An operator-facing notice emitted by background work.
///
/// UI frontends subscribe and render these however they like (toast,
/// stderr line); the core never blocks on acknowledgment.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

// ── Controller ───────────────────────────────────────────────────

/// Handle to one gateway connection.
///
/// Clones share the same `Arc`'d state, so frontends and background
/// tasks all talk to the same store, channels, and HTTP client.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: GatewayConfig,
    client: GatewayClient,
    store: Arc<SessionStore>,
    connection_state: watch::Sender<ConnectionState>,
    notice_tx: broadcast::Sender<Notice>,
    /// True while at least one request this controller issued is in
    /// flight; backs the UI busy indicator.
    busy: watch::Sender<bool>,
    inflight: AtomicUsize,
    /// Sequence number attached to each refresh at issuance.
    refresh_seq: AtomicU64,
    /// Highest sequence whose snapshot has been applied. A completion
    /// with a lower sequence is stale and discarded, so overlapping
    /// refreshes can never roll the rendered state backwards.
    applied_seq: AtomicU64,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Build a controller for `config`. Nothing touches the network
    /// until [`connect()`](Self::connect).
    pub fn new(config: GatewayConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = GatewayClient::new(config.url.clone(), &transport)?;

        let store = Arc::new(SessionStore::new());
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);
        let (busy, _) = watch::channel(false);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                store,
                connection_state,
                notice_tx,
                busy,
                inflight: AtomicUsize::new(0),
                refresh_seq: AtomicU64::new(0),
                applied_seq: AtomicU64::new(0),
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        })
    }

    /// The configuration this controller was built from.
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// The reactive store holding the last applied snapshot.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the gateway.
    ///
    /// Logs in when credentials are configured, performs the initial
    /// session poll, and starts the background loops.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        if let Some(ref creds) = self.inner.config.auth {
            if let Err(e) = self
                .inner
                .client
                .login(&creds.username, &creds.password)
                .await
            {
                let _ = self.inner.connection_state.send(ConnectionState::Failed);
                return Err(e.into());
            }
            debug!("operator session established");
        }

        // Initial session load
        if let Err(e) = self.refresh().await {
            let _ = self.inner.connection_state.send(ConnectionState::Failed);
            return Err(e);
        }

        self.spawn_background_tasks().await;

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!("connected to gateway");
        Ok(())
    }

    /// Start the command loop, and the poll loop unless polling is
    /// disabled (`poll_interval_secs == 0`, one-shot CLI use).
    async fn spawn_background_tasks(&self) {
        let mut tasks = self.inner.tasks.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let cancel = self.inner.cancel.clone();
            tasks.push(tokio::spawn(command_loop(self.clone(), rx, cancel)));
        }

        let period = self.inner.config.poll_interval_secs;
        if period > 0 {
            let cancel = self.inner.cancel.clone();
            tasks.push(tokio::spawn(poll_loop(self.clone(), period, cancel)));
        }
    }

    /// Tear down: stop the poll timer and command loop, log out if a
    /// session was established, and reset the connection state.
    ///
    /// A request already in flight may still resolve afterwards; its
    /// completion only touches the store, which is harmless once every
    /// subscriber is gone.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        let mut tasks = self.inner.tasks.lock().await;
        for task in tasks.drain(..) {
            let _ = task.await;
        }

        if self.inner.config.auth.is_some() {
            if let Err(e) = self.inner.client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }

        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    // ── Session polling ──────────────────────────────────────────

    /// Fetch the current session list and apply it to the store.
    ///
    /// Safe to call while another refresh is in flight: each call gets a
    /// sequence number at issuance, and a completion older than the last
    /// applied one is discarded instead of overwriting fresher data.
    /// Failures surface through the notice channel, leave the store
    /// untouched, and are never retried -- the next scheduled or manual
    /// refresh is the recovery path.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let seq = self.inner.refresh_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let _busy = BusyGuard::raise(&self.inner);

        match self.inner.client.list_sessions().await {
            Ok(wire_sessions) => {
                if self.inner.applied_seq.fetch_max(seq, Ordering::AcqRel) > seq {
                    debug!(seq, "discarding stale session snapshot");
                    return Ok(());
                }
                let sessions: Vec<Session> =
                    wire_sessions.into_iter().map(Session::from).collect();
                debug!(count = sessions.len(), seq, "session snapshot applied");
                self.inner.store.apply_snapshot(sessions);
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "session refresh failed");
                self.notify(Notice::error(format!("Session refresh failed: {err}")));
                Err(err)
            }
        }
    }

    // ── Command execution ────────────────────────────────────────

    /// Run a write command against the gateway and wait for its result.
    ///
    /// Commands queue on the internal channel and run one at a time in
    /// the command loop.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::GatewayDisconnected);
        }

        let (tx, rx) = oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::GatewayDisconnected)?;

        rx.await.map_err(|_| CoreError::GatewayDisconnected)?
    }

    async fn process_command(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            Command::DisconnectSession { id } => {
                let label = self
                    .inner
                    .store
                    .session_by_id(&id)
                    .map_or_else(|| id.to_string(), |s| s.display_label().to_owned());

                let message = self.inner.client.disconnect_session(id.as_str()).await?;
                info!(%id, "session disconnected");

                // Exactly one refresh on success; its own failure is
                // surfaced separately and must not fail the disconnect.
                let _ = self.refresh().await;

                Ok(CommandResult::Disconnected { label, message })
            }
            Command::RefreshSheet => {
                let refresh = self.inner.client.refresh_sheet().await?;
                info!(rows = ?refresh.rows, "credential mirror refreshed");
                Ok(CommandResult::SheetRefreshed {
                    rows: refresh.rows,
                    message: refresh.message,
                })
            }
        }
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Connect, run `f`, disconnect.
    ///
    /// The shape single CLI invocations want; the periodic poll is
    /// disabled since one request-response cycle is the whole job.
    pub async fn oneshot<F, Fut, T>(config: GatewayConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval_secs = 0;

        let controller = Controller::new(cfg)?;
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── Observation ──────────────────────────────────────────────

    /// Watch the connection state.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Subscribe to operator notices.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notice_tx.subscribe()
    }

    /// Subscribe to the busy flag (true while a request is in flight).
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.inner.busy.subscribe()
    }

    fn notify(&self, notice: Notice) {
        // No receivers is fine -- the CLI reads errors from return values.
        let _ = self.inner.notice_tx.send(notice);
    }
}

// ── Busy tracking ────────────────────────────────────────────────

/// RAII guard backing the busy indicator: raised when the first request
/// starts, cleared when the last one finishes -- including on error or
/// cancellation paths.
struct BusyGuard {
    inner: Arc<ControllerInner>,
}

impl BusyGuard {
    fn raise(inner: &Arc<ControllerInner>) -> Self {
        if inner.inflight.fetch_add(1, Ordering::AcqRel) == 0 {
            let _ = inner.busy.send(true);
        }
        Self {
            inner: Arc::clone(inner),
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.inner.inflight.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _ = self.inner.busy.send(false);
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodic session poll. Fixed period, no jitter or backoff: the poll is
/// idempotent and state-replacing, so missed or late ticks are harmless
/// and simply skipped.
async fn poll_loop(controller: Controller, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick fires immediately; connect() already did that load.
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Failures are surfaced inside refresh(); the next tick
                // is the retry.
                let _ = controller.refresh().await;
            }
        }
    }
    debug!("poll loop stopped");
}

/// Drains the command channel, one command at a time.
async fn command_loop(
    controller: Controller,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = controller.process_command(envelope.command).await;
                // The caller may have stopped waiting; that's fine.
                let _ = envelope.response_tx.send(result);
            }
        }
    }
    debug!("command loop stopped");
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &GatewayConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::System => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
        cookie_jar: None,
    }
}
