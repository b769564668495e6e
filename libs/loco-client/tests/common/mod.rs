//! Shared scaffolding: a scriptable in-process platform API.
//!
//! Boots a real axum server on an ephemeral port; tests flip the knobs on
//! [`ApiState`] to simulate token expiry, refresh failure, judge verdicts,
//! and pushed notifications.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use loco_client::config::Config;
use loco_client::LocoClient;

pub struct ApiState {
    pub refresh_calls: AtomicUsize,
    pub data_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub submission_calls: AtomicUsize,
    pub stream_opens: AtomicUsize,
    /// Protected endpoints answer 401 while false.
    pub token_valid: AtomicBool,
    /// When true, `/auth/refresh` answers 401.
    pub refresh_fails: AtomicBool,
    /// When false, a "successful" refresh does not actually make the token
    /// valid again — the replayed request will 401 a second time.
    pub refresh_grants_token: AtomicBool,
    /// When true, `/auth/login` answers 401.
    pub login_fails: AtomicBool,
    /// When true, `/widgets` answers 500.
    pub data_fails: AtomicBool,
    /// Server-side latency of the refresh call, to widen race windows.
    pub refresh_delay: Mutex<Duration>,
    /// Scripted submission statuses, consumed per poll (last one repeats).
    pub statuses: Mutex<VecDeque<&'static str>>,
    /// Live handle into the open notification stream, if any.
    notify_tx: Mutex<Option<mpsc::UnboundedSender<Bytes>>>,
}

impl Default for ApiState {
    fn default() -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            data_calls: AtomicUsize::new(0),
            me_calls: AtomicUsize::new(0),
            submission_calls: AtomicUsize::new(0),
            stream_opens: AtomicUsize::new(0),
            token_valid: AtomicBool::new(true),
            refresh_fails: AtomicBool::new(false),
            refresh_grants_token: AtomicBool::new(true),
            login_fails: AtomicBool::new(false),
            data_fails: AtomicBool::new(false),
            refresh_delay: Mutex::new(Duration::ZERO),
            statuses: Mutex::new(VecDeque::new()),
            notify_tx: Mutex::new(None),
        }
    }
}

impl ApiState {
    /// Push a raw SSE frame into the open stream.
    pub fn push_raw(&self, frame: &[u8]) -> bool {
        match self.notify_tx.lock().as_ref() {
            Some(tx) => tx.send(Bytes::copy_from_slice(frame)).is_ok(),
            None => false,
        }
    }

    /// Push one well-formed `data:` event.
    pub fn push_event(&self, payload: &Value) -> bool {
        self.push_raw(format!("data: {payload}\n\n").as_bytes())
    }

    pub fn script_statuses(&self, statuses: &[&'static str]) {
        *self.statuses.lock() = statuses.iter().copied().collect();
    }
}

pub fn test_user() -> Value {
    json!({
        "id": 1,
        "email": "alice@test.io",
        "username": "alice",
        "role": "user",
        "email_verified": true,
        "total_xp": 120,
        "level": 2,
        "created_at": "2026-01-01T00:00:00Z",
    })
}

fn submission_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "problem_id": 7,
        "language_id": 2,
        "status": status,
        "runtime": 12,
        "memory": 2048,
        "passed_test_cases": 3,
        "total_test_cases": 5,
        "created_at": "2026-08-01T12:00:00Z",
    })
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"}))).into_response()
}

async fn login(State(state): State<Arc<ApiState>>) -> Response {
    if state.login_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid credentials"})),
        )
            .into_response();
    }
    state.token_valid.store(true, Ordering::SeqCst);
    Json(json!({"message": "login successful", "user": test_user()})).into_response()
}

async fn logout(State(state): State<Arc<ApiState>>) -> Response {
    state.token_valid.store(false, Ordering::SeqCst);
    Json(json!({"message": "logged out"})).into_response()
}

async fn refresh(State(state): State<Arc<ApiState>>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = *state.refresh_delay.lock();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if state.refresh_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "refresh token expired"})),
        )
            .into_response();
    }
    if state.refresh_grants_token.load(Ordering::SeqCst) {
        state.token_valid.store(true, Ordering::SeqCst);
    }
    Json(json!({"message": "refreshed"})).into_response()
}

async fn me(State(state): State<Arc<ApiState>>) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    if !state.token_valid.load(Ordering::SeqCst) {
        return unauthorized();
    }
    Json(test_user()).into_response()
}

async fn widgets(State(state): State<Arc<ApiState>>) -> Response {
    state.data_calls.fetch_add(1, Ordering::SeqCst);
    if state.data_fails.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))).into_response();
    }
    if !state.token_valid.load(Ordering::SeqCst) {
        return unauthorized();
    }
    Json(json!({"widgets": []})).into_response()
}

async fn create_submission(
    State(state): State<Arc<ApiState>>,
    Path(_problem_id): Path<i64>,
) -> Response {
    if !state.token_valid.load(Ordering::SeqCst) {
        return unauthorized();
    }
    Json(json!({"data": submission_json(42, "Pending")})).into_response()
}

async fn submission(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Response {
    state.submission_calls.fetch_add(1, Ordering::SeqCst);
    if !state.token_valid.load(Ordering::SeqCst) {
        return unauthorized();
    }
    let status = {
        let mut script = state.statuses.lock();
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().copied()
        }
    }
    .unwrap_or("Pending");
    Json(json!({"data": submission_json(id, status)})).into_response()
}

async fn notifications_stream(State(state): State<Arc<ApiState>>) -> Response {
    state.stream_opens.fetch_add(1, Ordering::SeqCst);
    let (tx, rx) = mpsc::unbounded_channel::<Bytes>();
    // The platform greets every stream with a connected event.
    let _ = tx.send(Bytes::from_static(b"data: {\"type\":\"connected\"}\n\n"));
    state.notify_tx.lock().replace(tx);

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|bytes| (Ok::<_, std::convert::Infallible>(bytes), rx))
    });
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .expect("stream response")
}

fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
        .route("/widgets", get(widgets))
        .route("/problems/{id}/submissions", post(create_submission))
        .route("/submissions/{id}", get(submission))
        .route("/notifications/stream", get(notifications_stream))
        .with_state(state)
}

/// Boot the API on an ephemeral port. The server runs in the background.
pub async fn start_api() -> (SocketAddr, Arc<ApiState>) {
    let state = Arc::new(ApiState::default());
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (addr, state)
}

/// A client pointed at the test API, with intervals shrunk so suites run in
/// milliseconds.
pub fn test_client(addr: SocketAddr) -> LocoClient {
    let mut config = Config::with_base_url(format!("http://{addr}"));
    config.poll_interval = Duration::from_millis(20);
    config.notify_debounce = Duration::from_millis(30);
    LocoClient::new(config).expect("client")
}

/// Poll `cond` until it holds or the timeout passes.
pub async fn wait_until(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
