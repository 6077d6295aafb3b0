use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use devcare::client::{DevCareClient, PayloadShape};
use devcare::config::BackendConfig;

/// What `GET {prefix}/status` answers with
#[derive(Clone)]
pub enum StatusMode {
    Json(Value),
    Error(StatusCode),
    Malformed,
}

/// What `POST {prefix}/break` and `{prefix}/reset` answer with
#[derive(Clone, Copy)]
pub enum ActionMode {
    Success,
    Unavailable,
    Error(StatusCode),
}

pub struct FakeState {
    status: Mutex<StatusMode>,
    action: Mutex<ActionMode>,
    pub status_calls: AtomicUsize,
    pub break_calls: AtomicUsize,
    pub reset_calls: AtomicUsize,
}

impl FakeState {
    pub fn set_status(&self, mode: StatusMode) {
        *self.status.lock().unwrap() = mode;
    }

    pub fn set_action(&self, mode: ActionMode) {
        *self.action.lock().unwrap() = mode;
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn break_calls(&self) -> usize {
        self.break_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }
}

pub struct FakeBackend {
    pub addr: SocketAddr,
    pub state: Arc<FakeState>,
    prefix: String,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Current backend: nested payload under `/api`
    pub async fn nested(body: Value) -> Self {
        Self::start("/api", StatusMode::Json(body)).await
    }

    /// Legacy backend: flat payload at the root
    pub async fn flat(body: Value) -> Self {
        Self::start("", StatusMode::Json(body)).await
    }

    pub async fn start(prefix: &str, status: StatusMode) -> Self {
        let state = Arc::new(FakeState {
            status: Mutex::new(status),
            action: Mutex::new(ActionMode::Success),
            status_calls: AtomicUsize::new(0),
            break_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route(&format!("{}/status", prefix), get(status_handler))
            .route(&format!("{}/health", prefix), get(health_handler))
            .route(&format!("{}/break", prefix), post(break_handler))
            .route(&format!("{}/reset", prefix), post(reset_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            state,
            prefix: prefix.to_string(),
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Backend config pointing at this server
    pub fn config(&self, shape: PayloadShape) -> BackendConfig {
        BackendConfig {
            url: self.base_url(),
            api_prefix: self.prefix.clone(),
            payload_shape: shape,
            request_timeout_ms: 2000,
        }
    }

    pub fn client(&self, shape: PayloadShape) -> DevCareClient {
        DevCareClient::new(self.config(shape)).unwrap()
    }
}

async fn status_handler(State(state): State<Arc<FakeState>>) -> Response {
    state.status_calls.fetch_add(1, Ordering::SeqCst);
    let mode = state.status.lock().unwrap().clone();
    match mode {
        StatusMode::Json(body) => Json(body).into_response(),
        StatusMode::Error(code) => (code, "internal error").into_response(),
        StatusMode::Malformed => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "components": {"posture": true, "typing": true, "breaks": false}
    }))
}

async fn break_handler(State(state): State<Arc<FakeState>>) -> Response {
    state.break_calls.fetch_add(1, Ordering::SeqCst);
    action_response(&state, "Break recorded")
}

async fn reset_handler(State(state): State<Arc<FakeState>>) -> Response {
    state.reset_calls.fetch_add(1, Ordering::SeqCst);
    action_response(&state, "Stats reset")
}

fn action_response(state: &FakeState, message: &str) -> Response {
    let mode = *state.action.lock().unwrap();
    match mode {
        ActionMode::Success => Json(json!({"success": true, "message": message})).into_response(),
        ActionMode::Unavailable => Json(json!({
            "success": false,
            "message": "Break manager not available"
        }))
        .into_response(),
        ActionMode::Error(code) => (code, "internal error").into_response(),
    }
}

/// Nested payload as served by the current backend
pub fn nested_body(score: f64) -> Value {
    json!({
        "status": "Running",
        "posture": {"score": score, "status": "Needs improvement", "color": "orange"},
        "typing": {"speed": 180},
        "breaks": {"taken": 2, "should_break": false, "time": "34 min"},
        "stress": "Medium"
    })
}

/// Flat payload as served by the legacy backend
pub fn flat_body(score: f64) -> Value {
    json!({
        "posture": score,
        "time": "12 min",
        "stress": "High",
        "breaks_taken": 1,
        "typing_speed": 240,
        "should_break": true,
        "status": "Running"
    })
}
