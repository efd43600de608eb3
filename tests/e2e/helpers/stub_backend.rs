use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use cinema_client::domain::auth::{LoginRequest, RefreshTokenRequest, RegisterRequest, Role};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::tokens::mint_access_token;

pub const VALID_REFRESH_TOKEN: &str = "refresh-1";
pub const VALID_PASSWORD: &str = "secret";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefreshMode {
    Grant,
    Reject,
}

/// In-process stand-in for the cinema backend
pub struct StubBackend {
    pub valid_access_token: Mutex<String>,
    pub role: Mutex<Role>,
    pub refresh_mode: Mutex<RefreshMode>,
    /// Hold refresh replies until this many 401s were served (0 = reply at once)
    pub hold_refresh_until: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub rejected_requests: AtomicUsize,
    pub request_ids: Mutex<Vec<String>>,
}

type Reply = (StatusCode, Json<Value>);

impl StubBackend {
    pub fn new() -> Self {
        Self {
            valid_access_token: Mutex::new(mint_access_token(Role::Admin)),
            role: Mutex::new(Role::Admin),
            refresh_mode: Mutex::new(RefreshMode::Grant),
            hold_refresh_until: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            rejected_requests: AtomicUsize::new(0),
            request_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/api/users/refresh-token", post(refresh))
            .route("/api/users/login", post(login))
            .route("/api/users/register", post(register))
            .route("/api/movies", get(list_movies))
            .route("/api/reservations", post(create_reservation))
            .route(
                "/api/reservations/:id",
                put(update_reservation)
                    .patch(update_reservation)
                    .delete(cancel_reservation),
            )
            .route("/api/slow", get(slow_movies))
            .route("/api/always-unauthorized", get(always_unauthorized))
            .route("/api/broken", get(broken))
            .with_state(self)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn rejected_requests(&self) -> usize {
        self.rejected_requests.load(Ordering::SeqCst)
    }

    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        *self.refresh_mode.lock() = mode;
    }

    pub fn hold_refresh_until(&self, rejections: usize) {
        self.hold_refresh_until.store(rejections, Ordering::SeqCst);
    }

    pub fn current_access_token(&self) -> String {
        self.valid_access_token.lock().clone()
    }

    fn record_request_id(&self, headers: &HeaderMap) {
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.request_ids.lock().push(id.to_string());
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Reply> {
        self.record_request_id(headers);

        let presented = headers.get("x-auth-token").and_then(|v| v.to_str().ok());
        if presented == Some(self.valid_access_token.lock().as_str()) {
            return Ok(());
        }

        self.rejected_requests.fetch_add(1, Ordering::SeqCst);
        Err(unauthorized("Token expired"))
    }

    async fn wait_for_rejections(&self) {
        let target = self.hold_refresh_until.load(Ordering::SeqCst);
        if target == 0 {
            return;
        }

        for _ in 0..400 {
            if self.rejected_requests() >= target {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // Let the last rejected clients reach the coordinator
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn unauthorized(message: &str) -> Reply {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message })))
}

async fn refresh(
    State(backend): State<Arc<StubBackend>>,
    Json(request): Json<RefreshTokenRequest>,
) -> Reply {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    backend.wait_for_rejections().await;

    let mode = *backend.refresh_mode.lock();
    if mode == RefreshMode::Reject || request.refresh_token != VALID_REFRESH_TOKEN {
        return unauthorized("Invalid refresh token");
    }

    let role = *backend.role.lock();
    let token = mint_access_token(role);
    *backend.valid_access_token.lock() = token.clone();

    (StatusCode::OK, Json(json!({ "accessToken": token })))
}

async fn login(State(backend): State<Arc<StubBackend>>, Json(request): Json<LoginRequest>) -> Reply {
    if request.password != VALID_PASSWORD {
        return unauthorized("Invalid credentials");
    }

    let role = *backend.role.lock();
    let token = mint_access_token(role);
    *backend.valid_access_token.lock() = token.clone();

    (
        StatusCode::OK,
        Json(json!({ "accessToken": token, "refreshToken": VALID_REFRESH_TOKEN })),
    )
}

async fn register(Json(request): Json<RegisterRequest>) -> Reply {
    if request.email.contains("blocked") {
        return unauthorized("Registration not allowed");
    }

    (StatusCode::CREATED, Json(json!({ "email": request.email })))
}

async fn list_movies(State(backend): State<Arc<StubBackend>>, headers: HeaderMap) -> Reply {
    if let Err(reply) = backend.authorize(&headers) {
        return reply;
    }

    (
        StatusCode::OK,
        Json(json!([
            { "id": "m-1", "title": "Metropolis" },
            { "id": "m-2", "title": "Stalker" }
        ])),
    )
}

async fn create_reservation(
    State(backend): State<Arc<StubBackend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(reply) = backend.authorize(&headers) {
        return reply;
    }

    (StatusCode::CREATED, Json(json!({ "id": "r-1", "request": body })))
}

async fn update_reservation(
    State(backend): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(reply) = backend.authorize(&headers) {
        return reply;
    }

    (StatusCode::OK, Json(json!({ "id": id, "request": body })))
}

async fn cancel_reservation(
    State(backend): State<Arc<StubBackend>>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    match backend.authorize(&headers) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err((status, _)) => status,
    }
}

/// Checks the token only after a delay, so its 401 can land after a refresh finished
async fn slow_movies(State(backend): State<Arc<StubBackend>>, headers: HeaderMap) -> Reply {
    tokio::time::sleep(Duration::from_millis(300)).await;
    list_movies(State(backend), headers).await
}

async fn always_unauthorized(State(backend): State<Arc<StubBackend>>, headers: HeaderMap) -> Reply {
    backend.record_request_id(&headers);
    backend.rejected_requests.fetch_add(1, Ordering::SeqCst);
    unauthorized("Not allowed")
}

async fn broken() -> Reply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Database unavailable" })),
    )
}
