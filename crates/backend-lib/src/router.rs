// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Thin HTTP adapter over the authentication facade.
//!
//! The routing layer owns nothing: it validates input shape, calls the
//! facade, and maps `Rejected` to the uniform invalid-credentials
//! response.
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::service::AuthOutcome;
use crate::validation;
use crate::AppState;
use examseat_common::{
    LoginRequest, LoginResponse, RememberLookup, RememberLookupResponse, SessionStatus,
};

/// Header carrying the opaque session identifier.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Create the HTTP router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/session", get(session_status))
        .route("/api/remember", post(remember_lookup))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = validation::validate_identifier(&req.email)?.to_string();
    validation::validate_secret_present(&req.password)?;

    match state
        .auth
        .authenticate(&email, &req.password, req.subject_kind)
        .await?
    {
        AuthOutcome::Granted(grant) => {
            let remember_token = if req.remember_me {
                Some(state.auth.issue_remember_token(&email).await?)
            } else {
                None
            };
            Ok(Json(LoginResponse {
                session_id: grant.session_id,
                role: grant.role,
                display_name: grant.display_name,
                remember_token,
            }))
        },
        AuthOutcome::Rejected => Err(AppError::InvalidCredential),
    }
}

async fn session_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<SessionStatus> {
    let session = match session_token(&headers) {
        Some(token) => state.auth.resolve_session(token).await,
        None => None,
    };
    Json(SessionStatus {
        authenticated: session.is_some(),
        session,
    })
}

async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = session_token(&headers) {
        state.auth.terminate_session(token).await;
    }
    StatusCode::NO_CONTENT
}

async fn remember_lookup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RememberLookup>,
) -> Json<RememberLookupResponse> {
    let email = state.auth.resolve_remember_token(&req.token).await;
    Json(RememberLookupResponse { email })
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
}
