// Authentication HTTP routes
// Decision: Tokens are stateless, so logout only acknowledges; the client drops the token
// Decision: Every login failure answers 401 with the same message

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_core::{SessionIssuer, SessionPayload};
use utoipa::ToSchema;

use super::middleware::AuthUser;
use crate::api::common::{ApiError, ErrorResponse, MessageResponse};
use crate::services::{ServiceError, UserService};

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
}

/// Login response carrying the access token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successfully")]
    pub message: String,
    /// Opaque token for the Authorization header
    pub token: String,
}

/// App state for auth routes
#[derive(Clone)]
pub struct AuthRoutesState {
    pub users: Arc<UserService>,
    pub issuer: Arc<SessionIssuer>,
}

/// Create auth routes
pub fn routes(state: AuthRoutesState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .with_state(state)
}

/// POST /auth/login - Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthRoutesState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.users.authenticate(&req.email, &req.password).await?;

    let token = state.issuer.issue(&user.identity()).map_err(|e| {
        tracing::error!(error = %e, user_id = %user.id, "Failed to issue token");
        ServiceError::Internal(e.into())
    })?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(Json(LoginResponse {
        message: "Login successfully".to_string(),
        token,
    }))
}

/// POST /auth/logout - End the session on the client
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logout successfully"))
}

/// GET /auth/me - Claims of the current session
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current session", body = SessionPayload),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(user: AuthUser) -> Json<SessionPayload> {
    Json(SessionPayload {
        id: user.id.to_string(),
        email: user.email,
        role: user.role,
        expiry: user.expiry,
    })
}
