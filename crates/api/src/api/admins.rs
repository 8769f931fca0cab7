// Admin account HTTP routes
// Decision: Every admin route, sign-up included, requires an admin session.
// The first admin comes from AUTH_ADMIN_EMAIL / AUTH_ADMIN_PASSWORD.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use storefront_core::{Role, User, UserStatus};
use uuid::Uuid;

use super::common::{ApiError, ErrorResponse, ListQuery, ListResponse};
use super::users::{AdminResponse, SignUpRequest, UpdateUserRequest, UsersState};
use crate::auth::middleware::AdminUser;

/// Create admin routes
pub fn routes(state: UsersState) -> Router {
    Router::new()
        .route("/admin/signUp", post(sign_up_admin))
        .route("/admin/list", get(list_admins))
        .route(
            "/admin/:id",
            get(get_admin).put(update_admin).delete(delete_admin),
        )
        .with_state(state)
}

/// POST /admin/signUp - Register an admin
#[utoipa::path(
    post,
    path = "/admin/signUp",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Admin created", body = AdminResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "admins"
)]
pub async fn sign_up_admin(
    State(state): State<UsersState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AdminResponse>), ApiError> {
    req.validate()?;
    let created = state.service.sign_up(Role::Admin, req).await?;
    tracing::info!(created_by = %admin.id, user_id = %created.id, "Admin account created");

    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            message: "Admin created successfully".to_string(),
            admin: created,
        }),
    ))
}

/// GET /admin/list - List admins
#[utoipa::path(
    get,
    path = "/admin/list",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of admins", body = ListResponse<User>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "admins"
)]
pub async fn list_admins(
    State(state): State<UsersState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<User>>, ApiError> {
    query.validate()?;
    let list = state.service.list(Some(Role::Admin), &query).await?;
    Ok(Json(ListResponse::new("Admin list", list)))
}

/// GET /admin/{id} - Get an admin
#[utoipa::path(
    get,
    path = "/admin/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin found", body = User),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    tag = "admins"
)]
pub async fn get_admin(
    State(state): State<UsersState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.service.get(id, Role::Admin).await?))
}

/// PUT /admin/{id} - Update an admin
#[utoipa::path(
    put,
    path = "/admin/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Admin updated", body = AdminResponse),
        (status = 400, description = "Invalid input, or an admin deactivating themselves", body = ErrorResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    tag = "admins"
)]
pub async fn update_admin(
    State(state): State<UsersState>,
    AdminUser(current): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<AdminResponse>, ApiError> {
    req.validate()?;
    // Same rule as DELETE: no locking yourself out through a status change
    if current.id == id && matches!(req.status, Some(status) if status != UserStatus::Active) {
        return Err(ErrorResponse::new("Admins cannot deactivate themselves")
            .into_response(StatusCode::BAD_REQUEST));
    }
    let admin = state.service.update(id, Role::Admin, req).await?;

    Ok(Json(AdminResponse {
        message: "Admin updated successfully".to_string(),
        admin,
    }))
}

/// DELETE /admin/{id} - Soft-delete an admin
#[utoipa::path(
    delete,
    path = "/admin/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin deleted", body = AdminResponse),
        (status = 400, description = "Admins cannot delete themselves", body = ErrorResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    tag = "admins"
)]
pub async fn delete_admin(
    State(state): State<UsersState>,
    AdminUser(current): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminResponse>, ApiError> {
    if current.id == id {
        return Err(ErrorResponse::new("Admins cannot delete themselves")
            .into_response(StatusCode::BAD_REQUEST));
    }
    let admin = state.service.delete(id, Role::Admin).await?;

    Ok(Json(AdminResponse {
        message: "Admin deleted successfully".to_string(),
        admin,
    }))
}
