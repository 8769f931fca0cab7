// Customer HTTP routes
// Decision: Sign-up is public; listing users is admin only

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use storefront_core::{Role, User};

use super::common::{ApiError, ErrorResponse, ListQuery, ListResponse};
use super::users::{CustomerResponse, SignUpRequest, UsersState};
use crate::auth::middleware::AdminUser;

/// Create customer routes
pub fn routes(state: UsersState) -> Router {
    Router::new()
        .route("/customer/signUp", post(sign_up_customer))
        .route("/customer/list", get(list_customers))
        .with_state(state)
}

/// POST /customer/signUp - Register a customer
#[utoipa::path(
    post,
    path = "/customer/signUp",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn sign_up_customer(
    State(state): State<UsersState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    req.validate()?;
    let customer = state.service.sign_up(Role::Customer, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            message: "Customer created successfully".to_string(),
            customer,
        }),
    ))
}

/// GET /customer/list - List users
///
/// Lists customers by default; pass `role=admin` to list admins instead.
#[utoipa::path(
    get,
    path = "/customer/list",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of users", body = ListResponse<User>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<UsersState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<User>>, ApiError> {
    query.validate()?;
    let role = query.role.unwrap_or(Role::Customer);
    let list = state.service.list(Some(role), &query).await?;

    Ok(Json(ListResponse::new("Customer list", list)))
}
