// Order HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_core::{Order, OrderStatus, PaymentMethod, ShippingAddress};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ApiError, ErrorResponse, ListQuery, ListResponse};
use super::validation::{validate_order_lines, validate_quantity, ValidationError};
use crate::auth::middleware::{AdminUser, AuthUser};
use crate::services::{order::Requester, OrderService};

/// One product line of an order request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    #[schema(example = 1)]
    pub quantity: u32,
}

/// Request to place an order
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Lines to order. When empty, the caller's cart is checked out.
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_order_lines(self.items.len())?;
        for item in &self.items {
            validate_quantity(item.quantity)?;
        }
        Ok(())
    }
}

/// Request to move an order to a new status
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    #[schema(example = "Order created successfully")]
    pub message: String,
    pub order: Order,
}

/// App state for order routes
#[derive(Clone)]
pub struct OrdersState {
    pub service: Arc<OrderService>,
}

/// Create order routes
pub fn routes(state: OrdersState) -> Router {
    Router::new()
        .route("/order", post(create_order))
        .route("/order/list", get(list_orders))
        .route("/order/:id", get(get_order).delete(cancel_order))
        .route("/order/:id/status", put(update_order_status))
        .with_state(state)
}

fn requester(user: &AuthUser) -> Requester {
    Requester {
        user_id: user.id,
        is_admin: user.is_admin(),
    }
}

/// POST /order - Place an order
#[utoipa::path(
    post,
    path = "/order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid order", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<OrdersState>,
    user: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    req.validate()?;
    let order = state.service.create(user.id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order created successfully".to_string(),
            order,
        }),
    ))
}

/// GET /order/list - Orders visible to the caller
///
/// Customers see their own orders; admins see all.
#[utoipa::path(
    get,
    path = "/order/list",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of orders", body = ListResponse<Order>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<OrdersState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Order>>, ApiError> {
    query.validate()?;
    let list = state.service.list(requester(&user), &query).await?;
    Ok(Json(ListResponse::new("Order list", list)))
}

/// GET /order/{id} - Get an order
#[utoipa::path(
    get,
    path = "/order/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<OrdersState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.service.get(id, requester(&user)).await?))
}

/// PUT /order/{id}/status - Change an order's status
#[utoipa::path(
    put,
    path = "/order/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Transition not allowed", body = ErrorResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<OrdersState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.service.update_status(id, req.status).await?;

    Ok(Json(OrderResponse {
        message: "Order status updated".to_string(),
        order,
    }))
}

/// DELETE /order/{id} - Cancel an order
#[utoipa::path(
    delete,
    path = "/order/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order canceled", body = OrderResponse),
        (status = 400, description = "Order can no longer be canceled", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    State(state): State<OrdersState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.service.cancel(id, requester(&user)).await?;

    Ok(Json(OrderResponse {
        message: "Order canceled".to_string(),
        order,
    }))
}
