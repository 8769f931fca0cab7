// Cart HTTP routes
// Decision: Only customers have carts; the cart is always the caller's own

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_core::{Cart, LineItem};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ApiError, ErrorResponse};
use super::validation::validate_quantity;
use crate::auth::middleware::CustomerUser;
use crate::services::CartService;

/// Request to add a product to the cart
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    #[schema(example = 1)]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Request to change the quantity of a cart line
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    #[schema(example = 2)]
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    #[schema(example = "Item added to cart")]
    pub message: String,
    pub cart: Cart,
}

/// App state for cart routes
#[derive(Clone)]
pub struct CartState {
    pub service: Arc<CartService>,
}

/// Create cart routes
pub fn routes(state: CartState) -> Router {
    Router::new()
        .route("/cart/items", get(list_cart_items).post(add_cart_item))
        .route(
            "/cart/items/:item_id",
            get(get_cart_item)
                .put(update_cart_item)
                .delete(remove_cart_item),
        )
        .with_state(state)
}

/// POST /cart/items - Add a product to the cart
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 201, description = "Item added", body = CartResponse),
        (status = 400, description = "Invalid quantity or insufficient stock", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Customer access required"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "cart"
)]
pub async fn add_cart_item(
    State(state): State<CartState>,
    CustomerUser(user): CustomerUser,
    Json(req): Json<AddCartItemRequest>,
) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    validate_quantity(req.quantity)?;
    let (cart, _line) = state
        .service
        .add_item(user.id, req.product_id, req.quantity)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CartResponse {
            message: "Item added to cart".to_string(),
            cart,
        }),
    ))
}

/// GET /cart/items - The caller's cart
#[utoipa::path(
    get,
    path = "/cart/items",
    responses(
        (status = 200, description = "Current cart", body = Cart),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Customer access required")
    ),
    tag = "cart"
)]
pub async fn list_cart_items(
    State(state): State<CartState>,
    CustomerUser(user): CustomerUser,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.service.get(user.id).await?))
}

/// GET /cart/items/{item_id} - One cart line
#[utoipa::path(
    get,
    path = "/cart/items/{item_id}",
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Cart item", body = LineItem),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    tag = "cart"
)]
pub async fn get_cart_item(
    State(state): State<CartState>,
    CustomerUser(user): CustomerUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<LineItem>, ApiError> {
    Ok(Json(state.service.get_item(user.id, item_id).await?))
}

/// PUT /cart/items/{item_id} - Change a line's quantity
#[utoipa::path(
    put,
    path = "/cart/items/{item_id}",
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Cart updated", body = CartResponse),
        (status = 400, description = "Invalid quantity", body = ErrorResponse),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    tag = "cart"
)]
pub async fn update_cart_item(
    State(state): State<CartState>,
    CustomerUser(user): CustomerUser,
    Path(item_id): Path<Uuid>,
    Json(req): Json<UpdateCartItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    validate_quantity(req.quantity)?;
    let cart = state
        .service
        .update_item(user.id, item_id, req.quantity)
        .await?;

    Ok(Json(CartResponse {
        message: "Cart updated".to_string(),
        cart,
    }))
}

/// DELETE /cart/items/{item_id} - Remove a line
#[utoipa::path(
    delete,
    path = "/cart/items/{item_id}",
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Item removed", body = CartResponse),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    ),
    tag = "cart"
)]
pub async fn remove_cart_item(
    State(state): State<CartState>,
    CustomerUser(user): CustomerUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state.service.remove_item(user.id, item_id).await?;

    Ok(Json(CartResponse {
        message: "Item removed from cart".to_string(),
        cart,
    }))
}
