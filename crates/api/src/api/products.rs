// Product catalog HTTP routes
// Decision: Reads are public and show ACTIVE products; admins also see the rest
// Decision: Writes are admin only

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_core::{Product, ProductStatus};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ApiError, ErrorResponse, ListQuery, ListResponse};
use super::validation::{validate_name, validate_price, validate_text, ValidationError};
use crate::auth::middleware::{AdminUser, OptionalAuthUser};
use crate::services::ProductService;

/// Request to create a product
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Stoneware Mug")]
    pub product_name: String,
    #[serde(default)]
    #[schema(example = "350 ml, dishwasher safe")]
    pub product_description: Option<String>,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
    #[schema(example = 12.0)]
    pub original_price: f64,
    #[serde(default)]
    #[schema(example = 2.0)]
    pub discount_price: f64,
    /// Price charged at checkout
    #[schema(example = 10.0)]
    pub selling_price: f64,
    /// Units in stock
    #[schema(example = 100)]
    pub quantity: u32,
    #[serde(default = "default_unit_of_measure")]
    pub unit_of_measure: u32,
    /// Harmonized System code
    #[serde(default)]
    pub hsn_code: Option<String>,
}

fn default_unit_of_measure() -> u32 {
    1
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("product_name", &self.product_name)?;
        validate_text(self.product_description.as_deref())?;
        validate_text(self.image.as_deref())?;
        validate_text(self.hsn_code.as_deref())?;
        validate_price("original_price", self.original_price)?;
        validate_price("discount_price", self.discount_price)?;
        validate_price("selling_price", self.selling_price)?;
        Ok(())
    }
}

/// Request to update a product. Only provided fields are updated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub selling_price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit_of_measure: Option<u32>,
    #[serde(default)]
    pub hsn_code: Option<String>,
    /// Set to SUSPENDED to hide a product without deleting it
    #[serde(default)]
    pub status: Option<ProductStatus>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.product_name {
            validate_name("product_name", name)?;
        }
        validate_text(self.product_description.as_deref())?;
        validate_text(self.image.as_deref())?;
        validate_text(self.hsn_code.as_deref())?;
        for (field, value) in [
            ("original_price", self.original_price),
            ("discount_price", self.discount_price),
            ("selling_price", self.selling_price),
        ] {
            if let Some(value) = value {
                validate_price(field, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = "Product created successfully")]
    pub message: String,
    pub product: Product,
}

/// App state for product routes
#[derive(Clone)]
pub struct ProductsState {
    pub service: Arc<ProductService>,
}

/// Create product routes
pub fn routes(state: ProductsState) -> Router {
    Router::new()
        .route("/product", post(create_product))
        .route("/product/list", get(list_products))
        .route(
            "/product/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

fn is_admin(user: &OptionalAuthUser) -> bool {
    user.0.as_ref().is_some_and(|u| u.is_admin())
}

/// POST /product - Create a product
#[utoipa::path(
    post,
    path = "/product",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<ProductsState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    req.validate()?;
    let product = state.service.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

/// GET /product/list - List products
#[utoipa::path(
    get,
    path = "/product/list",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of products", body = ListResponse<Product>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<ProductsState>,
    user: OptionalAuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Product>>, ApiError> {
    query.validate()?;
    let list = state.service.list(&query, is_admin(&user)).await?;
    Ok(Json(ListResponse::new("Product list", list)))
}

/// GET /product/{id} - Get a product
#[utoipa::path(
    get,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<ProductsState>,
    user: OptionalAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.service.get(id, is_admin(&user)).await?))
}

/// PUT /product/{id} - Update a product
#[utoipa::path(
    put,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<ProductsState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    req.validate()?;
    let product = state.service.update(id, req).await?;

    Ok(Json(ProductResponse {
        message: "Product updated successfully".to_string(),
        product,
    }))
}

/// DELETE /product/{id} - Soft-delete a product
#[utoipa::path(
    delete,
    path = "/product/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ProductResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<ProductsState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.service.delete(id).await?;

    Ok(Json(ProductResponse {
        message: "Product deleted successfully".to_string(),
        product,
    }))
}
