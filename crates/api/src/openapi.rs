// OpenAPI specification generation
//
// Used by the API server (Swagger UI) and the export-openapi binary.

use crate::api::{
    self,
    cart::{AddCartItemRequest, CartResponse, UpdateCartItemRequest},
    common::{ErrorResponse, ListResponse, MessageResponse},
    orders::{CreateOrderRequest, OrderItemRequest, OrderResponse, UpdateOrderStatusRequest},
    products::{CreateProductRequest, ProductResponse, UpdateProductRequest},
    users::{AdminResponse, CustomerResponse, SignUpRequest, UpdateUserRequest},
};
use crate::auth::routes::{LoginRequest, LoginResponse};
use storefront_core::{
    Cart, LineItem, Order, OrderStatus, Page, PaymentMethod, PaymentStatus, Product,
    ProductStatus, Role, SessionPayload, ShippingAddress, SortOrder, User, UserStatus,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Storefront API
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::routes::login,
        crate::auth::routes::logout,
        crate::auth::routes::me,
        api::customers::sign_up_customer,
        api::customers::list_customers,
        api::admins::sign_up_admin,
        api::admins::list_admins,
        api::admins::get_admin,
        api::admins::update_admin,
        api::admins::delete_admin,
        api::products::create_product,
        api::products::list_products,
        api::products::get_product,
        api::products::update_product,
        api::products::delete_product,
        api::cart::add_cart_item,
        api::cart::list_cart_items,
        api::cart::get_cart_item,
        api::cart::update_cart_item,
        api::cart::remove_cart_item,
        api::orders::create_order,
        api::orders::list_orders,
        api::orders::get_order,
        api::orders::update_order_status,
        api::orders::cancel_order,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            LoginRequest,
            LoginResponse,
            SessionPayload,
            Role,
            User,
            UserStatus,
            SignUpRequest,
            UpdateUserRequest,
            CustomerResponse,
            AdminResponse,
            Product,
            ProductStatus,
            CreateProductRequest,
            UpdateProductRequest,
            ProductResponse,
            Cart,
            LineItem,
            AddCartItemRequest,
            UpdateCartItemRequest,
            CartResponse,
            Order,
            OrderStatus,
            PaymentMethod,
            PaymentStatus,
            ShippingAddress,
            OrderItemRequest,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            OrderResponse,
            SortOrder,
            ListResponse<User>,
            ListResponse<Product>,
            ListResponse<Order>,
            Page<User>,
            Page<Product>,
            Page<Order>,
        )
    ),
    tags(
        (name = "auth", description = "Login and session endpoints"),
        (name = "customers", description = "Customer registration and listing"),
        (name = "admins", description = "Admin account management"),
        (name = "products", description = "Product catalog"),
        (name = "cart", description = "Shopping cart of the current customer"),
        (name = "orders", description = "Order placement and fulfilment")
    ),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "API for customers, products, carts and orders",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_routes() {
        let json = ApiDoc::to_json().unwrap();
        let spec: serde_json::Value = serde_json::from_str(&json).unwrap();
        let paths = spec["paths"].as_object().unwrap();

        for path in [
            "/auth/login",
            "/customer/signUp",
            "/admin/{id}",
            "/product/list",
            "/cart/items/{item_id}",
            "/order/{id}/status",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
        assert!(spec["components"]["schemas"]["LoginResponse"].is_object());
    }
}
