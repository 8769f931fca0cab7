// Application wiring: services, router, layers
// Decision: Health and docs sit outside the API prefix and the auth layer

use anyhow::Result;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use storefront_core::SessionIssuer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::auth::{self, AuthConfig, AuthState};
use crate::config::ServerConfig;
use crate::openapi::ApiDoc;
use crate::services::{CartService, OrderService, ProductService, UserService};
use crate::storage::Database;

/// Everything the routes need, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub issuer: Arc<SessionIssuer>,
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
    pub carts: Arc<CartService>,
    pub orders: Arc<OrderService>,
}

impl AppState {
    pub fn new(auth_config: &AuthConfig) -> Result<Self> {
        let db = Arc::new(Database::new());
        let issuer = Arc::new(auth_config.session_issuer()?);
        let hasher = auth_config.credential_hasher()?;

        let users = Arc::new(UserService::new(db.clone(), hasher));
        let products = Arc::new(ProductService::new(db.clone()));
        let carts = Arc::new(CartService::new(db.clone(), products.clone()));
        let orders = Arc::new(OrderService::new(
            db.clone(),
            products.clone(),
            carts.clone(),
        ));

        Ok(Self {
            db,
            issuer,
            users,
            products,
            carts,
            orders,
        })
    }

    /// Seed the configured admin account, if any.
    pub async fn seed(&self, auth_config: &AuthConfig) -> Result<()> {
        if let Some(admin) = &auth_config.admin {
            self.users.seed_admin(&admin.email, &admin.password).await?;
            tracing::info!(email = %admin.email, "Admin account ready");
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full application router
pub fn build_app(state: &AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .merge(auth::routes::routes(auth::routes::AuthRoutesState {
            users: state.users.clone(),
            issuer: state.issuer.clone(),
        }))
        .merge(api::customers::routes(api::users::UsersState {
            service: state.users.clone(),
        }))
        .merge(api::admins::routes(api::users::UsersState {
            service: state.users.clone(),
        }))
        .merge(api::products::routes(api::products::ProductsState {
            service: state.products.clone(),
        }))
        .merge(api::cart::routes(api::cart::CartState {
            service: state.carts.clone(),
        }))
        .merge(api::orders::routes(api::orders::OrdersState {
            service: state.orders.clone(),
        }))
        .layer(middleware::from_fn_with_state(
            AuthState::new(state.issuer.clone()),
            auth::authenticate,
        ));

    let app = Router::new()
        .route("/health", get(health))
        .merge(build_router_with_prefix(api_routes, &server.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !server.cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(server.cors_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ]),
        )
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
