// Storefront API server

use anyhow::{Context, Result};
use storefront_api::auth::AuthConfig;
use storefront_api::{build_app, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real deployments set the environment directly
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    tracing::info!("storefront-api starting...");

    let auth_config = AuthConfig::from_env();
    tracing::info!(
        algorithm = %auth_config.token.algorithm,
        lifetime_ms = auth_config.token.lifetime.as_millis() as u64,
        enforce_expiry = auth_config.token.enforce_expiry,
        previous_keys = auth_config.token.previous_keys.len(),
        "Authentication configured"
    );

    let server_config = ServerConfig::from_env();
    if !server_config.api_prefix.is_empty() {
        tracing::info!(prefix = %server_config.api_prefix, "API prefix configured");
    }
    if server_config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?server_config.cors_origins, "CORS origins configured");
    }

    let state = AppState::new(&auth_config).context("Failed to initialize application")?;
    state
        .seed(&auth_config)
        .await
        .context("Failed to seed admin account")?;

    let app = build_app(&state, &server_config);

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
