// Storefront API Library
// Decision: Shared library for binaries (API server, CLI tools) and integration tests

// Application wiring
pub mod app;

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Authentication module
pub mod auth;

// Server configuration
pub mod config;

// Services layer
pub mod services;

// Storage layer
pub mod storage;

// OpenAPI spec generation
pub mod openapi;

pub use app::{build_app, AppState};
pub use config::ServerConfig;
