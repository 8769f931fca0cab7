// HTTP API routes
//
// This module contains all HTTP route handlers for the public API.
// Each submodule handles a specific resource type with its own state.

pub mod admins;
pub mod cart;
pub mod common;
pub mod customers;
pub mod orders;
pub mod products;
pub mod users;
pub mod validation;

// Re-export common types
pub use common::{ApiError, ErrorResponse, ListQuery, ListResponse, MessageResponse};
