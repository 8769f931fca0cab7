// Authentication
//
// - config: AUTH_* environment settings, builds the session issuer and hasher
// - middleware: decodes the Authorization header and provides role extractors
// - routes: login, logout, current session

pub mod config;
pub mod middleware;
pub mod routes;

pub use config::AuthConfig;
pub use middleware::{
    authenticate, AdminUser, AuthError, AuthState, AuthUser, CustomerUser, OptionalAuthUser,
    SessionContext,
};
