// Service layer for business logic
//
// Services own the rules; handlers only translate HTTP in and out.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartService;
pub use order::OrderService;
pub use product::ProductService;
pub use user::UserService;

/// Errors returned by services. Mapped to HTTP status codes in `api::common`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown email, wrong password, or an account that may not log in.
    /// One message for all of them so callers cannot probe for accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
