// Storefront core
//
// This crate holds the HTTP-free building blocks of the storefront:
// - Credential hashing (Argon2id)
// - Token codec: AES-256-GCM sealing of JSON payloads into hex strings
// - Session issuer: nested access tokens carrying identity, role and expiry
// - Domain entity types (User, Product, Cart, Order) shared by the API
// - Listing helpers (search sanitization, sort order, pagination)
//
// Key material is passed in explicitly; nothing here reads the environment.

pub mod cart;
pub mod error;
pub mod identity;
pub mod listing;
pub mod order;
pub mod password;
pub mod product;
pub mod session;
pub mod token_codec;
pub mod user;

// Re-exports for convenience
pub use cart::{total_amount, Cart, LineItem};
pub use error::{HashError, TokenError};
pub use identity::{Identity, Role};
pub use listing::{paginate, Page, SearchPattern, SortOrder};
pub use order::{Order, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress};
pub use password::{CredentialHasher, DEFAULT_PASSWORD_COST};
pub use product::{Product, ProductStatus};
pub use session::{
    SessionIssuer, SessionPayload, TokenEnvelope, ACCESS_TOKEN_TYPE, DEFAULT_TOKEN_LIFETIME,
};
pub use token_codec::{generate_token_key, TokenCodec, ALGORITHM};
pub use user::{User, UserStatus};
