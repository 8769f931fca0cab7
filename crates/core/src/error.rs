// Error types for credential hashing and session tokens

use thiserror::Error;

/// Errors raised by the credential hasher.
#[derive(Debug, Error)]
pub enum HashError {
    /// The hashing primitive failed (bad parameters, resource exhaustion)
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// The stored digest is not a valid PHC string
    #[error("malformed password digest: {0}")]
    MalformedDigest(String),
}

/// Errors raised while sealing or opening session tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token could not be decrypted or deserialized
    #[error("token could not be decoded: {0}")]
    Decode(String),

    /// Token decoded but failed structural checks (expired, inconsistent claims)
    #[error("unauthorized token: {0}")]
    Unauthorized(String),

    /// Sealing a payload failed
    #[error("token encryption failed: {0}")]
    Encrypt(String),

    /// Key material or algorithm configuration is invalid
    #[error("invalid token configuration: {0}")]
    Config(String),
}

impl TokenError {
    pub fn decode(msg: impl Into<String>) -> Self {
        TokenError::Decode(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        TokenError::Unauthorized(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TokenError::Config(msg.into())
    }

    /// Whether the failure came from the caller's token rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TokenError::Decode(_) | TokenError::Unauthorized(_))
    }
}
