// Storage layer
// Decision: In-memory backend only; data does not survive a restart.

mod memory;
pub mod models;

pub use memory::InMemoryDatabase;
pub use models::*;

/// Database handle used by services.
pub type Database = InMemoryDatabase;

/// Storage failures callers are expected to branch on.
/// Everything else surfaces as a plain `anyhow::Error`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
}
