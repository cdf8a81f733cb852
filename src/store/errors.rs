//! Store error types

use thiserror::Error;

use crate::hierarchy::DevoteeId;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Directory store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A thread panicked while holding the directory lock
    #[error("Storage error: directory lock poisoned")]
    LockPoisoned,

    /// Mirroring committed records to the audit journal failed
    #[error("Audit journal error: {0}")]
    Journal(String),

    /// Seed file unreadable or malformed
    #[error("Seed error: {0}")]
    Seed(String),

    /// Seed data breaks a forest invariant
    #[error("Seed rejected: {0}")]
    InvalidSeed(String),

    /// Import of an id that is already present
    #[error("Duplicate devotee id: {0}")]
    DuplicateId(DevoteeId),
}
