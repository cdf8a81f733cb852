//! # Hierarchy Errors
//!
//! Error types for the hierarchy mutation engine.

use thiserror::Error;

use super::node::DevoteeId;
use crate::store::StoreError;

/// Result type for hierarchy operations
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Hierarchy errors
///
/// Every precondition is checked before the first write; any of these
/// aborts the surrounding transaction.
#[derive(Debug, Clone, Error)]
pub enum HierarchyError {
    // ==================
    // Lookup Errors
    // ==================
    /// Target devotee absent
    #[error("Devotee not found: {0}")]
    DevoteeNotFound(DevoteeId),

    /// Referenced new supervisor absent
    #[error("Supervisor not found: {0}")]
    SupervisorNotFound(DevoteeId),

    // ==================
    // Rule Violations
    // ==================
    /// One or more hierarchy rules violated
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Proposed reports-to edge would close a cycle
    #[error("Circular reference: {0}")]
    CircularReference(String),

    // ==================
    // Internal Errors
    // ==================
    /// Store failure
    #[error("{0}")]
    Storage(#[from] StoreError),
}

impl HierarchyError {
    /// Single-rule validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        HierarchyError::Validation(vec![message.into()])
    }

    /// Stable error kind string for API bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HierarchyError::DevoteeNotFound(_) | HierarchyError::SupervisorNotFound(_) => {
                "NOT_FOUND"
            }
            HierarchyError::Validation(_) => "VALIDATION_ERROR",
            HierarchyError::CircularReference(_) => "CIRCULAR_REFERENCE",
            HierarchyError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            HierarchyError::DevoteeNotFound(_) => 404,
            HierarchyError::SupervisorNotFound(_) => 404,
            HierarchyError::Validation(_) => 400,
            HierarchyError::CircularReference(_) => 409,
            HierarchyError::Storage(_) => 500,
        }
    }

    /// Returns whether the caller caused this error
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Violated rules, if this is a validation error.
    pub fn violations(&self) -> &[String] {
        match self {
            HierarchyError::Validation(rules) => rules,
            _ => &[],
        }
    }
}
