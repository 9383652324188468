//! # Guest Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Guest Store errors
///
/// Every variant except `Database` is a caller error and terminal for the request.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input violates a field constraint
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// No guest with this id
    #[error("Guest {0} not found")]
    GuestNotFound(i64),

    /// No accompanist with this id under the claimed guest
    #[error("Accompanist {accompanist_id} not found for guest {guest_id}")]
    AccompanistNotFound { guest_id: i64, accompanist_id: i64 },

    /// Guest already has as many accompanists as its quota allows
    #[error("Guest {guest_id} has no accompanist slots left (quota {quota})")]
    QuotaExceeded { guest_id: i64, quota: u32 },

    /// Persistence backend failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True for both guest and accompanist lookups that missed.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::GuestNotFound(_) | StoreError::AccompanistNotFound { .. }
        )
    }
}
