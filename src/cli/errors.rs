//! CLI-specific error types
//!
//! All CLI errors are fatal: the process prints them and exits non-zero.

use std::io;

use thiserror::Error;

use crate::store::StoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be resolved
    #[error("GUESTLIST_CONFIG_ERROR: {0}")]
    Config(String),

    /// Database could not be opened or migrated
    #[error("GUESTLIST_STORE_ERROR: {0}")]
    Store(#[from] StoreError),

    /// Listener or server failure
    #[error("GUESTLIST_IO_ERROR: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
