/*!
 * Error types for the translate store.
 *
 * Callers only ever see [`StoreError`]. The database layer works with
 * `anyhow::Error` internally and the store classifies those errors into
 * one of the three variants at its boundary.
 */

use thiserror::Error;

/// Errors surfaced by [`crate::TranslateStore`] operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The persistent store cannot be opened or accessed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// An add or remove could not complete; nothing was persisted
    #[error("Write failed: {0}")]
    WriteFailure(String),

    /// A count or list could not complete
    #[error("Read failed: {0}")]
    ReadFailure(String),
}

impl StoreError {
    /// Description carried by the error, without the variant prefix
    pub fn description(&self) -> &str {
        match self {
            Self::StorageUnavailable(msg) | Self::WriteFailure(msg) | Self::ReadFailure(msg) => msg,
        }
    }
}

/// Result alias used by every public store operation
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Raised by the connection layer once the store has been closed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("database connection is closed")]
pub struct ConnectionClosed;
