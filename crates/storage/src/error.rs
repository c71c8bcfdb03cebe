//! Storage error types.

use thiserror::Error;

/// Errors that can occur reading or writing the guest cart entry.
///
/// Callers treat these as recoverable: a read failure reads as an empty
/// cart, a write failure is logged and swallowed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying store read/write failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value could not be serialized or parsed.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
