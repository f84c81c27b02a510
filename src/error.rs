//! Error Types
//!
//! Every fallible operation in this crate returns [`Result`], built on a
//! single [`Error`] taxonomy:
//!
//! - [`Error::InvalidArgument`] - malformed table, key, ttl, or range bounds
//! - [`Error::NotFound`] - missing or expired record, or missing index entry
//! - [`Error::Serialization`] / [`Error::Deserialization`] - value encoding
//!   mismatch at the API boundary
//! - [`Error::Storage`] - underlying engine or transaction failure
//! - [`Error::Io`] - snapshot file I/O failure
//!
//! Errors propagate to the caller unchanged; nothing in the crate retries or
//! swallows a failure. Logging side effects are best-effort and never replace
//! the returned error.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the table store and its engine adapter.
#[derive(Debug, Error)]
pub enum Error {
    /// A table, key, ttl, or range bound failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested record or index entry does not exist, or has expired.
    #[error("not found: {table}:{key}")]
    NotFound {
        /// Table the lookup targeted.
        table: String,
        /// Record key or index key that was looked up.
        key: String,
    },

    /// The value could not be serialized for storage.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Stored bytes could not be decoded into the requested shape.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The underlying engine or one of its transactions failed.
    #[error("storage engine error: {0}")]
    Storage(#[from] fjall::Error),

    /// Reading or writing a snapshot file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this error is a [`Error::NotFound`].
    ///
    /// Callers resolving index entries often want to skip missing records
    /// rather than abort, since indexes are not cleaned up when records are
    /// deleted.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub(crate) fn not_found(table: &str, key: &str) -> Self {
        Error::NotFound {
            table: table.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}
