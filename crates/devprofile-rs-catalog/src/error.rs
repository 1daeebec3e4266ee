// crates/devprofile-rs-catalog/src/error.rs

use devprofile_rs::{ParseError, ReconstructError};
use thiserror::Error;

/// Errors raised by the relational store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A multi-table write failed and was rolled back as a whole.
    #[error("storage transaction '{operation}' failed and was rolled back: {source}")]
    StorageTransactionFailed {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("invalid store data: {0}")]
    InvalidData(String),
    #[error("no profile with id '{0}'")]
    NotFound(String),
}

impl StoreError {
    /// `SQLITE_BUSY` and `SQLITE_LOCKED` go away on their own; everything
    /// else will fail again.
    pub fn is_transient(&self) -> bool {
        let source = match self {
            StoreError::Sqlite(e) | StoreError::StorageTransactionFailed { source: e, .. } => e,
            _ => return false,
        };
        matches!(
            source.sqlite_error_code(),
            Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
        )
    }
}

/// Errors raised while unpacking an archive of documents.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a ZIP container: {0}")]
    NotZipContainer(String),
    #[error("failed to read ZIP entry '{path}': {reason}")]
    ZipRead { path: String, reason: String },
    /// Entry count, entry size or nesting depth over the configured limit.
    #[error(transparent)]
    Limit(#[from] ParseError),
}

/// Which side of a fidelity comparison failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Original,
    Reconstructed,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Original => f.write_str("original"),
            Side::Reconstructed => f.write_str("reconstructed"),
        }
    }
}

/// The fidelity engine never fails on a mismatch, only on input it cannot
/// compare.
#[derive(Debug, Error)]
pub enum FidelityEngineError {
    #[error("{side} document cannot be parsed: {source}")]
    Unparsable {
        side: Side,
        #[source]
        source: ParseError,
    },
    #[error("comparison cancelled")]
    Cancelled,
}

/// Umbrella error of the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reconstruct(#[from] ReconstructError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Fidelity(#[from] FidelityEngineError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("the catalog lock was poisoned by a panicking thread")]
    Poisoned,
}

impl CatalogError {
    /// Short, stable identifier of the error kind, printed by the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Parse(e) => e.kind(),
            CatalogError::Reconstruct(_) => "ReconstructError",
            CatalogError::Store(StoreError::StorageTransactionFailed { .. }) => {
                "StorageTransactionFailed"
            }
            CatalogError::Store(StoreError::NotFound(_)) => "NotFound",
            CatalogError::Store(_) => "StorageError",
            CatalogError::Container(ContainerError::Limit(e)) => e.kind(),
            CatalogError::Container(_) => "ContainerError",
            CatalogError::Fidelity(_) => "FidelityEngineError",
            CatalogError::Io(_) => "IoError",
            CatalogError::Poisoned => "StorageError",
        }
    }
}
