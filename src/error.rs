//! Error classification for store operations.
//!
//! Every public operation routes its engine result through [`intercept`],
//! which reports the failure once (operation name + underlying cause) and
//! re-raises it as a classified [`StoreError`]. Nothing is swallowed and
//! nothing is retried.

use rusqlite::ErrorCode;
use tracing::error;

/// Classified failure of a store operation.
///
/// Each variant carries the name of the public operation that failed and
/// the untouched engine error as its source.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The connection target is unreachable or not a database.
    #[error("{operation}: cannot open store: {source}")]
    Connection {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Another transaction holds the write lock.
    #[error("{operation}: store is busy: {source}")]
    Contention {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Malformed SQL, constraint violation, type mismatch, or any other
    /// statement-level engine failure.
    #[error("{operation}: statement failed: {source}")]
    Statement {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    /// Name of the public operation that raised this error.
    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::Connection { operation, .. }
            | StoreError::Contention { operation, .. }
            | StoreError::Statement { operation, .. } => operation,
        }
    }

    fn classify(operation: &'static str, source: rusqlite::Error) -> Self {
        let code = match &source {
            rusqlite::Error::SqliteFailure(e, _) => Some(e.code),
            _ => None,
        };
        match code {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                StoreError::Contention { operation, source }
            }
            Some(ErrorCode::CannotOpen)
            | Some(ErrorCode::NotADatabase)
            | Some(ErrorCode::PermissionDenied) => StoreError::Connection { operation, source },
            _ => StoreError::Statement { operation, source },
        }
    }
}

/// Report an engine failure once and re-raise it classified.
pub(crate) fn intercept<T>(
    operation: &'static str,
    result: rusqlite::Result<T>,
) -> Result<T, StoreError> {
    result.map_err(|source| {
        error!(operation, error = %source, "store operation failed");
        StoreError::classify(operation, source)
    })
}
