//! Error taxonomy for the read engine.
//!
//! Every engine operation returns [`EngineError`] on failure. Each variant maps
//! to a stable [`ErrorKind`] so collaborators (the CLI, an HTTP handler) can
//! branch on the kind without parsing messages. The engine never retries and
//! never substitutes defaults for failed reads.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Stable, inspectable classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Ambiguous,
    InvalidArgument,
    StoreUnavailable,
    DataIntegrity,
    Canceled,
}

/// Errors returned by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No record matches an exact id, unique name or prefix.
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    /// A name or id prefix matches more than one record.
    #[error("{what} '{key}' is ambiguous: {count} matches, use the full identifier")]
    Ambiguous { what: &'static str, key: String, count: usize },

    /// Malformed filter value or request parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The store could not be opened or queried.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A stored value violates the decoder's format assumptions.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    /// The query was canceled or ran past its deadline.
    #[error("Query canceled: {0}")]
    Canceled(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Ambiguous { .. } => ErrorKind::Ambiguous,
            EngineError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            EngineError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            EngineError::DataIntegrity(_) => ErrorKind::DataIntegrity,
            EngineError::Canceled(_) => ErrorKind::Canceled,
        }
    }

    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        EngineError::NotFound { what, key: key.into() }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::OperationInterrupted) => EngineError::Canceled("store call interrupted".to_string()),
            _ => EngineError::StoreUnavailable(err.to_string()),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
