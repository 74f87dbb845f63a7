//! Errors surfaced by the engine's public operations.

use catalog::SearchIndexError;
use interactions::{LogError, StoreError};
use thiserror::Error;

/// Every failure a pipeline or the orchestrator can report.
///
/// Collaborator failures keep the underlying error as their `source()`.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The interaction store was unreachable or a query failed
    #[error("Interaction store access failed")]
    StoreAccess(#[from] StoreError),

    /// The search index was unreachable or answered with garbage
    #[error("Search index request failed")]
    SearchIndex(#[from] SearchIndexError),

    /// The caller passed something the engine cannot act on
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The request was cancelled before it finished
    #[error("Request cancelled")]
    Cancelled,
}

impl From<LogError> for EngineError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::Store(store) => EngineError::StoreAccess(store),
            other => EngineError::Validation(other.to_string()),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
