//! Error types for the catalog crate.
//!
//! Two families of failure live here:
//! - `CatalogError` for loading the catalog from disk
//! - `SearchIndexError` for lookups against a search index

use thiserror::Error;

/// Errors that can occur while loading catalog data
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },
}

/// Errors surfaced by a search index.
///
/// Callers never retry on these; retry policy belongs to the index client.
#[derive(Error, Debug)]
pub enum SearchIndexError {
    /// The index could not be reached at all
    #[error("Search index unavailable: {0}")]
    Unavailable(String),

    /// The index answered, but with something we cannot use
    #[error("Invalid search index response: {0}")]
    InvalidResponse(String),
}

/// Convenience type alias for catalog loading results
pub type Result<T> = std::result::Result<T, CatalogError>;
