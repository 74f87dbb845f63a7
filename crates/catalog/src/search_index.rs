//! The Search Index contract.
//!
//! The ranking core only ever talks to the catalog through this trait, so a
//! remote full-text engine and the in-memory [`MovieCatalog`](crate::MovieCatalog)
//! are interchangeable.

use crate::error::SearchIndexError;
use crate::types::{CatalogMovie, MovieId};

/// Full-text and id lookups over a movie catalog.
///
/// ## Design Note
/// - `Send + Sync` so one index can be shared across concurrent requests
/// - `fetch_by_ids` makes no ordering promise; callers that need ranking
///   order must re-sort the response themselves
#[async_trait::async_trait]
pub trait SearchIndex: Send + Sync {
    /// Fetch full records for the given ids.
    ///
    /// Unknown ids are silently absent from the result, which holds at most
    /// the index's configured maximum number of records.
    async fn fetch_by_ids(&self, ids: &[MovieId]) -> Result<Vec<CatalogMovie>, SearchIndexError>;

    /// Search movie titles by keyword, best text match first.
    async fn search_by_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<CatalogMovie>, SearchIndexError>;
}
