//! # Catalog Crate
//!
//! This crate owns the movie catalog: the read-only metadata the ranking core
//! looks up by id or keyword.
//!
//! ## Main Components
//!
//! - **types**: Catalog types (`CatalogMovie`, `MovieCatalog`)
//! - **parser**: Parse `movies.dat` into `CatalogMovie`s
//! - **index**: Load the catalog and answer id/keyword lookups
//! - **search_index**: The `SearchIndex` contract the core depends on
//! - **error**: Error types for loading and lookups
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{MovieCatalog, SearchIndex};
//! use std::path::Path;
//!
//! let catalog = MovieCatalog::load_from_file(Path::new("data/movies.dat"))?;
//!
//! let hits = catalog.search_by_keyword("toy st", 20).await?;
//! let by_id = catalog.fetch_by_ids(&[1, 2, 3]).await?;
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod search_index;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result, SearchIndexError};
pub use search_index::SearchIndex;
pub use types::{CatalogMovie, MovieCatalog, MovieId};
