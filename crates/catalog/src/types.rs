//! Core catalog types.
//!
//! The catalog is the read-only side of the system: movie metadata that the
//! ranking core looks up by id or by keyword but never modifies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (the first field of a `movies.dat` line)
pub type MovieId = u32;

// =============================================================================
// Movie-related Types
// =============================================================================

/// A movie as stored in the catalog.
///
/// The title is stored without its trailing `(year)`; the year lives in its
/// own field. Genres keep the order they were listed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMovie {
    pub id: MovieId,
    pub title: String,
    pub year: u16,
    pub genres: Vec<String>,
}

impl CatalogMovie {
    pub fn new(id: MovieId, title: impl Into<String>, year: u16, genres: Vec<String>) -> Self {
        Self {
            id,
            title: title.into(),
            year,
            genres,
        }
    }
}

// =============================================================================
// MovieCatalog - The In-Memory Search Index
// =============================================================================

/// In-memory catalog of movies.
///
/// Movies are kept in a `BTreeMap` so every listing comes back in ascending id
/// order, independent of the order in which ids were requested.
#[derive(Debug)]
pub struct MovieCatalog {
    pub(crate) movies: BTreeMap<MovieId, CatalogMovie>,

    /// Upper bound on the number of documents returned by an id lookup
    pub(crate) max_records: usize,
}

impl MovieCatalog {
    /// Default cap on documents returned by one lookup
    pub const DEFAULT_MAX_RECORDS: usize = 20;

    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self {
            movies: BTreeMap::new(),
            max_records: Self::DEFAULT_MAX_RECORDS,
        }
    }

    /// Configure the id-lookup record cap (default: 20)
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&CatalogMovie> {
        self.movies.get(&id)
    }

    /// Insert a movie, replacing any previous entry with the same id
    pub fn insert_movie(&mut self, movie: CatalogMovie) {
        self.movies.insert(movie.id, movie);
    }

    /// Number of movies in the catalog
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }
}

impl Default for MovieCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<CatalogMovie> for MovieCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogMovie>>(iter: I) -> Self {
        let mut catalog = MovieCatalog::new();
        for movie in iter {
            catalog.insert_movie(movie);
        }
        catalog
    }
}
