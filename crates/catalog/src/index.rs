//! MovieCatalog loading and lookup logic.
//!
//! This module builds the in-memory catalog from a data file and implements
//! the [`SearchIndex`] contract on top of it:
//! - id lookups return documents in ascending id order
//! - keyword lookups use phrase-prefix matching over title words

use crate::error::{Result, SearchIndexError};
use crate::parser;
use crate::search_index::SearchIndex;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

impl MovieCatalog {
    /// Load the catalog from a `movies.dat` file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let movies = parser::parse_movies(path)?;
        let catalog: MovieCatalog = movies.into_iter().collect();

        info!("Loaded {} movies into the catalog", catalog.len());
        Ok(catalog)
    }

    /// Movies whose title phrase-prefix matches `keyword`, best match first.
    ///
    /// ## Algorithm
    /// 1. Lowercase and split both the keyword and each title into words
    /// 2. A title matches when the keyword words appear consecutively in the
    ///    title, every word exact except the last one, which only has to be a
    ///    prefix
    /// 3. Rank by position of the first matched word, then by title length,
    ///    then by id
    pub fn search_titles(&self, keyword: &str, limit: usize) -> Vec<CatalogMovie> {
        let query = tokenize(keyword);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut matches: Vec<(usize, usize, &CatalogMovie)> = self
            .movies
            .values()
            .filter_map(|movie| {
                let title_words = tokenize(&movie.title);
                phrase_prefix_position(&title_words, &query)
                    .map(|position| (position, title_words.len(), movie))
            })
            .collect();

        matches.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.id.cmp(&b.2.id))
        });

        matches
            .into_iter()
            .take(limit)
            .map(|(_, _, movie)| movie.clone())
            .collect()
    }

    /// Movies for the requested ids, in ascending id order, capped at
    /// `max_records`
    pub fn movies_by_ids(&self, ids: &[MovieId]) -> Vec<CatalogMovie> {
        let wanted: HashSet<MovieId> = ids.iter().copied().collect();
        self.movies
            .values()
            .filter(|movie| wanted.contains(&movie.id))
            .take(self.max_records)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl SearchIndex for MovieCatalog {
    async fn fetch_by_ids(
        &self,
        ids: &[MovieId],
    ) -> std::result::Result<Vec<CatalogMovie>, SearchIndexError> {
        let movies = self.movies_by_ids(ids);
        debug!(requested = ids.len(), found = movies.len(), "Fetched movies by id");
        Ok(movies)
    }

    async fn search_by_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> std::result::Result<Vec<CatalogMovie>, SearchIndexError> {
        let movies = self.search_titles(keyword, limit);
        debug!(keyword = %keyword, found = movies.len(), "Searched movies by keyword");
        Ok(movies)
    }
}

/// Lowercase alphanumeric words of `s`
fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Position of the first title word where `query` phrase-prefix matches
fn phrase_prefix_position(title: &[String], query: &[String]) -> Option<usize> {
    if query.len() > title.len() {
        return None;
    }
    let (last, exact) = query.split_last()?;
    (0..=title.len() - query.len()).find(|&start| {
        let window = &title[start..start + query.len()];
        window[..exact.len()] == *exact && window[exact.len()].starts_with(last.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str) -> CatalogMovie {
        CatalogMovie::new(id, title, 1995, vec!["Comedy".to_string()])
    }

    fn create_test_catalog() -> MovieCatalog {
        vec![
            movie(1, "Toy Story"),
            movie(2, "Jumanji"),
            movie(3, "Toy Story 2"),
            movie(4, "Story of Us, The"),
            movie(5, "Heat"),
            movie(6, "Heathers"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_phrase_prefix_matching() {
        let catalog = create_test_catalog();

        let ids: Vec<MovieId> = catalog.search_titles("toy st", 10).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let ids: Vec<MovieId> = catalog.search_titles("story", 10).iter().map(|m| m.id).collect();
        // Title-initial match first, then by position
        assert_eq!(ids, vec![4, 1, 3]);

        let ids: Vec<MovieId> = catalog.search_titles("HEAT", 10).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_search_respects_limit_and_empty_keyword() {
        let catalog = create_test_catalog();

        assert_eq!(catalog.search_titles("toy", 1).len(), 1);
        assert!(catalog.search_titles("", 10).is_empty());
        assert!(catalog.search_titles("   ", 10).is_empty());
        assert!(catalog.search_titles("toy", 0).is_empty());
        assert!(catalog.search_titles("alien", 10).is_empty());
    }

    #[test]
    fn test_movies_by_ids_ignores_request_order() {
        let catalog = create_test_catalog();

        let ids: Vec<MovieId> = catalog.movies_by_ids(&[5, 1, 3, 999]).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_movies_by_ids_caps_records() {
        let catalog = create_test_catalog().with_max_records(2);

        let found = catalog.movies_by_ids(&[1, 2, 3, 4]);
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_search_index_contract() {
        let catalog = create_test_catalog();

        let by_ids = catalog.fetch_by_ids(&[2]).await.unwrap();
        assert_eq!(by_ids.len(), 1);
        assert_eq!(by_ids[0].title, "Jumanji");

        let by_keyword = catalog.search_by_keyword("jum", 20).await.unwrap();
        assert_eq!(by_keyword.len(), 1);
        assert_eq!(by_keyword[0].id, 2);
    }
}
