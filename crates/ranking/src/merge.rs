//! Search Merger - order catalog hits by interaction score.
//!
//! ## Algorithm
//! 1. Index scored rows by movie id, keeping the highest score per id
//! 2. Left-join catalog rows against that index; unmatched rows score 0
//! 3. Stable sort descending by joined score, so ties keep catalog order
//!
//! The caller truncates the merged list.

use crate::score::MovieScore;
use catalog::{CatalogMovie, MovieId};
use std::collections::HashMap;

/// Reorder `catalog` rows by their score in `scored`.
///
/// Each catalog row is emitted exactly once, even if `scored` holds several
/// rows for its id.
pub fn sort_existing_movies_by_score(
    catalog: &[CatalogMovie],
    scored: &[MovieScore],
) -> Vec<CatalogMovie> {
    let mut best: HashMap<MovieId, u64> = HashMap::with_capacity(scored.len());
    for row in scored {
        let entry = best.entry(row.movie_id).or_insert(0);
        *entry = (*entry).max(row.score);
    }

    let mut joined: Vec<(&CatalogMovie, u64)> = catalog
        .iter()
        .map(|movie| (movie, best.get(&movie.id).copied().unwrap_or(0)))
        .collect();
    joined.sort_by(|a, b| b.1.cmp(&a.1));

    joined.into_iter().map(|(movie, _)| movie.clone()).collect()
}
