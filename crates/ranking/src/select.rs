//! Rank Selector - top-N over scored movies.
//!
//! All selections share one ordering: descending by score, ties in input
//! order. Truncation happens after sorting.

use crate::score::MovieScore;
use catalog::MovieId;

/// The `top_count` highest-scored movies, highest first
pub fn get_top_movies(scores: &[MovieScore], top_count: usize) -> Vec<MovieScore> {
    if top_count == 0 {
        return Vec::new();
    }

    let mut ranked = scores.to_vec();
    // Stable sort keeps input order on equal scores
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(top_count);
    ranked
}

/// Ids of the `top_count` highest-scored movies
pub fn get_top_movie_ids(scores: &[MovieScore], top_count: usize) -> Vec<MovieId> {
    get_top_movies(scores, top_count)
        .into_iter()
        .map(|s| s.movie_id)
        .collect()
}

/// Names of the `top_count` highest-scored movies.
///
/// Entries without a name take a slot but contribute nothing, so the result
/// can be shorter than `top_count`.
pub fn get_top_movie_names(scores: &[MovieScore], top_count: usize) -> Vec<String> {
    get_top_movies(scores, top_count)
        .into_iter()
        .filter_map(|s| s.movie_name)
        .collect()
}
