//! Score Calculator - Counts to Weighted Relevance
//!
//! ## Algorithm
//! 1. Group counts by (movie id, movie name)
//! 2. Sum view counts and click counts per group
//! 3. `score = view_factor * views + click_factor * clicks`
//!
//! Search counts carry no weight. A movie recorded under two different names
//! gets two independent scores.

use catalog::MovieId;
use interactions::{InteractionKind, MovieCount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weight of one view in the default scoring
pub const DEFAULT_VIEW_FACTOR: u32 = 5;

/// Weight of one click in the default scoring
pub const DEFAULT_CLICK_FACTOR: u32 = 1;

/// A movie with its weighted relevance score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieScore {
    pub movie_id: MovieId,
    pub movie_name: Option<String>,
    pub score: u64,
}

impl MovieScore {
    pub fn new(movie_id: MovieId, score: u64) -> Self {
        Self {
            movie_id,
            movie_name: None,
            score,
        }
    }

    pub fn with_name(mut self, movie_name: impl Into<String>) -> Self {
        self.movie_name = Some(movie_name.into());
        self
    }
}

/// Combine view and click counts into one score per (movie, name).
///
/// Output follows the first-seen order of each group in `counts`. Empty input
/// gives empty output.
pub fn calculate_total_score(
    counts: &[MovieCount],
    view_factor: u32,
    click_factor: u32,
) -> Vec<MovieScore> {
    let mut slots: HashMap<(MovieId, Option<&str>), usize> = HashMap::new();
    let mut scores: Vec<MovieScore> = Vec::new();

    for count in counts {
        let weight = match count.kind {
            InteractionKind::View => view_factor,
            InteractionKind::Click => click_factor,
            InteractionKind::Search => 0,
        };
        let points = u64::from(weight).saturating_mul(u64::from(count.count));

        let key = (count.movie_id, count.movie_name.as_deref());
        match slots.get(&key) {
            Some(&slot) => {
                scores[slot].score = scores[slot].score.saturating_add(points);
            }
            None => {
                slots.insert(key, scores.len());
                scores.push(MovieScore {
                    movie_id: count.movie_id,
                    movie_name: count.movie_name.clone(),
                    score: points,
                });
            }
        }
    }

    scores
}
