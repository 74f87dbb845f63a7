//! Scoring and ordering of movies from interaction counts.
//!
//! This crate provides:
//! - `calculate_total_score`: weighted view/click counts per movie
//! - `get_top_movies` and its id/name projections: top-N selection
//! - `sort_existing_movies_by_score`: reorder catalog hits by score
//!
//! Everything here is pure: slices in, new `Vec`s out, no I/O.
//!
//! ## Architecture
//! 1. The aggregator produces `MovieCount`s
//! 2. `score` folds them into `MovieScore`s
//! 3. `select` picks the best N
//! 4. `merge` joins scores onto catalog rows from the search index
//!
//! ## Example Usage
//! ```ignore
//! use ranking::{calculate_total_score, get_top_movie_ids};
//!
//! let mut counts = views;
//! counts.extend(clicks);
//! let scores = calculate_total_score(&counts, 5, 1);
//! let ids = get_top_movie_ids(&scores, 20);
//! ```

pub mod score;
pub mod select;
pub mod merge;

// Re-export main types
pub use merge::sort_existing_movies_by_score;
pub use score::{calculate_total_score, MovieScore, DEFAULT_CLICK_FACTOR, DEFAULT_VIEW_FACTOR};
pub use select::{get_top_movie_ids, get_top_movie_names, get_top_movies};
