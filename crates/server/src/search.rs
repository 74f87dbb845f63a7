//! # Search Pipeline
//!
//! The keyword-driven search and suggestion flow:
//! 1. Fetch the user's recent searches that start with the query
//! 2. `budget = max_suggested_search - recent searches` (never below 0)
//! 3. Count clicks and views per (movie, name), `budget` rows each
//! 4. Score clicks ++ views
//! 5. Non-empty query: search the index and reorder its hits by score
//!    Empty query: suggest the best-scored movie names as keywords
//!
//! Recent searches are always part of the outcome.

use std::sync::Arc;
use std::time::Instant;

use catalog::{CatalogMovie, SearchIndex};
use interactions::{InteractionAggregator, InteractionKind};
use ranking::{
    calculate_total_score, get_top_movie_names, get_top_movies, sort_existing_movies_by_score,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::cancel::run_cancellable;
use crate::config::EngineConfig;
use crate::error::Result;

/// A search as submitted by the caller.
///
/// The limits are signed because callers may send anything; negative values
/// are treated as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub max_old_search_options: i32,
    pub max_suggested_search: i32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, max_old_search_options: i32, max_suggested_search: i32) -> Self {
        Self {
            query: query.into(),
            max_old_search_options,
            max_suggested_search,
        }
    }
}

/// What a search returns.
///
/// Exactly one of `recommended_keywords` (empty query) or `searched_movies`
/// (non-empty query) is filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub last_searched_keywords: Vec<String>,
    pub recommended_keywords: Vec<String>,
    pub searched_movies: Vec<CatalogMovie>,
}

/// Keyword search merged with interaction scores
#[derive(Clone)]
pub struct SearchPipeline {
    aggregator: InteractionAggregator,
    index: Arc<dyn SearchIndex>,
    view_factor: u32,
    click_factor: u32,
    index_max_records: usize,
    keyword_suggestions: usize,
}

fn clamp_limit(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}

impl SearchPipeline {
    pub fn new(
        aggregator: InteractionAggregator,
        index: Arc<dyn SearchIndex>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            aggregator,
            index,
            view_factor: config.view_factor,
            click_factor: config.click_factor,
            index_max_records: config.index_max_records,
            keyword_suggestions: config.keyword_suggestions,
        }
    }

    #[instrument(skip(self, request, cancel), fields(query = %request.query))]
    pub async fn search(
        &self,
        user_id: &str,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome> {
        let start_time = Instant::now();
        let keyword = request.query.trim();
        let max_old = clamp_limit(request.max_old_search_options);
        let max_suggested = clamp_limit(request.max_suggested_search);

        let recent = run_cancellable(cancel, self.aggregator.last_searches(user_id, keyword, max_old)).await?;
        let last_searched_keywords: Vec<String> =
            recent.into_iter().filter_map(|event| event.keyword).collect();
        let used = last_searched_keywords.len();
        let budget = max_suggested.saturating_sub(used);
        debug!("Found {} recent searches, budget {}", used, budget);

        let (clicks, views) = tokio::try_join!(
            run_cancellable(
                cancel,
                self.aggregator.count_by_kind_matching(InteractionKind::Click, keyword, budget),
            ),
            run_cancellable(
                cancel,
                self.aggregator.count_by_kind_matching(InteractionKind::View, keyword, budget),
            ),
        )?;

        let mut counts = clicks;
        counts.extend(views);
        let scores = calculate_total_score(&counts, self.view_factor, self.click_factor);

        let mut outcome = SearchOutcome {
            last_searched_keywords,
            ..SearchOutcome::default()
        };

        if keyword.is_empty() {
            let suggestions = self.keyword_suggestions.saturating_sub(used);
            outcome.recommended_keywords = get_top_movie_names(&scores, suggestions);
        } else {
            let hits = run_cancellable(
                cancel,
                self.index.search_by_keyword(keyword, self.index_max_records),
            )
            .await?;
            let best = get_top_movies(&scores, budget);
            let mut movies = sort_existing_movies_by_score(&hits, &best);
            movies.truncate(budget);
            outcome.searched_movies = movies;
        }

        info!(
            "Search for user {} returned {} keywords and {} movies in {:.2?}",
            user_id,
            outcome.recommended_keywords.len(),
            outcome.searched_movies.len(),
            start_time.elapsed()
        );
        Ok(outcome)
    }
}
