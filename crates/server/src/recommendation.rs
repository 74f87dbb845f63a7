//! # Recommendation Pipeline
//!
//! The no-keyword "home" flow:
//! 1. Fetch the movies the user already viewed (the exclusion set)
//! 2. Count views and clicks of every other movie (concurrently)
//! 3. Score views ++ clicks
//! 4. Keep the top N ids (N never exceeds the index's record cap)
//! 5. Fetch their details and restore ranking order
//!
//! The search index returns documents in its own order, so step 5 re-sorts
//! the fetched rows by the step 3 scores before returning them.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use catalog::{CatalogMovie, SearchIndex};
use interactions::{InteractionAggregator, InteractionKind};
use ranking::{calculate_total_score, get_top_movies, sort_existing_movies_by_score};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::cancel::run_cancellable;
use crate::config::EngineConfig;
use crate::error::Result;

/// Home-page recommendations for a user
#[derive(Clone)]
pub struct RecommendationPipeline {
    aggregator: InteractionAggregator,
    index: Arc<dyn SearchIndex>,
    view_factor: u32,
    click_factor: u32,
    top_count: usize,
    index_max_records: usize,
}

impl RecommendationPipeline {
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
            top_count: config.home_top_count,
            index_max_records: config.index_max_records,
        }
    }

    /// Recommend movies `user_id` has not viewed yet, best first
    #[instrument(skip(self, cancel))]
    pub async fn recommend(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<CatalogMovie>> {
        let start_time = Instant::now();

        let viewed = run_cancellable(
            cancel,
            self.aggregator.distinct_movie_ids(InteractionKind::View, user_id),
        )
        .await?;
        let excluded: HashSet<_> = viewed.into_iter().collect();
        debug!("Excluding {} viewed movies", excluded.len());

        let (views, clicks) = tokio::try_join!(
            run_cancellable(
                cancel,
                self.aggregator.count_by_kind_excluding(InteractionKind::View, &excluded),
            ),
            run_cancellable(
                cancel,
                self.aggregator.count_by_kind_excluding(InteractionKind::Click, &excluded),
            ),
        )?;
        info!("Counted {} viewed and {} clicked movies", views.len(), clicks.len());

        let mut counts = views;
        counts.extend(clicks);
        let scores = calculate_total_score(&counts, self.view_factor, self.click_factor);
        // The index drops ids past its cap, so never ask it for more
        let top = get_top_movies(&scores, self.top_count.min(self.index_max_records));

        if top.is_empty() {
            info!("No interactions to rank for user {}", user_id);
            return Ok(Vec::new());
        }

        let ids: Vec<_> = top.iter().map(|s| s.movie_id).collect();
        let fetched = run_cancellable(cancel, self.index.fetch_by_ids(&ids)).await?;
        let movies = sort_existing_movies_by_score(&fetched, &top);

        info!(
            "Recommended {} movies for user {} in {:.2?}",
            movies.len(),
            user_id,
            start_time.elapsed()
        );
        Ok(movies)
    }
}
