//! # Movie Orchestrator
//!
//! The engine's public surface. It wires one interaction store and one search
//! index into the pipelines and exposes:
//! - `get_recommendations`: home-page movies for a user
//! - `search`: keyword search and keyword suggestions
//! - `log_action`: record a view, click or search
//! - `movie_by_id` / `find_movies`: plain catalog lookups
//!
//! Every operation takes a `CancellationToken`; a cancelled request returns
//! `EngineError::Cancelled` and leaves no partial writes behind.

use std::sync::Arc;

use catalog::{CatalogMovie, MovieId, SearchIndex};
use interactions::{
    InteractionAggregator, InteractionEvent, InteractionKind, InteractionLogger, InteractionStore,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::cancel::{ensure_active, run_cancellable};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::recommendation::RecommendationPipeline;
use crate::search::{SearchOutcome, SearchPipeline, SearchRequest};

/// An interaction as reported by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    pub kind: InteractionKind,
    pub movie_id: Option<MovieId>,
    pub movie_name: Option<String>,
    pub keyword: Option<String>,
}

impl LogRequest {
    /// A view or click on a movie
    pub fn movie(kind: InteractionKind, movie_id: MovieId, movie_name: impl Into<String>) -> Self {
        Self {
            kind,
            movie_id: Some(movie_id),
            movie_name: Some(movie_name.into()),
            keyword: None,
        }
    }

    /// A search for `keyword`
    pub fn search(keyword: impl Into<String>) -> Self {
        Self {
            kind: InteractionKind::Search,
            movie_id: None,
            movie_name: None,
            keyword: Some(keyword.into()),
        }
    }
}

/// Main entry point that coordinates the ranking pipelines
#[derive(Clone)]
pub struct MovieOrchestrator {
    recommendations: RecommendationPipeline,
    search_pipeline: SearchPipeline,
    logger: InteractionLogger,
    index: Arc<dyn SearchIndex>,
    index_max_records: usize,
}

fn require_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(EngineError::Validation("user id must not be empty".to_string()));
    }
    Ok(())
}

impl MovieOrchestrator {
    /// Create an orchestrator over `store` and `index`
    pub fn new(
        store: Arc<dyn InteractionStore>,
        index: Arc<dyn SearchIndex>,
        config: &EngineConfig,
    ) -> Self {
        let aggregator = InteractionAggregator::new(store.clone()).with_cap(config.aggregation_cap);

        Self {
            recommendations: RecommendationPipeline::new(aggregator.clone(), index.clone(), config),
            search_pipeline: SearchPipeline::new(aggregator, index.clone(), config),
            logger: InteractionLogger::new(store),
            index,
            index_max_records: config.index_max_records,
        }
    }

    /// Movies to show `user_id` on the home page, best first
    pub async fn get_recommendations(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<CatalogMovie>> {
        require_user(user_id)?;
        self.recommendations.recommend(user_id, cancel).await
    }

    /// Run a keyword search (or keyword suggestion for an empty query)
    pub async fn search(
        &self,
        user_id: &str,
        request: SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome> {
        require_user(user_id)?;
        self.search_pipeline.search(user_id, &request, cancel).await
    }

    /// Record one interaction for `user_id` and return the stored event
    #[instrument(skip(self, request, cancel), fields(kind = %request.kind))]
    pub async fn log_action(
        &self,
        request: LogRequest,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<InteractionEvent> {
        require_user(user_id)?;
        ensure_active(cancel)?;

        let event = self
            .logger
            .log_interaction(
                request.kind,
                user_id,
                request.movie_id,
                request.movie_name,
                request.keyword,
            )
            .await?;

        info!("Logged {} for user {}", event.kind, user_id);
        Ok(event)
    }

    /// A single catalog movie, if the index knows it
    pub async fn movie_by_id(
        &self,
        movie_id: MovieId,
        cancel: &CancellationToken,
    ) -> Result<Option<CatalogMovie>> {
        let movies = run_cancellable(cancel, self.index.fetch_by_ids(&[movie_id])).await?;
        Ok(movies.into_iter().find(|m| m.id == movie_id))
    }

    /// Raw keyword search against the index, without interaction scores
    pub async fn find_movies(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<CatalogMovie>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        run_cancellable(cancel, self.index.search_by_keyword(query, self.index_max_records)).await
    }
}
