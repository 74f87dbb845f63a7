//! Simple test harness for the movie orchestrator.
//!
//! Loads the catalog, seeds the dummy user's history, then runs the home,
//! suggestion and search flows once and logs what came back.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::MovieCatalog;
use interactions::{InMemoryInteractionStore, InteractionSeeder, DUMMY_USER_ID};
use server::{CancellationToken, EngineConfig, MovieOrchestrator, SearchRequest};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,interactions=debug")),
        )
        .init();

    info!("Starting ReelSearch server test harness");

    let config = EngineConfig::from_env()?;

    info!("Loading catalog from {}...", config.movies_file.display());
    let catalog = MovieCatalog::load_from_file(&config.movies_file)
        .with_context(|| format!("Failed to load {}", config.movies_file.display()))?
        .with_max_records(config.index_max_records);
    info!("Catalog loaded with {} movies", catalog.len());

    let store = Arc::new(InMemoryInteractionStore::new());
    InteractionSeeder::new(store.clone())
        .seed()
        .await
        .context("Failed to seed interactions")?;

    let orchestrator = MovieOrchestrator::new(store, Arc::new(catalog), &config);
    let cancel = CancellationToken::new();

    let recommendations = orchestrator.get_recommendations(DUMMY_USER_ID, &cancel).await?;
    info!("Received {} recommendations:", recommendations.len());
    for (i, movie) in recommendations.iter().enumerate() {
        info!("{}. {} ({})", i + 1, movie.title, movie.year);
        info!("   Genres: {}", movie.genres.join(", "));
    }

    let suggestions = orchestrator
        .search(DUMMY_USER_ID, SearchRequest::new("", 5, 10), &cancel)
        .await?;
    info!("Recent searches: {:?}", suggestions.last_searched_keywords);
    info!("Suggested keywords: {:?}", suggestions.recommended_keywords);

    let results = orchestrator
        .search(DUMMY_USER_ID, SearchRequest::new("toy", 5, 10), &cancel)
        .await?;
    info!("Search for \"toy\" returned {} movies:", results.searched_movies.len());
    for movie in &results.searched_movies {
        info!("   {} - {} ({})", movie.id, movie.title, movie.year);
    }

    Ok(())
}
