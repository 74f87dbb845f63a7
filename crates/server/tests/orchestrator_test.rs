//! Integration tests for the orchestrator.
//!
//! These run the home, search and logging flows end to end against the
//! in-memory store and catalog, plus test doubles for failing and hanging
//! collaborators.

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use catalog::{CatalogMovie, MovieCatalog, MovieId, SearchIndex, SearchIndexError};
use chrono::Utc;
use interactions::*;
use server::{
    CancellationToken, EngineConfig, EngineError, LogRequest, MovieOrchestrator, SearchOutcome,
    SearchRequest,
};

// =============================================================================
// Test doubles
// =============================================================================

/// Store whose every call fails
struct FailingStore;

#[async_trait::async_trait]
impl InteractionStore for FailingStore {
    async fn count_events(
        &self,
        _kind: InteractionKind,
        _filter: &EventFilter,
        _key: GroupKey,
    ) -> Result<Vec<MovieCount>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn query_events(
        &self,
        _kind: InteractionKind,
        _filter: &EventFilter,
        _order: EventOrder,
        _limit: Option<usize>,
    ) -> Result<Vec<InteractionEvent>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn append_event(&self, _event: InteractionEvent) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Store whose reads never complete
struct PendingStore;

#[async_trait::async_trait]
impl InteractionStore for PendingStore {
    async fn count_events(
        &self,
        _kind: InteractionKind,
        _filter: &EventFilter,
        _key: GroupKey,
    ) -> Result<Vec<MovieCount>, StoreError> {
        std::future::pending().await
    }

    async fn query_events(
        &self,
        _kind: InteractionKind,
        _filter: &EventFilter,
        _order: EventOrder,
        _limit: Option<usize>,
    ) -> Result<Vec<InteractionEvent>, StoreError> {
        std::future::pending().await
    }

    async fn append_event(&self, _event: InteractionEvent) -> Result<(), StoreError> {
        std::future::pending().await
    }
}

/// Index that fails and counts how often it was asked
#[derive(Default)]
struct FailingIndex {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl SearchIndex for FailingIndex {
    async fn fetch_by_ids(&self, _ids: &[MovieId]) -> Result<Vec<CatalogMovie>, SearchIndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SearchIndexError::Unavailable("index offline".to_string()))
    }

    async fn search_by_keyword(
        &self,
        _keyword: &str,
        _limit: usize,
    ) -> Result<Vec<CatalogMovie>, SearchIndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SearchIndexError::Unavailable("index offline".to_string()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn create_test_catalog() -> MovieCatalog {
    let titles = [
        (1, "Toy Story"),
        (2, "Jumanji"),
        (3, "Grumpier Old Men"),
        (4, "Waiting to Exhale"),
        (5, "Father of the Bride Part II"),
        (6, "Heat"),
        (9, "Sudden Death"),
        (10, "GoldenEye"),
        (3114, "Toy Story 2"),
    ];
    titles
        .into_iter()
        .map(|(id, title)| CatalogMovie::new(id, title, 1995, vec!["Comedy".to_string()]))
        .collect()
}

fn view(user: &str, id: MovieId, name: &str) -> InteractionEvent {
    InteractionEvent::movie(InteractionKind::View, user, id, Some(name.to_string()), Utc::now())
}

fn click(user: &str, id: MovieId, name: &str) -> InteractionEvent {
    InteractionEvent::movie(InteractionKind::Click, user, id, Some(name.to_string()), Utc::now())
}

fn orchestrator_with(events: Vec<InteractionEvent>) -> (Arc<InMemoryInteractionStore>, MovieOrchestrator) {
    let store = Arc::new(InMemoryInteractionStore::from_events(events));
    let orchestrator = MovieOrchestrator::new(
        store.clone(),
        Arc::new(create_test_catalog()),
        &EngineConfig::default(),
    );
    (store, orchestrator)
}

async fn seeded_orchestrator() -> MovieOrchestrator {
    let (store, orchestrator) = orchestrator_with(Vec::new());
    InteractionSeeder::new(store).seed().await.unwrap();
    orchestrator
}

fn ids(movies: &[CatalogMovie]) -> Vec<MovieId> {
    movies.iter().map(|m| m.id).collect()
}

// =============================================================================
// Home flow
// =============================================================================

#[tokio::test]
async fn test_recommendations_follow_score_not_index_order() {
    let mut events = vec![view("alice", 1, "Toy Story")];
    events.extend((0..3).map(|_| view("bob", 9, "Sudden Death")));
    events.extend((0..2).map(|_| click("bob", 5, "Father of the Bride Part II")));
    events.push(click("bob", 1, "Toy Story"));
    let (_store, orchestrator) = orchestrator_with(events);

    let movies = orchestrator
        .get_recommendations("alice", &CancellationToken::new())
        .await
        .unwrap();

    // 9 scores 15 and 5 scores 2; 1 is excluded because alice viewed it
    assert_eq!(ids(&movies), vec![9, 5]);
}

#[tokio::test]
async fn test_recommendations_respect_index_record_cap() {
    let catalog: MovieCatalog = (1..=30)
        .map(|id| CatalogMovie::new(id, format!("Movie {}", id), 2000, vec!["Drama".to_string()]))
        .collect::<MovieCatalog>()
        .with_max_records(3);
    let events: Vec<_> = (1..=10)
        .flat_map(|id| (0..id).map(move |_| view("bob", id, "")))
        .collect();
    let config = EngineConfig {
        index_max_records: 3,
        ..EngineConfig::default()
    };
    let store = Arc::new(InMemoryInteractionStore::from_events(events));
    let orchestrator = MovieOrchestrator::new(store, Arc::new(catalog), &config);

    let movies = orchestrator
        .get_recommendations("alice", &CancellationToken::new())
        .await
        .unwrap();

    // Only three rows fit through the index, so they must be the best three
    assert_eq!(ids(&movies), vec![10, 9, 8]);
}

#[tokio::test]
async fn test_recommendations_for_seeded_user() {
    let orchestrator = seeded_orchestrator().await;

    let movies = orchestrator
        .get_recommendations(DUMMY_USER_ID, &CancellationToken::new())
        .await
        .unwrap();

    // Every viewed movie is excluded, odd clicked ids remain
    assert_eq!(ids(&movies), vec![1, 3, 5, 9]);
}

#[tokio::test]
async fn test_empty_store_skips_index() {
    let index = Arc::new(FailingIndex::default());
    let orchestrator = MovieOrchestrator::new(
        Arc::new(InMemoryInteractionStore::new()),
        index.clone(),
        &EngineConfig::default(),
    );

    let movies = orchestrator
        .get_recommendations("alice", &CancellationToken::new())
        .await
        .unwrap();

    assert!(movies.is_empty());
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Search flow
// =============================================================================

#[tokio::test]
async fn test_empty_query_without_history_suggests_keywords() {
    let events = vec![
        click("bob", 1, "Toy Story"),
        view("bob", 6, "Heat"),
        view("bob", 6, "Heat"),
    ];
    let (_store, orchestrator) = orchestrator_with(events);

    let outcome = orchestrator
        .search("alice", SearchRequest::new("", 5, 10), &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.last_searched_keywords.is_empty());
    assert!(outcome.recommended_keywords.len() <= 10);
    assert_eq!(outcome.recommended_keywords, vec!["Heat".to_string(), "Toy Story".to_string()]);
    assert!(outcome.searched_movies.is_empty());
}

#[tokio::test]
async fn test_empty_query_for_seeded_user() {
    let orchestrator = seeded_orchestrator().await;

    let outcome = orchestrator
        .search(DUMMY_USER_ID, SearchRequest::new("", 5, 10), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome.last_searched_keywords,
        vec!["GoldenEye", "Sudden Death", "Tom and Huck", "Sabrina", "Heat"]
    );
    assert_eq!(
        outcome.recommended_keywords,
        vec!["Jumanji", "Waiting to Exhale", "Heat", "Tom and Huck", "GoldenEye"]
    );
}

#[tokio::test]
async fn test_whitespace_query_is_empty() {
    let orchestrator = seeded_orchestrator().await;

    let outcome = orchestrator
        .search(DUMMY_USER_ID, SearchRequest::new("   ", 0, 10), &CancellationToken::new())
        .await
        .unwrap();

    assert!(outcome.last_searched_keywords.is_empty());
    assert_eq!(outcome.recommended_keywords.len(), 10);
    assert!(outcome.searched_movies.is_empty());
}

#[tokio::test]
async fn test_keyword_search_reorders_hits_by_score() {
    let events = (0..3).map(|_| click("bob", 3114, "Toy Story 2")).collect();
    let (_store, orchestrator) = orchestrator_with(events);
    let cancel = CancellationToken::new();

    // Index order is "Toy Story", "Toy Story 2"; the clicks flip it
    let hits = orchestrator.find_movies("toy", &cancel).await.unwrap();
    assert_eq!(ids(&hits), vec![1, 3114]);

    let outcome = orchestrator
        .search("alice", SearchRequest::new("toy", 5, 10), &cancel)
        .await
        .unwrap();
    assert_eq!(ids(&outcome.searched_movies), vec![3114, 1]);
    assert!(outcome.recommended_keywords.is_empty());

    let outcome = orchestrator
        .search("alice", SearchRequest::new("toy", 5, 1), &cancel)
        .await
        .unwrap();
    assert_eq!(ids(&outcome.searched_movies), vec![3114]);
}

#[tokio::test]
async fn test_recent_searches_use_up_the_budget() {
    let orchestrator = seeded_orchestrator().await;

    let outcome = orchestrator
        .search(DUMMY_USER_ID, SearchRequest::new("toy", 5, 1), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.last_searched_keywords, vec!["Toy Story"]);
    assert!(outcome.searched_movies.is_empty());
}

#[tokio::test]
async fn test_negative_limits_clamp_to_zero() {
    let orchestrator = seeded_orchestrator().await;

    let outcome = orchestrator
        .search(DUMMY_USER_ID, SearchRequest::new("heat", -3, -1), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, SearchOutcome::default());
}

#[tokio::test]
async fn test_search_requires_user() {
    let (_store, orchestrator) = orchestrator_with(Vec::new());

    let result = orchestrator
        .search("", SearchRequest::new("toy", 5, 10), &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

// =============================================================================
// Logging
// =============================================================================

#[tokio::test]
async fn test_logged_views_change_recommendations() {
    let (store, orchestrator) = orchestrator_with(vec![click("bob", 6, "Heat")]);
    let cancel = CancellationToken::new();

    let before = orchestrator.get_recommendations("alice", &cancel).await.unwrap();
    assert_eq!(ids(&before), vec![6]);

    orchestrator
        .log_action(LogRequest::movie(InteractionKind::View, 6, "Heat"), "alice", &cancel)
        .await
        .unwrap();
    orchestrator
        .log_action(LogRequest::search("heat"), "alice", &cancel)
        .await
        .unwrap();
    assert_eq!(store.len().await, 3);

    let after = orchestrator.get_recommendations("alice", &cancel).await.unwrap();
    assert!(after.is_empty(), "Viewed movies are excluded");
}

#[tokio::test]
async fn test_log_validation() {
    let (store, orchestrator) = orchestrator_with(Vec::new());
    let cancel = CancellationToken::new();

    let no_movie = LogRequest {
        kind: InteractionKind::Click,
        movie_id: None,
        movie_name: Some("Heat".to_string()),
        keyword: None,
    };
    let result = orchestrator.log_action(no_movie, "alice", &cancel).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    let result = orchestrator
        .log_action(LogRequest::search("heat"), " ", &cancel)
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    assert!(store.is_empty().await);
}

// =============================================================================
// Lookups
// =============================================================================

#[tokio::test]
async fn test_movie_by_id() {
    let (_store, orchestrator) = orchestrator_with(Vec::new());
    let cancel = CancellationToken::new();

    let movie = orchestrator.movie_by_id(6, &cancel).await.unwrap();
    assert_eq!(movie.map(|m| m.title), Some("Heat".to_string()));
    assert!(orchestrator.movie_by_id(404, &cancel).await.unwrap().is_none());
    assert!(orchestrator.find_movies("  ", &cancel).await.unwrap().is_empty());
}

// =============================================================================
// Failures and cancellation
// =============================================================================

#[tokio::test]
async fn test_store_failure_is_surfaced() {
    let orchestrator = MovieOrchestrator::new(
        Arc::new(FailingStore),
        Arc::new(create_test_catalog()),
        &EngineConfig::default(),
    );
    let cancel = CancellationToken::new();

    let err = orchestrator.get_recommendations("alice", &cancel).await.unwrap_err();
    assert!(matches!(err, EngineError::StoreAccess(_)));
    assert!(err.source().is_some());

    let err = orchestrator
        .log_action(LogRequest::search("heat"), "alice", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StoreAccess(_)));
}

#[tokio::test]
async fn test_index_failure_is_surfaced() {
    let index = Arc::new(FailingIndex::default());
    let store = Arc::new(InMemoryInteractionStore::from_events(vec![click("bob", 6, "Heat")]));
    let orchestrator = MovieOrchestrator::new(store, index.clone(), &EngineConfig::default());
    let cancel = CancellationToken::new();

    let err = orchestrator.get_recommendations("alice", &cancel).await.unwrap_err();
    assert!(matches!(err, EngineError::SearchIndex(_)));

    let err = orchestrator
        .search("alice", SearchRequest::new("heat", 5, 10), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SearchIndex(_)));
    assert_eq!(index.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cancellation_interrupts_hanging_store() {
    let orchestrator = MovieOrchestrator::new(
        Arc::new(PendingStore),
        Arc::new(create_test_catalog()),
        &EngineConfig::default(),
    );
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.search("alice", SearchRequest::new("toy", 5, 10), &cancel),
    )
    .await
    .expect("cancellation should end the request");
    assert!(matches!(result, Err(EngineError::Cancelled)));

    let result = orchestrator.get_recommendations("alice", &cancel).await;
    assert!(matches!(result, Err(EngineError::Cancelled)));
}

#[tokio::test]
async fn test_cancelled_log_writes_nothing() {
    let (store, orchestrator) = orchestrator_with(Vec::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = orchestrator
        .log_action(LogRequest::movie(InteractionKind::View, 1, "Toy Story"), "alice", &cancel)
        .await;

    assert!(matches!(result, Err(EngineError::Cancelled)));
    assert!(store.is_empty().await);
}
