//! Dummy interaction data for a fresh store.
//!
//! Gives the demo user some history so the home and suggestion flows have
//! something to rank. Each kind is seeded only while the store holds no event
//! of that kind.

use crate::store::{InteractionStore, StoreError};
use crate::types::{EventFilter, EventOrder, InteractionEvent, InteractionKind};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// The user all dummy interactions belong to
pub const DUMMY_USER_ID: &str = "user1";

/// Titles attached to dummy clicks, views and searches
pub const DUMMY_MOVIE_NAMES: [&str; 20] = [
    "Toy Story",
    "Jumanji",
    "Grumpier Old Men",
    "Waiting to Exhale",
    "Father of the Bride Part II",
    "Heat",
    "Sabrina",
    "Tom and Huck",
    "Sudden Death",
    "GoldenEye",
    "American President",
    "Dracula: Dead and Loving It",
    "Balto",
    "Nixon",
    "Cutthroat Island",
    "Casino",
    "Sense and Sensibility",
    "Four Rooms",
    "Ace Ventura: When Nature Calls",
    "Money Train",
];

const EVENTS_PER_KIND: u32 = 10;

/// Populates an empty store with dummy history
pub struct InteractionSeeder {
    store: Arc<dyn InteractionStore>,
}

impl InteractionSeeder {
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self { store }
    }

    /// Seed every kind that has no events yet; returns how many events were added
    pub async fn seed(&self) -> Result<usize, StoreError> {
        let mut added = 0;
        for kind in [InteractionKind::Click, InteractionKind::View, InteractionKind::Search] {
            if self.has_events(kind).await? {
                continue;
            }
            for event in dummy_events(kind) {
                self.store.append_event(event).await?;
                added += 1;
            }
        }

        if added > 0 {
            info!("Seeded {} dummy interactions for {}", added, DUMMY_USER_ID);
        }
        Ok(added)
    }

    async fn has_events(&self, kind: InteractionKind) -> Result<bool, StoreError> {
        let existing = self
            .store
            .query_events(kind, &EventFilter::new(), EventOrder::Insertion, Some(1))
            .await?;
        Ok(!existing.is_empty())
    }
}

/// Ten dummy events of `kind`.
///
/// - clicks: ids 1..=10, named after the matching list entry
/// - views: ids 2, 4, .., 20, named after the matching list entry
/// - searches: the first ten names, one millisecond apart
fn dummy_events(kind: InteractionKind) -> Vec<InteractionEvent> {
    let base = Utc::now();
    (1..=EVENTS_PER_KIND)
        .map(|i| {
            let at = base + Duration::milliseconds(i64::from(i));
            match kind {
                InteractionKind::Click => {
                    let name = DUMMY_MOVIE_NAMES[(i - 1) as usize];
                    InteractionEvent::movie(kind, DUMMY_USER_ID, i, Some(name.to_string()), at)
                }
                InteractionKind::View => {
                    let name = DUMMY_MOVIE_NAMES[(2 * i - 1) as usize];
                    InteractionEvent::movie(kind, DUMMY_USER_ID, 2 * i, Some(name.to_string()), at)
                }
                InteractionKind::Search => {
                    let keyword = DUMMY_MOVIE_NAMES[(i - 1) as usize];
                    InteractionEvent::search(DUMMY_USER_ID, keyword, at)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryInteractionStore;

    #[tokio::test]
    async fn test_seed_empty_store() {
        let store = Arc::new(InMemoryInteractionStore::new());
        let added = InteractionSeeder::new(store.clone()).seed().await.unwrap();
        assert_eq!(added, 30);

        let events = store.snapshot().await;
        let views: Vec<_> = events.iter().filter(|e| e.kind == InteractionKind::View).collect();
        assert_eq!(views[0].movie_id, Some(2));
        assert_eq!(views[0].movie_name.as_deref(), Some("Jumanji"));
        assert_eq!(views[9].movie_id, Some(20));
        assert_eq!(views[9].movie_name.as_deref(), Some("Money Train"));

        let clicks: Vec<_> = events.iter().filter(|e| e.kind == InteractionKind::Click).collect();
        assert_eq!(clicks[9].movie_id, Some(10));
        assert_eq!(clicks[9].movie_name.as_deref(), Some("GoldenEye"));
    }

    #[tokio::test]
    async fn test_seed_skips_populated_kinds() {
        let existing = InteractionEvent::search("someone", "heat", Utc::now());
        let store = Arc::new(InMemoryInteractionStore::from_events(vec![existing]));
        let seeder = InteractionSeeder::new(store.clone());

        assert_eq!(seeder.seed().await.unwrap(), 20);
        assert_eq!(seeder.seed().await.unwrap(), 0, "Second run adds nothing");
        assert_eq!(store.len().await, 21);
    }
}
