//! In-memory Interaction Store.
//!
//! Keeps every event in an append-only `Vec` behind a `tokio::sync::RwLock`.
//! Readers share the lock; each append holds the write lock only for a single
//! `push`, so a write is either fully visible or not at all.

use crate::aggregator::group_counts;
use crate::store::{InteractionStore, StoreError};
use crate::types::*;
use tokio::sync::RwLock;
use tracing::debug;

/// Append-only event log held in memory
#[derive(Debug, Default)]
pub struct InMemoryInteractionStore {
    events: RwLock<Vec<InteractionEvent>>,
}

impl InMemoryInteractionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `events` (kept in the given order)
    pub fn from_events(events: Vec<InteractionEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Number of stored events
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Copy of every stored event in append order
    pub async fn snapshot(&self) -> Vec<InteractionEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait::async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn count_events(
        &self,
        kind: InteractionKind,
        filter: &EventFilter,
        key: GroupKey,
    ) -> Result<Vec<MovieCount>, StoreError> {
        let events = self.events.read().await;
        let counts = group_counts(events.iter().filter(|e| filter.matches(e)), kind, key);
        debug!(kind = %kind, rows = counts.len(), "Counted events");
        Ok(counts)
    }

    async fn query_events(
        &self,
        kind: InteractionKind,
        filter: &EventFilter,
        order: EventOrder,
        limit: Option<usize>,
    ) -> Result<Vec<InteractionEvent>, StoreError> {
        let events = self.events.read().await;
        let matching = |e: &&InteractionEvent| e.kind == kind && filter.matches(e);

        let mut selected: Vec<InteractionEvent> = match order {
            EventOrder::Insertion => events.iter().filter(matching).cloned().collect(),
            EventOrder::NewestFirst => {
                // Reverse first so the stable sort keeps later appends ahead on ties
                let mut newest: Vec<InteractionEvent> =
                    events.iter().rev().filter(matching).cloned().collect();
                newest.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                newest
            }
        };

        if let Some(limit) = limit {
            selected.truncate(limit);
        }
        Ok(selected)
    }

    async fn append_event(&self, event: InteractionEvent) -> Result<(), StoreError> {
        self.events.write().await.push(event);
        Ok(())
    }
}
