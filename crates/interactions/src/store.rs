//! The Interaction Store contract.
//!
//! Everything the ranking core reads about user behaviour comes through this
//! trait. The store owns the events; the core only counts and queries them.

use crate::types::{EventFilter, EventOrder, GroupKey, InteractionEvent, InteractionKind, MovieCount};
use thiserror::Error;

/// Errors surfaced by an interaction store.
///
/// The core never retries on these; retry policy belongs to the store client.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached at all
    #[error("Interaction store unavailable: {0}")]
    Unavailable(String),

    /// The store was reached but the query failed
    #[error("Interaction query failed: {0}")]
    Query(String),

    /// Reading or writing the event journal failed
    #[error("Journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A journal line could not be encoded or decoded
    #[error("Journal serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read/append access to recorded interaction events.
///
/// ## Design Note
/// - `Send + Sync` so one store can serve concurrent requests
/// - Appends are independent: concurrent writers need no coordination
///   beyond what the store does internally
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    /// Group events of `kind` that pass `filter` and count them.
    ///
    /// Rows come back in no particular order. Events without a movie id never
    /// produce a row.
    async fn count_events(
        &self,
        kind: InteractionKind,
        filter: &EventFilter,
        key: GroupKey,
    ) -> Result<Vec<MovieCount>, StoreError>;

    /// Events of `kind` that pass `filter`, in `order`, at most `limit` of them.
    async fn query_events(
        &self,
        kind: InteractionKind,
        filter: &EventFilter,
        order: EventOrder,
        limit: Option<usize>,
    ) -> Result<Vec<InteractionEvent>, StoreError>;

    /// Append one event.
    async fn append_event(&self, event: InteractionEvent) -> Result<(), StoreError>;
}
