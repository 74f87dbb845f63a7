//! # Interactions Crate
//!
//! User interaction events (views, clicks, searches) and everything that reads
//! or writes them.
//!
//! ## Components
//!
//! ### Interaction Store
//! The `InteractionStore` trait is the only way events are read or appended.
//! `InMemoryInteractionStore` is the reference implementation; `journal`
//! persists events as JSON lines between runs.
//!
//! ### Interaction Aggregator
//! Turns events into per-movie counts:
//! - `count_by_kind_excluding`: home flow, drops already-viewed movies
//! - `count_by_kind_matching`: suggestion flow, keyed by movie and name
//! - `distinct_movie_ids` / `last_searches`: per-user lookups
//!
//! ### Interaction Logger
//! The write path: one call, one appended event.
//!
//! ## Example Usage
//!
//! ```ignore
//! use interactions::{InMemoryInteractionStore, InteractionAggregator, InteractionKind};
//! use std::collections::HashSet;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryInteractionStore::new());
//! let aggregator = InteractionAggregator::new(store.clone());
//!
//! let viewed = aggregator.distinct_movie_ids(InteractionKind::View, "user1").await?;
//! let excluded: HashSet<_> = viewed.into_iter().collect();
//! let views = aggregator.count_by_kind_excluding(InteractionKind::View, &excluded).await?;
//! ```

// Public modules
pub mod types;
pub mod store;
pub mod memory;
pub mod aggregator;
pub mod logger;
pub mod journal;
pub mod seeder;

// Re-export commonly used types
pub use aggregator::{group_counts, InteractionAggregator, DEFAULT_AGGREGATION_CAP};
pub use journal::{append_to_journal, load_journal};
pub use logger::{InteractionLogger, LogError};
pub use memory::InMemoryInteractionStore;
pub use seeder::{InteractionSeeder, DUMMY_MOVIE_NAMES, DUMMY_USER_ID};
pub use store::{InteractionStore, StoreError};
pub use types::{
    EventFilter, EventOrder, GroupKey, InteractionEvent, InteractionKind, MovieCount,
    ParseKindError, UserId,
};
