//! Interaction Aggregator - Raw Events to Per-Movie Counts
//!
//! Turns the event log into the grouped counts the scoring step consumes.
//!
//! ## Algorithm
//! 1. Ask the store for events of one kind, restricted by an `EventFilter`
//! 2. Group by movie id (or by movie id and name), one counter per key
//! 3. Sort descending by count; ties keep first-seen order
//! 4. Cap the result
//!
//! Grouping itself lives in [`group_counts`] so any store can reuse it.

use crate::store::{InteractionStore, StoreError};
use crate::types::*;
use catalog::MovieId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default number of rows returned by `count_by_kind_excluding`
pub const DEFAULT_AGGREGATION_CAP: usize = 20;

// =============================================================================
// Grouping
// =============================================================================

/// Group events of `kind` by `key` and count each group.
///
/// Rows appear in first-seen order of their key. Events of other kinds and
/// events without a movie id are skipped, so no zero-count row is ever built.
pub fn group_counts<'a, I>(events: I, kind: InteractionKind, key: GroupKey) -> Vec<MovieCount>
where
    I: IntoIterator<Item = &'a InteractionEvent>,
{
    let mut slots: HashMap<(MovieId, Option<&'a str>), usize> = HashMap::new();
    let mut counts: Vec<MovieCount> = Vec::new();

    for event in events {
        if event.kind != kind {
            continue;
        }
        let Some(movie_id) = event.movie_id else {
            continue;
        };
        let name = match key {
            GroupKey::Movie => None,
            GroupKey::MovieAndName => event.movie_name.as_deref(),
        };

        match slots.get(&(movie_id, name)) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert((movie_id, name), counts.len());
                counts.push(MovieCount {
                    movie_id,
                    movie_name: name.map(str::to_string),
                    count: 1,
                    kind,
                });
            }
        }
    }

    counts
}

fn sort_by_count_desc(counts: &mut [MovieCount]) {
    // Stable, so equal counts keep the store's order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
}

// =============================================================================
// InteractionAggregator
// =============================================================================

/// Read-only view over an interaction store that produces grouped counts
#[derive(Clone)]
pub struct InteractionAggregator {
    store: Arc<dyn InteractionStore>,
    cap: usize,
}

impl InteractionAggregator {
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self {
            store,
            cap: DEFAULT_AGGREGATION_CAP,
        }
    }

    /// Configure the row cap of `count_by_kind_excluding` (default: 20)
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Count all events of `kind` per movie, dropping `excluded_ids`.
    ///
    /// Highest counts first, at most `cap` rows.
    #[instrument(skip(self, excluded_ids), fields(kind = %kind, excluded = excluded_ids.len()))]
    pub async fn count_by_kind_excluding(
        &self,
        kind: InteractionKind,
        excluded_ids: &HashSet<MovieId>,
    ) -> Result<Vec<MovieCount>, StoreError> {
        let filter = EventFilter::new().excluding_movies(excluded_ids.iter().copied());
        let mut counts = self.store.count_events(kind, &filter, GroupKey::Movie).await?;

        sort_by_count_desc(&mut counts);
        counts.truncate(self.cap);

        debug!("Aggregated {} {} rows", counts.len(), kind);
        Ok(counts)
    }

    /// Count events of `kind` per (movie, name), for keyword suggestions.
    ///
    /// A non-empty trimmed `keyword` drops rows whose movie name equals it
    /// exactly. Highest counts first, at most `limit` rows.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn count_by_kind_matching(
        &self,
        kind: InteractionKind,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<MovieCount>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let keyword = keyword.trim();
        let mut filter = EventFilter::new();
        if !keyword.is_empty() {
            filter = filter.excluding_movie_name(keyword);
        }

        let mut counts = self
            .store
            .count_events(kind, &filter, GroupKey::MovieAndName)
            .await?;

        sort_by_count_desc(&mut counts);
        counts.truncate(limit);

        debug!("Aggregated {} {} rows for keyword", counts.len(), kind);
        Ok(counts)
    }

    /// Movie ids `user_id` has interacted with for `kind`, first-seen order
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn distinct_movie_ids(
        &self,
        kind: InteractionKind,
        user_id: &str,
    ) -> Result<Vec<MovieId>, StoreError> {
        let filter = EventFilter::new().for_user(user_id);
        let events = self
            .store
            .query_events(kind, &filter, EventOrder::Insertion, None)
            .await?;

        let mut seen = HashSet::new();
        let ids: Vec<MovieId> = events
            .into_iter()
            .filter_map(|event| event.movie_id)
            .filter(|id| seen.insert(*id))
            .collect();

        debug!("User has {} distinct {} movies", ids.len(), kind);
        Ok(ids)
    }

    /// The user's newest search events whose keyword starts with `keyword`.
    ///
    /// An empty (or whitespace-only) keyword returns the newest searches of
    /// any keyword.
    #[instrument(skip(self))]
    pub async fn last_searches(
        &self,
        user_id: &str,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<InteractionEvent>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let keyword = keyword.trim();
        let mut filter = EventFilter::new().for_user(user_id);
        if !keyword.is_empty() {
            filter = filter.with_keyword_prefix(keyword);
        }

        self.store
            .query_events(InteractionKind::Search, &filter, EventOrder::NewestFirst, Some(limit))
            .await
    }
}
