//! Interaction domain types.
//!
//! An interaction is one recorded user action: viewing a movie, clicking a
//! movie, or running a search. Events are immutable once written; counts are
//! derived from them per request and thrown away afterwards.

use catalog::MovieId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque identifier of the user who performed an action
pub type UserId = String;

// =============================================================================
// InteractionKind
// =============================================================================

/// The kind of action a user performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Click,
    Search,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Click => "click",
            InteractionKind::Search => "search",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no interaction kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown interaction kind: {0} (expected view, click or search)")]
pub struct ParseKindError(pub String);

impl FromStr for InteractionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(InteractionKind::View),
            "click" => Ok(InteractionKind::Click),
            "search" => Ok(InteractionKind::Search),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

// =============================================================================
// InteractionEvent
// =============================================================================

/// One recorded user action.
///
/// View and click events carry the movie; search events carry the keyword and
/// no movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub user_id: UserId,
    pub movie_id: Option<MovieId>,
    pub movie_name: Option<String>,
    pub keyword: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub kind: InteractionKind,
}

impl InteractionEvent {
    /// A view or click on a movie
    pub fn movie(
        kind: InteractionKind,
        user_id: impl Into<UserId>,
        movie_id: MovieId,
        movie_name: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            movie_id: Some(movie_id),
            movie_name,
            keyword: None,
            timestamp,
            kind,
        }
    }

    /// A search for `keyword`
    pub fn search(
        user_id: impl Into<UserId>,
        keyword: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            movie_id: None,
            movie_name: None,
            keyword: Some(keyword.into()),
            timestamp,
            kind: InteractionKind::Search,
        }
    }
}

// =============================================================================
// MovieCount
// =============================================================================

/// Number of interactions of one kind recorded for a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCount {
    pub movie_id: MovieId,
    pub movie_name: Option<String>,
    pub count: u32,
    pub kind: InteractionKind,
}

impl MovieCount {
    pub fn new(movie_id: MovieId, count: u32, kind: InteractionKind) -> Self {
        Self {
            movie_id,
            movie_name: None,
            count,
            kind,
        }
    }

    pub fn with_name(mut self, movie_name: impl Into<String>) -> Self {
        self.movie_name = Some(movie_name.into());
        self
    }
}

// =============================================================================
// Query shapes
// =============================================================================

/// How grouped counts are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// One row per movie id; rows carry no name
    Movie,
    /// One row per (movie id, movie name) pair
    MovieAndName,
}

/// Ordering of queried events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrder {
    /// The order events were appended in
    Insertion,
    /// Latest timestamp first; equal timestamps put the later append first
    NewestFirst,
}

/// Restricts which events a store query sees.
///
/// An empty filter matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub user_id: Option<UserId>,
    pub excluded_movie_ids: HashSet<MovieId>,
    pub excluded_movie_name: Option<String>,
    pub keyword_prefix: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only events performed by `user_id`
    pub fn for_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Drop events on any of `ids`
    pub fn excluding_movies(mut self, ids: impl IntoIterator<Item = MovieId>) -> Self {
        self.excluded_movie_ids.extend(ids);
        self
    }

    /// Drop events whose movie name equals `name` exactly
    pub fn excluding_movie_name(mut self, name: impl Into<String>) -> Self {
        self.excluded_movie_name = Some(name.into());
        self
    }

    /// Only events whose keyword starts with `prefix`, ignoring case
    pub fn with_keyword_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.keyword_prefix = Some(prefix.into());
        self
    }

    /// Whether `event` passes every restriction of this filter
    pub fn matches(&self, event: &InteractionEvent) -> bool {
        if let Some(user_id) = &self.user_id {
            if &event.user_id != user_id {
                return false;
            }
        }
        if let Some(movie_id) = event.movie_id {
            if self.excluded_movie_ids.contains(&movie_id) {
                return false;
            }
        }
        if let Some(name) = &self.excluded_movie_name {
            if event.movie_name.as_deref() == Some(name.as_str()) {
                return false;
            }
        }
        if let Some(prefix) = &self.keyword_prefix {
            match &event.keyword {
                Some(keyword) if keyword.to_lowercase().starts_with(&prefix.to_lowercase()) => {}
                _ => return false,
            }
        }
        true
    }
}
