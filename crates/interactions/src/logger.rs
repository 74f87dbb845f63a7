//! Interaction Logger - the write path.
//!
//! Every call appends exactly one event stamped with the current UTC time.
//! Calls are not idempotent: logging the same action twice records it twice.

use crate::store::{InteractionStore, StoreError};
use crate::types::{InteractionEvent, InteractionKind};
use catalog::MovieId;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from logging an interaction
#[derive(Error, Debug)]
pub enum LogError {
    #[error("User id must not be empty")]
    MissingUser,

    #[error("A {0} interaction needs a movie id")]
    MissingMovieId(InteractionKind),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Appends interaction events to a store
#[derive(Clone)]
pub struct InteractionLogger {
    store: Arc<dyn InteractionStore>,
}

impl InteractionLogger {
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self { store }
    }

    /// Record one interaction and return the event as written.
    ///
    /// View and click events keep the movie fields and drop `keyword`; search
    /// events keep `keyword` and drop the movie fields.
    #[instrument(skip(self, movie_name, keyword), fields(kind = %kind))]
    pub async fn log_interaction(
        &self,
        kind: InteractionKind,
        user_id: &str,
        movie_id: Option<MovieId>,
        movie_name: Option<String>,
        keyword: Option<String>,
    ) -> Result<InteractionEvent, LogError> {
        if user_id.trim().is_empty() {
            return Err(LogError::MissingUser);
        }

        let now = Utc::now();
        let event = match kind {
            InteractionKind::View | InteractionKind::Click => {
                let movie_id = movie_id.ok_or(LogError::MissingMovieId(kind))?;
                InteractionEvent::movie(kind, user_id, movie_id, movie_name, now)
            }
            InteractionKind::Search => {
                InteractionEvent::search(user_id, keyword.unwrap_or_default(), now)
            }
        };

        self.store.append_event(event.clone()).await?;
        debug!(movie_id = ?event.movie_id, "Logged interaction");
        Ok(event)
    }
}
