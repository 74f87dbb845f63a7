//! Server crate for the ReelSearch ranking engine.
//!
//! This crate wires the catalog, the interaction store and the ranking
//! functions into the recommendation and search pipelines, and exposes them
//! through `MovieOrchestrator`.

mod cancel;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod recommendation;
pub mod search;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use orchestrator::{LogRequest, MovieOrchestrator};
pub use recommendation::RecommendationPipeline;
pub use search::{SearchOutcome, SearchPipeline, SearchRequest};

// Re-exported so callers can build requests without depending on tokio-util
pub use tokio_util::sync::CancellationToken;
