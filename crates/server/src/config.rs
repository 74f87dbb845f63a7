//! Engine configuration.
//!
//! Every field has a default, so an empty environment yields a working
//! configuration. Variables use the `REEL_` prefix, e.g. `REEL_VIEW_FACTOR=3`.

use serde::Deserialize;
use std::path::PathBuf;

/// Tunables for scoring, selection and data loading
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Weight of one view
    #[serde(default = "default_view_factor")]
    pub view_factor: u32,

    /// Weight of one click
    #[serde(default = "default_click_factor")]
    pub click_factor: u32,

    /// Number of movies returned by the home flow
    #[serde(default = "default_home_top_count")]
    pub home_top_count: usize,

    /// Row cap on per-kind counts in the home flow
    #[serde(default = "default_aggregation_cap")]
    pub aggregation_cap: usize,

    /// Maximum documents requested from the search index per lookup
    #[serde(default = "default_index_max_records")]
    pub index_max_records: usize,

    /// Keyword suggestions offered for an empty query, before subtracting
    /// the user's recent searches
    #[serde(default = "default_keyword_suggestions")]
    pub keyword_suggestions: usize,

    /// MovieLens `movies.dat` file to load the catalog from
    #[serde(default = "default_movies_file")]
    pub movies_file: PathBuf,
}

fn default_view_factor() -> u32 {
    5
}

fn default_click_factor() -> u32 {
    1
}

fn default_home_top_count() -> usize {
    20
}

fn default_aggregation_cap() -> usize {
    20
}

fn default_index_max_records() -> usize {
    20
}

fn default_keyword_suggestions() -> usize {
    10
}

fn default_movies_file() -> PathBuf {
    PathBuf::from("data/movies.dat")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            view_factor: default_view_factor(),
            click_factor: default_click_factor(),
            home_top_count: default_home_top_count(),
            aggregation_cap: default_aggregation_cap(),
            index_max_records: default_index_max_records(),
            keyword_suggestions: default_keyword_suggestions(),
            movies_file: default_movies_file(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `REEL_*` environment variables (and `.env`)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("REEL_")
            .from_env::<EngineConfig>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Load configuration from explicit `REEL_*` key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("REEL_")
            .from_iter::<_, EngineConfig>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
