use serde::Deserialize;

use crate::services::SeedPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the catalog CSV file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Recommendation count used when a request does not specify one
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Maximum number of entries returned by song search
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Skip unknown seed songs instead of failing the whole request
    #[serde(default)]
    pub skip_unknown_seeds: bool,
}

fn default_catalog_path() -> String {
    "data.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendations() -> usize {
    10
}

fn default_search_limit() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Seed handling policy selected by `skip_unknown_seeds`
    pub fn seed_policy(&self) -> SeedPolicy {
        if self.skip_unknown_seeds {
            SeedPolicy::SkipUnknown
        } else {
            SeedPolicy::FailBatch
        }
    }
}
