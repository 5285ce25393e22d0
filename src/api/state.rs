use std::sync::Arc;

use crate::catalog::SongCatalog;
use crate::config::Config;
use crate::services::Recommender;

/// Shared application state
///
/// Catalog and recommender are immutable once the server is up, so the
/// state is plain shared references with no locking: concurrent requests
/// only ever read.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SongCatalog>,
    pub recommender: Arc<Recommender>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates the application state from its startup-built parts
    pub fn new(catalog: Arc<SongCatalog>, recommender: Recommender, config: Config) -> Self {
        Self {
            catalog,
            recommender: Arc::new(recommender),
            config: Arc::new(config),
        }
    }
}
