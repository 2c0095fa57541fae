use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::UserStore;

/// Shared application state: the store handle and configuration.
///
/// The store is an explicit handle rather than a process-wide path so
/// tests can run against isolated files.
#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> Self {
        let config = Arc::new(AppConfig::from_env());
        let store = UserStore::new(&config.db_path, config.hash_cost);
        Self { store, config }
    }

    pub fn from_parts(store: UserStore, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}
