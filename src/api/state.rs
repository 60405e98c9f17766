//! Application state for the cost dashboard API.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ConfigLoader;
use crate::dashboard::DataStore;

/// Shared application state.
///
/// One operator session: every request takes the store lock for its whole
/// load, command and persist cycle, so interactions never interleave.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<DataStore>>,
}

impl AppState {
    /// Creates the state around a data store.
    pub fn new(store: DataStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Creates the state from a loaded configuration.
    pub fn from_config(config: ConfigLoader) -> Self {
        Self::new(DataStore::new(config.into_config()))
    }

    /// Returns the shared store.
    pub fn store(&self) -> &Mutex<DataStore> {
        &self.store
    }
}
