//! Application state shared across handlers.

use std::sync::Arc;

use notes_core::NotesStore;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
/// Each handler locks the store once and finishes its operation, response
/// snapshot included, before releasing it.
#[derive(Clone)]
pub struct AppState {
    /// In-memory notes collection.
    store: Arc<Mutex<NotesStore>>,
    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state around an existing store.
    pub fn new(store: NotesStore, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config: Arc::new(config),
        }
    }

    /// Lock the notes store for the duration of one operation.
    pub async fn store(&self) -> MutexGuard<'_, NotesStore> {
        self.store.lock().await
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
