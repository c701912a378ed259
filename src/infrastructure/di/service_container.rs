//! Service container for dependency injection
//!
//! Wires the node service to a persisted row store.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::NodeService;
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::file::TomlFileStore;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Nested-set operations over the configured store file
    pub nodes: NodeService<TomlFileStore>,
}

impl ServiceContainer {
    /// Open the store named by `settings.store_path`.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let store = TomlFileStore::open(&settings.store_path)?;
        Ok(Self::with_store(settings, store))
    }

    /// Create a service container around an already opened store (for testing).
    pub fn with_store(settings: Settings, store: TomlFileStore) -> Self {
        let nodes = NodeService::new(store).with_verify_reads(settings.verify_reads);
        Self {
            settings: Arc::new(settings),
            nodes,
        }
    }

    /// Persist pending mutations and release the store.
    pub fn commit(self) -> InfraResult<()> {
        let mut store = self.nodes.into_store()?;
        debug!(dirty = store.is_dirty(), path = %store.path().display(), "commit");
        store.flush()
    }
}
