//! Once-only snapshot initialization
//!
//! Concurrent first callers all wait on the same load; the loader runs at most
//! once per cell. A failed load leaves the cell empty so a later call can retry.

use crate::{MemoryStore, StoreError};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Holder for the process-wide store handle
#[derive(Debug, Default)]
pub struct SnapshotCell {
    cell: OnceCell<Arc<MemoryStore>>,
}

impl SnapshotCell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the store, running `load` first if nothing is loaded yet
    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<MemoryStore>, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MemoryStore, StoreError>>,
    {
        let store = self
            .cell
            .get_or_try_init(|| async {
                debug!("Initializing incident snapshot");
                load().await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(store))
    }

    /// Return the store, loading it from a JSON file on first use
    pub async fn get_or_load_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Arc<MemoryStore>, StoreError> {
        let path = path.as_ref().to_path_buf();
        self.get_or_load(|| async move {
            let contents = tokio::fs::read_to_string(&path).await?;
            MemoryStore::from_json_str(&contents)
        })
        .await
    }

    /// The loaded store, if any
    pub fn get(&self) -> Option<Arc<MemoryStore>> {
        self.cell.get().cloned()
    }
}
