use crate::metrics::Metrics;
use hsn_core::{ClassificationTable, HsnError, LookupOptions, TableSource};
use std::io;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub type SharedState = Arc<AppState>;

/// The table currently being served and how many swaps produced it
pub struct LoadedTable {
    pub table: Arc<ClassificationTable>,
    pub generation: u64,
}

pub struct AppState {
    loaded: RwLock<LoadedTable>,
    // Serializes reloads so two slow fetches cannot race to swap.
    reload_guard: Mutex<()>,
    pub source: TableSource,
    pub options: LookupOptions,
    pub search_limit: usize,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        table: ClassificationTable,
        source: TableSource,
        options: LookupOptions,
        search_limit: usize,
    ) -> Self {
        Self {
            loaded: RwLock::new(LoadedTable {
                table: Arc::new(table),
                generation: 0,
            }),
            reload_guard: Mutex::new(()),
            source,
            options,
            search_limit,
            metrics: Metrics::default(),
        }
    }

    /// Snapshot of the current table. Callers resolve against the `Arc`
    /// without holding the lock.
    pub async fn table(&self) -> (Arc<ClassificationTable>, u64) {
        let loaded = self.loaded.read().await;
        (Arc::clone(&loaded.table), loaded.generation)
    }

    /// Swap in a new table whole, returning the new generation
    pub async fn replace_table(&self, table: ClassificationTable) -> u64 {
        let mut loaded = self.loaded.write().await;
        loaded.table = Arc::new(table);
        loaded.generation += 1;
        loaded.generation
    }

    /// Reload from the configured source. On failure the old table stays.
    pub async fn reload(&self) -> Result<(usize, u64), HsnError> {
        let _guard = self.reload_guard.lock().await;

        let source = self.source.clone();
        let table = tokio::task::spawn_blocking(move || source.load())
            .await
            .map_err(|err| HsnError::Io(io::Error::other(format!("table load task failed: {err}"))))??;

        let entries = table.len();
        let generation = self.replace_table(table).await;
        Ok((entries, generation))
    }
}
