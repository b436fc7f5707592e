//! Host persistence mechanism for saved state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::saved_state::{SavedStateError, Snapshot};

/// Callback invoked by the host when it is time to save.
pub type SnapshotProvider = Arc<dyn Fn() -> Result<Snapshot, SavedStateError> + Send + Sync>;

/// Where snapshots live between runs.
///
/// The host decides when to save; it then asks every registered provider for
/// its snapshot and stores it under the provider's key.
pub trait SavedStateRegistry: Send + Sync {
    /// Snapshot stored under `key` by a previous save, if any.
    fn get(&self, key: &str) -> Option<Snapshot>;

    /// Register the provider asked for `key`'s snapshot on save. A second
    /// registration under the same key replaces the first.
    fn register_provider(&self, key: &str, provider: SnapshotProvider);

    /// Remove `provider` from `key`. Does nothing when another provider has
    /// replaced it since.
    fn unregister_provider(&self, key: &str, provider: &SnapshotProvider);
}

/// Saved snapshots plus the providers that refresh them.
#[derive(Default)]
pub(crate) struct SnapshotTable {
    saved: HashMap<String, Snapshot>,
    providers: HashMap<String, SnapshotProvider>,
}

impl SnapshotTable {
    pub(crate) fn with_saved(saved: HashMap<String, Snapshot>) -> Self {
        Self {
            saved,
            providers: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<Snapshot> {
        self.saved.get(key).cloned()
    }

    pub(crate) fn register(&mut self, key: &str, provider: SnapshotProvider) {
        if self.providers.insert(key.to_string(), provider).is_some() {
            tracing::warn!(key, "Saved state provider replaced");
        }
    }

    pub(crate) fn unregister(&mut self, key: &str, provider: &SnapshotProvider) {
        match self.providers.get(key) {
            Some(current) if Arc::ptr_eq(current, provider) => {
                self.providers.remove(key);
            }
            Some(_) => tracing::debug!(key, "Saved state provider already replaced"),
            None => {}
        }
    }

    pub(crate) fn providers(&self) -> Vec<(String, SnapshotProvider)> {
        self.providers
            .iter()
            .map(|(key, provider)| (key.clone(), Arc::clone(provider)))
            .collect()
    }

    pub(crate) fn store(&mut self, key: String, snapshot: Snapshot) {
        self.saved.insert(key, snapshot);
    }

    pub(crate) fn saved(&self) -> &HashMap<String, Snapshot> {
        &self.saved
    }
}

/// Ask each provider for its snapshot. Providers run without any registry
/// lock held; a failing provider is skipped and its previous snapshot kept.
pub(crate) fn collect(providers: Vec<(String, SnapshotProvider)>) -> Vec<(String, Snapshot)> {
    let mut collected = Vec::with_capacity(providers.len());
    for (key, provider) in providers {
        match provider() {
            Ok(snapshot) => collected.push((key, snapshot)),
            Err(err) => tracing::warn!(key = %key, error = %err, "Saved state provider failed"),
        }
    }
    collected
}

/// In-memory host: snapshots live as long as the registry.
///
/// Useful for tests and for hosts that hand the saved map to another process
/// themselves (see [`MemorySavedStateRegistry::saved`]).
#[derive(Default)]
pub struct MemorySavedStateRegistry {
    table: Mutex<SnapshotTable>,
}

impl MemorySavedStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with snapshots from a previous run.
    pub fn from_saved(saved: HashMap<String, Snapshot>) -> Self {
        Self {
            table: Mutex::new(SnapshotTable::with_saved(saved)),
        }
    }

    /// Invoke every provider and keep the results. Returns how many
    /// snapshots were refreshed.
    pub fn perform_save(&self) -> usize {
        let providers = self.table.lock().providers();
        let collected = collect(providers);
        let count = collected.len();
        let mut table = self.table.lock();
        for (key, snapshot) in collected {
            table.store(key, snapshot);
        }
        tracing::debug!(count, "Saved state collected");
        count
    }

    /// Copy of everything saved so far.
    pub fn saved(&self) -> HashMap<String, Snapshot> {
        self.table.lock().saved().clone()
    }
}

impl SavedStateRegistry for MemorySavedStateRegistry {
    fn get(&self, key: &str) -> Option<Snapshot> {
        self.table.lock().get(key)
    }

    fn register_provider(&self, key: &str, provider: SnapshotProvider) {
        self.table.lock().register(key, provider);
    }

    fn unregister_provider(&self, key: &str, provider: &SnapshotProvider) {
        self.table.lock().unregister(key, provider);
    }
}
