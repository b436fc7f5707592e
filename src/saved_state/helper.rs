//! Bridges a feature's state to the host's saved-state registry.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::saved_state::{SavedStateError, SavedStateRegistry, Snapshot, SnapshotProvider};

/// Key used when the caller does not pick one.
pub const DEFAULT_SAVED_STATE_KEY: &str = "MviSavedStateProvider";

/// Saves and restores a caller-chosen part of a state.
///
/// The helper makes no assumptions about the state. On save it calls
/// `state_provider` and hands the result to `save`, which picks the items
/// worth keeping and returns them as a [`Snapshot`]. On restore it gives the
/// stored snapshot back to the caller, who rebuilds a state from it.
///
/// Restoring is partial by contract: items `save` leaves out are not in the
/// snapshot, so the rebuilt state carries defaults for them even if they held
/// other values when saved. Data from asynchronous sources should be refreshed
/// as usual instead.
///
/// The provider is registered under `key` on construction and removed when
/// the helper is dropped, unless a newer helper has registered under the
/// same key in the meantime. Use a unique key per state so several helpers
/// can share one registry.
pub struct SavedStateHelper<S> {
    registry: Arc<dyn SavedStateRegistry>,
    key: String,
    provider: SnapshotProvider,
    _state: PhantomData<fn() -> S>,
}

impl<S: 'static> SavedStateHelper<S> {
    pub fn new(
        registry: Arc<dyn SavedStateRegistry>,
        key: impl Into<String>,
        state_provider: impl Fn() -> S + Send + Sync + 'static,
        save: impl Fn(&S) -> Result<Snapshot, SavedStateError> + Send + Sync + 'static,
    ) -> Self {
        let key = key.into();
        let provider: SnapshotProvider = Arc::new(move || save(&state_provider()));
        registry.register_provider(&key, Arc::clone(&provider));
        tracing::debug!(key = %key, "Saved state provider registered");
        Self {
            registry,
            key,
            provider,
            _state: PhantomData,
        }
    }

    /// Same as [`SavedStateHelper::new`] with [`DEFAULT_SAVED_STATE_KEY`].
    pub fn with_default_key(
        registry: Arc<dyn SavedStateRegistry>,
        state_provider: impl Fn() -> S + Send + Sync + 'static,
        save: impl Fn(&S) -> Result<Snapshot, SavedStateError> + Send + Sync + 'static,
    ) -> Self {
        Self::new(registry, DEFAULT_SAVED_STATE_KEY, state_provider, save)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rebuild a state from the snapshot saved under this helper's key.
    ///
    /// Returns `None` when nothing was saved or when `from` rejects the
    /// snapshot; the caller then starts from its default state.
    pub fn restore_state(&self, from: impl FnOnce(&Snapshot) -> Option<S>) -> Option<S> {
        let snapshot = self.registry.get(&self.key)?;
        let restored = from(&snapshot);
        if restored.is_none() {
            tracing::warn!(key = %self.key, "Saved state rejected, using default state");
        }
        restored
    }
}

impl<S> Drop for SavedStateHelper<S> {
    fn drop(&mut self) {
        self.registry.unregister_provider(&self.key, &self.provider);
    }
}
