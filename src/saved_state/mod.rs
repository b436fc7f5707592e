//! Saved-state restoration across process restarts.
//!
//! - [`SavedStateRegistry`]: the host mechanism that stores snapshots by key
//!   and asks registered providers for fresh ones when it saves.
//! - [`SavedStateHelper`]: registers a feature's provider and rebuilds an
//!   initial state from the stored snapshot.
//! - [`Snapshot`]: the opaque blob exchanged between the two.

mod error;
mod file;
mod helper;
mod registry;
mod snapshot;

pub use error::SavedStateError;
pub use file::FileSavedStateRegistry;
pub use helper::{SavedStateHelper, DEFAULT_SAVED_STATE_KEY};
pub use registry::{MemorySavedStateRegistry, SavedStateRegistry, SnapshotProvider};
pub use snapshot::Snapshot;
