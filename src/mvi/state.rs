//! Base trait for feature state in MVI architecture.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable (Clone to create new states, never mutated in place)
/// - Self-contained (all data a host needs to render)
/// - Shareable (readers on other threads get whole snapshots)
pub trait FeatureState: Clone + Send + Sync + 'static {}
