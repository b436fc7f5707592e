use thiserror::Error;

/// Errors returned by feature operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// The pipeline has stopped: its scope was cancelled, every handle was
    /// dropped, or an actor panicked. The wish was not processed.
    #[error("Feature '{name}' is closed")]
    Closed { name: String },
}
