//! Base trait for intents (wishes and actions) in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - Wishes: user actions forwarded by the host (button clicks, commands)
/// - Actions: the normalized internal commands a wish maps to, including
///   follow-up actions synthesized by a post-processor
///
/// Intents are handed to actors, whose effects are folded by reducers.
pub trait Intent: Send + 'static {}
