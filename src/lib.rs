//! Reusable Model-View-Intent state engine.
//!
//! A [`Feature`] turns wishes into actions, runs each action's actor to
//! completion, folds the effects into an immutable state and publishes it,
//! optionally emitting one-time news and follow-up actions.
//!
//! Supporting modules:
//! - [`scope`]: where pipelines run and when they stop
//! - [`saved_state`]: restoring part of a state across restarts
//! - [`counter`]: the demo feature driven by the `featureflow` binary
//! - [`config`], [`logging`]: ambient setup for hosts

pub mod config;
pub mod counter;
pub mod logging;
pub mod mvi;
pub mod saved_state;
pub mod scope;

pub use mvi::{Feature, FeatureBuilder, FeatureError, FeatureOptions};
pub use scope::FeatureScope;
