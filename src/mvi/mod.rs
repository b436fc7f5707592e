//! Model-View-Intent (MVI) architecture primitives.
//!
//! This module provides the traits and the engine for implementing
//! unidirectional data flow.
//!
//! # Architecture
//!
//! ```text
//! Wish ──→ Action ──→ Actor ──→ Effect ──→ Reducer ──→ State ──→ View
//!   ↑                                                              │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot owned by a [`Feature`]
//! - **Wish / Action**: Intents from the host and their internal form
//! - **Actor**: Asynchronous work producing effects
//! - **Reducer**: Pure function folding an effect into state
//! - **News**: One-time events that do not belong in state

mod actor;
mod error;
mod feature;
mod intent;
mod news;
mod publisher;
mod reducer;
mod state;
mod store;

pub use actor::{effects, Actor, EffectStream};
pub use error::FeatureError;
pub use feature::{Feature, FeatureBuilder, FeatureOptions};
pub use intent::Intent;
pub use news::NewsStream;
pub use publisher::{NewsPublisher, PostProcessor};
pub use reducer::{Reducer, WishToAction};
pub use state::FeatureState;
pub use store::{StateStore, StateStream};
