//! Counter feature: the demo consumer of the MVI engine.
//!
//! One wish increments the counter. The actor reports `Loading` first and
//! `Success` after a delay; only the counter value survives restarts.

mod actor;
mod effect;
mod intent;
mod model;
mod reducer;
mod state;

pub use actor::{CounterActor, MilestonePublisher};
pub use effect::{CounterEffect, CounterNews};
pub use intent::{wish_to_action, CounterAction, CounterWish};
pub use model::{CounterFeature, CounterModel, UiEvent};
pub use reducer::CounterReducer;
pub use state::CounterState;
