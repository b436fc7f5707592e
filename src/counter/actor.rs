use std::time::Duration;

use futures::StreamExt;

use crate::counter::effect::{CounterEffect, CounterNews};
use crate::counter::intent::CounterAction;
use crate::counter::state::CounterState;
use crate::mvi::{Actor, EffectStream, NewsPublisher};

/// Emits `Loading`, waits `step_delay`, then `Success { inc: 1 }`.
pub struct CounterActor {
    step_delay: Duration,
}

impl CounterActor {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

impl Actor<CounterState, CounterAction, CounterEffect> for CounterActor {
    fn act(&self, _state: &CounterState, action: &CounterAction) -> EffectStream<CounterEffect> {
        match action {
            CounterAction::IncrementCounter => {
                let step_delay = self.step_delay;
                async_stream::stream! {
                    yield CounterEffect::Loading;
                    if !step_delay.is_zero() {
                        tokio::time::sleep(step_delay).await;
                    }
                    yield CounterEffect::Success { inc: 1 };
                }
                .boxed()
            }
        }
    }
}

/// Announces every `every`-th value. Zero disables it.
pub struct MilestonePublisher {
    every: i64,
}

impl MilestonePublisher {
    pub fn new(every: i64) -> Self {
        Self { every }
    }
}

impl NewsPublisher<CounterAction, CounterEffect, CounterState, CounterNews> for MilestonePublisher {
    fn publish(
        &self,
        _action: &CounterAction,
        effect: &CounterEffect,
        state: &CounterState,
    ) -> Option<CounterNews> {
        match effect {
            CounterEffect::Success { .. }
                if self.every > 0 && state.counter != 0 && state.counter % self.every == 0 =>
            {
                Some(CounterNews::Milestone {
                    counter: state.counter,
                })
            }
            _ => None,
        }
    }
}
