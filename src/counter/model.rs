//! Counter view-model: wires saved state, the feature and the host events.

use std::sync::{Arc, OnceLock};

use futures_core::Stream;

use crate::config::Config;
use crate::counter::actor::{CounterActor, MilestonePublisher};
use crate::counter::effect::{CounterEffect, CounterNews};
use crate::counter::intent::{wish_to_action, CounterAction, CounterWish};
use crate::counter::reducer::CounterReducer;
use crate::counter::state::CounterState;
use crate::mvi::{Feature, FeatureError, FeatureOptions, NewsStream, StateStore, StateStream};
use crate::saved_state::{SavedStateHelper, SavedStateRegistry};
use crate::scope::FeatureScope;

pub type CounterFeature =
    Feature<CounterWish, CounterAction, CounterEffect, CounterState, CounterNews>;

/// Events forwarded by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    ButtonInc,
}

pub struct CounterModel {
    feature: CounterFeature,
    saved_state: SavedStateHelper<CounterState>,
}

impl CounterModel {
    /// Restore the counter from `registry` (or start at zero) and start the
    /// feature in `scope`.
    pub fn new(
        config: &Config,
        registry: Arc<dyn SavedStateRegistry>,
        scope: &FeatureScope,
    ) -> Self {
        // The provider is registered before the feature exists; until then
        // it reports the default state.
        let store: Arc<OnceLock<StateStore<CounterState>>> = Arc::new(OnceLock::new());
        let provider_store = Arc::clone(&store);
        let saved_state = SavedStateHelper::new(
            registry,
            config.saved_state.key.clone(),
            move || {
                provider_store
                    .get()
                    .map(StateStore::value)
                    .unwrap_or_default()
            },
            CounterState::to_snapshot,
        );

        let initial_state = saved_state
            .restore_state(CounterState::from_snapshot)
            .unwrap_or_default();
        tracing::info!(counter = initial_state.counter, "Counter starting");

        let feature = Feature::builder(
            initial_state,
            CounterReducer,
            wish_to_action,
            CounterActor::new(config.counter.step_delay()),
        )
        .news_publisher(MilestonePublisher::new(config.counter.milestone))
        .options(FeatureOptions::from(&config.feature))
        .spawn(scope);

        // The slot was created above and is set only here.
        let _ = store.set(feature.state_store());

        Self {
            feature,
            saved_state,
        }
    }

    pub fn accept(&self, event: UiEvent) -> Result<(), FeatureError> {
        match event {
            UiEvent::ButtonInc => self.feature.invoke(CounterWish::IncrementCounter),
        }
    }

    /// Counter values, starting with the current one.
    ///
    /// States that leave the counter unchanged (the loading state of every
    /// increment) are skipped, so each value is emitted once. Hosts that
    /// need every transition subscribe to [`CounterModel::states`].
    pub fn counter(&self) -> impl Stream<Item = i64> + Send + 'static {
        let mut states = self.feature.states();
        async_stream::stream! {
            let mut last = None;
            while let Some(state) = states.recv().await {
                if last != Some(state.counter) {
                    last = Some(state.counter);
                    yield state.counter;
                }
            }
        }
    }

    pub fn states(&self) -> StateStream<CounterState> {
        self.feature.states()
    }

    pub fn news(&self) -> NewsStream<CounterNews> {
        self.feature.news()
    }

    pub fn value(&self) -> CounterState {
        self.feature.value()
    }

    pub fn feature(&self) -> &CounterFeature {
        &self.feature
    }

    pub fn saved_state_key(&self) -> &str {
        self.saved_state.key()
    }
}
