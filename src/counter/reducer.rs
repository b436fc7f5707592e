use crate::counter::effect::CounterEffect;
use crate::counter::state::CounterState;
use crate::mvi::Reducer;

pub struct CounterReducer;

impl Reducer<CounterState, CounterEffect> for CounterReducer {
    fn reduce(&self, state: &CounterState, effect: &CounterEffect) -> CounterState {
        match effect {
            CounterEffect::Loading => CounterState {
                is_loading: true,
                ..state.clone()
            },
            CounterEffect::Success { inc } => CounterState {
                is_loading: false,
                counter: state.counter + inc,
            },
        }
    }
}
