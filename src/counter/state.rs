use crate::mvi::FeatureState;
use crate::saved_state::{SavedStateError, Snapshot};

const COUNTER_KEY: &str = "counter";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CounterState {
    pub is_loading: bool,
    pub counter: i64,
}

impl FeatureState for CounterState {}

impl CounterState {
    /// Only the counter is persisted; `is_loading` restarts as false.
    pub fn to_snapshot(&self) -> Result<Snapshot, SavedStateError> {
        Snapshot::new().with(COUNTER_KEY, &self.counter)
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Option<Self> {
        Some(Self {
            counter: snapshot.get(COUNTER_KEY)?,
            ..Self::default()
        })
    }
}
