/// Results produced by the counter actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterEffect {
    Loading,
    Success { inc: i64 },
}

/// One-time counter events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterNews {
    /// The counter reached a multiple of the configured milestone.
    Milestone { counter: i64 },
}
