//! Optional per-effect hooks: news publishing and action post-processing.
//!
//! Both run after the reducer, against the post-reducer state.

/// Takes the action, the effect it produced and the new state, and optionally
/// publishes a one-time event that does not belong in state.
pub trait NewsPublisher<A, E, S, N>: Send + Sync + 'static {
    fn publish(&self, action: &A, effect: &E, state: &S) -> Option<N>;
}

impl<A, E, S, N, F> NewsPublisher<A, E, S, N> for F
where
    F: Fn(&A, &E, &S) -> Option<N> + Send + Sync + 'static,
{
    fn publish(&self, action: &A, effect: &E, state: &S) -> Option<N> {
        self(action, effect, state)
    }
}

/// When an effect has been reduced, a further action may be triggered
/// depending on the state. The follow-up joins the back of the action queue.
pub trait PostProcessor<A, E, S>: Send + Sync + 'static {
    fn process(&self, action: &A, effect: &E, state: &S) -> Option<A>;
}

impl<A, E, S, F> PostProcessor<A, E, S> for F
where
    F: Fn(&A, &E, &S) -> Option<A> + Send + Sync + 'static,
{
    fn process(&self, action: &A, effect: &E, state: &S) -> Option<A> {
        self(action, effect, state)
    }
}
