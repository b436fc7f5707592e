//! Reducer and wish mapping contracts.

/// Reducer folds an effect into state.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Effect) -> State
pub trait Reducer<S, E>: Send + Sync + 'static {
    /// Produce the next state. `state` stays valid; a new value is returned.
    fn reduce(&self, state: &S, effect: &E) -> S;
}

impl<S, E, F> Reducer<S, E> for F
where
    F: Fn(&S, &E) -> S + Send + Sync + 'static,
{
    fn reduce(&self, state: &S, effect: &E) -> S {
        self(state, effect)
    }
}

/// Maps an external wish to the internal action it stands for.
///
/// Runs synchronously on the caller of `Feature::invoke`, so it must not
/// block or fail.
pub trait WishToAction<W, A>: Send + Sync + 'static {
    fn map(&self, wish: W) -> A;
}

impl<W, A, F> WishToAction<W, A> for F
where
    F: Fn(W) -> A + Send + Sync + 'static,
{
    fn map(&self, wish: W) -> A {
        self(wish)
    }
}
