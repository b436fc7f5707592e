//! Actor contract: the only place asynchronous work happens.

use futures::stream::BoxStream;

/// Lazy, possibly asynchronous sequence of effects produced for one action.
///
/// The stream owns everything it needs (`'static`); the pipeline polls it to
/// completion before the next action is dequeued.
pub type EffectStream<E> = BoxStream<'static, E>;

/// Takes the current state and an action and produces a stream of effects.
///
/// An actor that may take a while should emit a "started"/"loading" effect
/// first and the result afterwards. Retrying belongs here, expressed as
/// explicit effects; the engine never retries.
pub trait Actor<S, A, E>: Send + Sync + 'static {
    fn act(&self, state: &S, action: &A) -> EffectStream<E>;
}

impl<S, A, E, F> Actor<S, A, E> for F
where
    F: Fn(&S, &A) -> EffectStream<E> + Send + Sync + 'static,
{
    fn act(&self, state: &S, action: &A) -> EffectStream<E> {
        self(state, action)
    }
}

/// Constructors for common effect streams.
pub mod effects {
    use futures::stream::{self, StreamExt};

    use super::EffectStream;

    /// No effects: the action is ignored in the current state.
    pub fn none<E: Send + 'static>() -> EffectStream<E> {
        stream::empty().boxed()
    }

    /// A single effect, available immediately.
    pub fn just<E: Send + 'static>(effect: E) -> EffectStream<E> {
        stream::once(async move { effect }).boxed()
    }

    /// Effects available immediately, emitted in iteration order.
    pub fn from_iter<E, I>(effects: I) -> EffectStream<E>
    where
        E: Send + 'static,
        I: IntoIterator<Item = E>,
        I::IntoIter: Send + 'static,
    {
        stream::iter(effects).boxed()
    }
}
