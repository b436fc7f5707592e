//! Replay-latest state container.
//!
//! Holds the single current-state cell of a feature and fans every new state
//! out to subscribers. A subscriber first receives the current state, then
//! every later state exactly once, in emission order.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Thread-safe current-state cell with subscriber fan-out.
///
/// Cloning is cheap and yields a handle to the same cell. Only the feature
/// pipeline publishes; any number of readers may call `value()` or subscribe.
pub struct StateStore<S> {
    inner: Arc<Mutex<StoreInner<S>>>,
}

struct StoreInner<S> {
    current: S,
    subscribers: Vec<mpsc::UnboundedSender<S>>,
}

impl<S> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Clone> StateStore<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                current: initial,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Latest published state.
    pub fn value(&self) -> S {
        self.inner.lock().current.clone()
    }

    /// Subscribe to state changes, starting with the current state.
    ///
    /// Replay and registration happen under the publish lock, so the stream
    /// can neither miss nor repeat a state.
    pub fn subscribe(&self) -> StateStream<S> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        if sender.send(inner.current.clone()).is_ok() {
            inner.subscribers.push(sender);
        }
        StateStream { receiver }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|sender| !sender.is_closed());
        inner.subscribers.len()
    }

    /// Replace the current state and deliver it to every live subscriber.
    pub(crate) fn publish(&self, state: S) {
        let mut inner = self.inner.lock();
        inner
            .subscribers
            .retain(|sender| sender.send(state.clone()).is_ok());
        inner.current = state;
    }
}

/// Stream of states for one subscriber.
///
/// Ends once the store and every feature handle holding it are gone.
pub struct StateStream<S> {
    receiver: mpsc::UnboundedReceiver<S>,
}

impl<S> StateStream<S> {
    /// Wait for the next state.
    pub async fn recv(&mut self) -> Option<S> {
        self.receiver.recv().await
    }

    /// Next state if one is already buffered.
    pub fn try_recv(&mut self) -> Option<S> {
        self.receiver.try_recv().ok()
    }
}

impl<S> Stream for StateStream<S> {
    type Item = S;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S>> {
        self.receiver.poll_recv(cx)
    }
}
