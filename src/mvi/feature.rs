//! The feature engine.
//!
//! ```text
//! invoke(wish) ─→ WishToAction ─→ action queue (FIFO, one consumer)
//!                                      │
//!                                      ▼
//!                           Actor(state, action) ─→ effect, effect, ...
//!                                                      │
//!                                Reducer(state, effect) ─→ new state ─→ StateStore
//!                                                      │
//!                  NewsPublisher ─→ news     PostProcessor ─→ follow-up action ─┐
//!                                                                                │
//!                                      action queue ◀────────────────────────────┘
//! ```
//!
//! Actions are processed one at a time: every effect of an action is reduced
//! and published before the next action is dequeued.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::mvi::actor::Actor;
use crate::mvi::error::FeatureError;
use crate::mvi::intent::Intent;
use crate::mvi::news::{NewsChannel, NewsStream};
use crate::mvi::publisher::{NewsPublisher, PostProcessor};
use crate::mvi::reducer::{Reducer, WishToAction};
use crate::mvi::state::FeatureState;
use crate::mvi::store::{StateStore, StateStream};
use crate::scope::FeatureScope;

const DEFAULT_NEWS_CAPACITY: usize = 64;

/// Tunables for a feature instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureOptions {
    /// Name used in logs and errors.
    pub name: String,
    /// Per-subscriber news buffer. A subscriber that falls further behind
    /// loses the oldest news.
    pub news_capacity: usize,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            name: "feature".to_string(),
            news_capacity: DEFAULT_NEWS_CAPACITY,
        }
    }
}

/// A running MVI store.
///
/// Cloning yields another handle to the same pipeline. The pipeline stops
/// when its scope is cancelled or when every handle has been dropped and the
/// queued actions have drained.
///
/// Type parameters: `W` wish, `A` action, `E` effect, `S` state, `N` news.
pub struct Feature<W, A, E, S, N> {
    inner: Arc<FeatureInner<W, A, S, N>>,
    _effect: PhantomData<fn() -> E>,
}

struct FeatureInner<W, A, S, N> {
    name: String,
    wish_to_action: Box<dyn WishToAction<W, A>>,
    actions: mpsc::UnboundedSender<A>,
    store: StateStore<S>,
    news: NewsChannel<N>,
}

impl<W, A, E, S, N> Clone for Feature<W, A, E, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _effect: PhantomData,
        }
    }
}

impl<W, A, E, S, N> Feature<W, A, E, S, N>
where
    W: Intent,
    A: Intent,
    E: Send + 'static,
    S: FeatureState,
    N: Clone + Send + 'static,
{
    /// Start a feature without news or post-processing.
    pub fn new(
        initial_state: S,
        reducer: impl Reducer<S, E>,
        wish_to_action: impl WishToAction<W, A>,
        actor: impl Actor<S, A, E>,
        scope: &FeatureScope,
    ) -> Self {
        FeatureBuilder::new(initial_state, reducer, wish_to_action, actor).spawn(scope)
    }

    /// Start configuring a feature.
    pub fn builder(
        initial_state: S,
        reducer: impl Reducer<S, E>,
        wish_to_action: impl WishToAction<W, A>,
        actor: impl Actor<S, A, E>,
    ) -> FeatureBuilder<W, A, E, S, N> {
        FeatureBuilder::new(initial_state, reducer, wish_to_action, actor)
    }

    /// Submit a wish. Never blocks.
    ///
    /// The wish is mapped to an action on the calling thread and queued
    /// behind every action already waiting.
    pub fn invoke(&self, wish: W) -> Result<(), FeatureError> {
        let action = self.inner.wish_to_action.map(wish);
        self.inner.actions.send(action).map_err(|_| {
            tracing::warn!(feature = %self.inner.name, "Wish dropped: feature is closed");
            FeatureError::Closed {
                name: self.inner.name.clone(),
            }
        })
    }

    /// Current state.
    pub fn value(&self) -> S {
        self.inner.store.value()
    }

    /// Subscribe to states: the current one first, then every transition.
    pub fn states(&self) -> StateStream<S> {
        self.inner.store.subscribe()
    }

    /// Subscribe to news published from now on.
    pub fn news(&self) -> NewsStream<N> {
        self.inner.news.subscribe()
    }

    /// Read-only handle to the state cell, e.g. for a saved-state provider.
    pub fn state_store(&self) -> StateStore<S> {
        self.inner.store.clone()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether the pipeline still accepts wishes.
    pub fn is_running(&self) -> bool {
        !self.inner.actions.is_closed()
    }

    /// Resolves once the pipeline has stopped.
    pub async fn closed(&self) {
        self.inner.actions.closed().await
    }
}

/// Builder for features with optional collaborators.
pub struct FeatureBuilder<W, A, E, S, N> {
    initial_state: S,
    reducer: Box<dyn Reducer<S, E>>,
    wish_to_action: Box<dyn WishToAction<W, A>>,
    actor: Box<dyn Actor<S, A, E>>,
    news_publisher: Option<Box<dyn NewsPublisher<A, E, S, N>>>,
    post_processor: Option<Box<dyn PostProcessor<A, E, S>>>,
    options: FeatureOptions,
}

impl<W, A, E, S, N> FeatureBuilder<W, A, E, S, N>
where
    W: Intent,
    A: Intent,
    E: Send + 'static,
    S: FeatureState,
    N: Clone + Send + 'static,
{
    pub fn new(
        initial_state: S,
        reducer: impl Reducer<S, E>,
        wish_to_action: impl WishToAction<W, A>,
        actor: impl Actor<S, A, E>,
    ) -> Self {
        Self {
            initial_state,
            reducer: Box::new(reducer),
            wish_to_action: Box::new(wish_to_action),
            actor: Box::new(actor),
            news_publisher: None,
            post_processor: None,
            options: FeatureOptions::default(),
        }
    }

    pub fn news_publisher(mut self, publisher: impl NewsPublisher<A, E, S, N>) -> Self {
        self.news_publisher = Some(Box::new(publisher));
        self
    }

    pub fn post_processor(mut self, processor: impl PostProcessor<A, E, S>) -> Self {
        self.post_processor = Some(Box::new(processor));
        self
    }

    pub fn options(mut self, options: FeatureOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = name.into();
        self
    }

    /// Start the pipeline on the scope's runtime and return the handle.
    pub fn spawn(self, scope: &FeatureScope) -> Feature<W, A, E, S, N> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let store = StateStore::new(self.initial_state);
        let news = NewsChannel::new(self.options.news_capacity);
        let name = self.options.name;

        let pipeline = Pipeline {
            reducer: self.reducer,
            actor: self.actor,
            news_publisher: self.news_publisher,
            post_processor: self.post_processor,
            store: store.clone(),
            news: news.clone(),
            actions: receiver,
            requeue: sender.downgrade(),
            backlog: VecDeque::new(),
            scope: scope.clone(),
        };
        let span = tracing::info_span!("feature", name = %name);
        scope.spawn(pipeline.run().instrument(span));

        Feature {
            inner: Arc::new(FeatureInner {
                name,
                wish_to_action: self.wish_to_action,
                actions: sender,
                store,
                news,
            }),
            _effect: PhantomData,
        }
    }
}

/// The single consumer of a feature's action queue.
struct Pipeline<A, E, S, N> {
    reducer: Box<dyn Reducer<S, E>>,
    actor: Box<dyn Actor<S, A, E>>,
    news_publisher: Option<Box<dyn NewsPublisher<A, E, S, N>>>,
    post_processor: Option<Box<dyn PostProcessor<A, E, S>>>,
    store: StateStore<S>,
    news: NewsChannel<N>,
    actions: mpsc::UnboundedReceiver<A>,
    requeue: mpsc::WeakUnboundedSender<A>,
    /// Follow-ups produced after every handle was dropped. They run once the
    /// queue has drained, which keeps them behind earlier actions.
    backlog: VecDeque<A>,
    scope: FeatureScope,
}

impl<A, E, S, N> Pipeline<A, E, S, N>
where
    A: Send + 'static,
    E: Send + 'static,
    S: FeatureState,
    N: Clone + Send + 'static,
{
    async fn run(mut self) {
        tracing::info!("Feature pipeline started");
        let mut state = self.store.value();
        let mut seq: u64 = 0;

        loop {
            let action = tokio::select! {
                biased;
                _ = self.scope.cancelled() => break,
                action = self.actions.recv() => action,
            };
            let Some(action) = action.or_else(|| self.backlog.pop_front()) else {
                break;
            };

            seq += 1;
            tracing::debug!(seq, "Action dequeued");
            if !self.process(&mut state, action, seq).await {
                break;
            }
        }

        self.actions.close();
        tracing::info!(processed = seq, "Feature pipeline stopped");
    }

    /// Drain every effect of one action. Returns false if the scope was
    /// cancelled mid-way.
    async fn process(&mut self, state: &mut S, action: A, seq: u64) -> bool {
        let mut effects = self.actor.act(state, &action);
        let mut count: usize = 0;

        loop {
            let effect = tokio::select! {
                biased;
                _ = self.scope.cancelled() => {
                    tracing::debug!(seq, effects = count, "Action abandoned: scope cancelled");
                    return false;
                }
                effect = effects.next() => effect,
            };
            let Some(effect) = effect else {
                break;
            };
            count += 1;

            let next = self.reducer.reduce(state, &effect);
            self.store.publish(next.clone());
            *state = next;
            tracing::trace!(seq, effect = count, "State published");

            let follow_up = self
                .post_processor
                .as_ref()
                .and_then(|processor| processor.process(&action, &effect, state));
            let news = self
                .news_publisher
                .as_ref()
                .and_then(|publisher| publisher.publish(&action, &effect, state));

            if let Some(news) = news {
                let delivered = self.news.publish(news);
                tracing::trace!(seq, delivered, "News published");
            }
            if let Some(follow_up) = follow_up {
                self.enqueue(follow_up);
            }
        }

        tracing::debug!(seq, effects = count, "Action processed");
        true
    }

    fn enqueue(&mut self, action: A) {
        match self.requeue.upgrade() {
            Some(sender) => {
                if let Err(mpsc::error::SendError(action)) = sender.send(action) {
                    self.backlog.push_back(action);
                }
            }
            None => self.backlog.push_back(action),
        }
    }
}
