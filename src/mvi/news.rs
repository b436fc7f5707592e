//! One-shot news delivery.
//!
//! News is fanned out to the subscribers active at publish time and is never
//! replayed. A subscriber that falls more than the channel capacity behind
//! loses the oldest items it had not read yet.

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::{FutureExt, StreamExt};
use futures_core::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// In-process news fan-out owned by a feature.
pub(crate) struct NewsChannel<N> {
    tx: broadcast::Sender<N>,
}

impl<N> Clone for NewsChannel<N> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<N: Clone + Send + 'static> NewsChannel<N> {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Deliver to active subscribers. Returns how many received it.
    pub(crate) fn publish(&self, news: N) -> usize {
        // No receiver is not an error: news is not retained.
        self.tx.send(news).unwrap_or(0)
    }

    pub(crate) fn subscribe(&self) -> NewsStream<N> {
        NewsStream {
            inner: BroadcastStream::new(self.tx.subscribe()),
        }
    }
}

/// Stream of news published after this subscription was created.
pub struct NewsStream<N> {
    inner: BroadcastStream<N>,
}

impl<N: Clone + Send + 'static> NewsStream<N> {
    /// Wait for the next news item. `None` once the feature is gone.
    pub async fn recv(&mut self) -> Option<N> {
        self.next().await
    }

    /// Next news item if one is already pending.
    pub fn try_recv(&mut self) -> Option<N> {
        self.next().now_or_never().flatten()
    }
}

impl<N: Clone + Send + 'static> Stream for NewsStream<N> {
    type Item = N;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<N>> {
        loop {
            match ready!(Pin::new(&mut self.inner).poll_next(cx)) {
                Some(Ok(news)) => return Poll::Ready(Some(news)),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "News subscriber lagged, oldest news dropped");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}
