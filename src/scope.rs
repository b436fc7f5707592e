//! Owner-controlled execution context for feature pipelines.
//!
//! A `FeatureScope` decides where pipelines run (a tokio runtime handle) and
//! when they stop (cancellation). Cancelling a scope cancels every child scope
//! derived from it.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancellation scope plus the runtime pipelines are spawned on.
#[derive(Clone)]
pub struct FeatureScope {
    token: CancellationToken,
    runtime: Handle,
}

impl FeatureScope {
    /// Scope bound to the runtime of the calling task.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn new() -> Self {
        Self::with_runtime(Handle::current())
    }

    /// Scope whose pipelines run on the given runtime.
    pub fn with_runtime(runtime: Handle) -> Self {
        Self {
            token: CancellationToken::new(),
            runtime,
        }
    }

    /// Derive a scope that is cancelled together with this one but can also
    /// be cancelled on its own.
    pub fn child(&self) -> FeatureScope {
        FeatureScope {
            token: self.token.child_token(),
            runtime: self.runtime.clone(),
        }
    }

    /// Cancel the scope and every child scope. Idempotent.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::info!("Feature scope cancelled");
        }
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Spawn a task on this scope's runtime.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    /// Guard that cancels this scope when dropped.
    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard {
            scope: self.clone(),
        }
    }
}

impl Default for FeatureScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Ends a scope when the owner goes away.
pub struct ScopeGuard {
    scope: FeatureScope,
}

impl ScopeGuard {
    pub fn scope(&self) -> &FeatureScope {
        &self.scope
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn new_scope_is_not_cancelled() {
        let scope = FeatureScope::new();
        assert!(!scope.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_wakes_waiters() {
        let scope = FeatureScope::new();
        let waiter = scope.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        scope.cancel();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("waiter should wake")
            .expect("waiter task");
        assert!(scope.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_when_already_cancelled() {
        let scope = FeatureScope::new();
        scope.cancel();
        scope.cancel();
        tokio::time::timeout(Duration::from_millis(100), scope.cancelled())
            .await
            .expect("already cancelled");
    }

    #[tokio::test]
    async fn parent_cancel_reaches_children() {
        let parent = FeatureScope::new();
        let child = parent.child();
        let grandchild = child.child();

        parent.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[tokio::test]
    async fn parent_cancel_wakes_child_waiters() {
        let parent = FeatureScope::new();
        let child = parent.child();
        let task = tokio::spawn(async move { child.cancelled().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        parent.cancel();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("child waiter should wake")
            .expect("waiter task");
    }

    #[tokio::test]
    async fn child_cancel_leaves_parent_running() {
        let parent = FeatureScope::new();
        let child = parent.child();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn child_of_cancelled_scope_starts_cancelled() {
        let parent = FeatureScope::new();
        parent.cancel();
        assert!(parent.child().is_cancelled());
    }

    #[tokio::test]
    async fn guard_cancels_on_drop() {
        let scope = FeatureScope::new();
        let guard = scope.guard();
        assert!(!guard.scope().is_cancelled());
        drop(guard);
        assert!(scope.is_cancelled());
    }
}
