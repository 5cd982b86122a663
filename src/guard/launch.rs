//! # Guarded async work.
//!
//! Two orthogonal primitives:
//! - **scoped guard** `protect` / `protect_with_context`: awaits a future inside a guarded
//!   frame, in the caller's task;
//! - **task launch** `launch*`: spawns a Tokio task that installs the same scoped guard
//!   before running the work.
//!
//! ## Flow
//! ```text
//! launch(label, fut)
//!   └─► tokio::spawn ──► protect(label, fut)
//!                          ├─ Ok  ──► task ends
//!                          └─ trap ──► FaultReport ──► dispatch (enabled) / sink (disabled)
//!                                        └─► on_done() (callback variants, trap only)
//!                                        └─► task ends normally
//! ```
//!
//! ## Rules
//! - `launch*` must be called from within a Tokio runtime and return immediately.
//! - The returned `JoinHandle` resolves after dispatch finished; it never carries the trap.
//! - Cancellation is cooperative: the guard never aborts work it launched.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::guard::TaskGuard;
use crate::trap::CatchTrap;

impl TaskGuard {
    /// Spawns `fut` as an independent task under trap interception.
    pub fn launch<F>(&self, label: impl Into<Arc<str>>, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let guard = self.clone();
        let label = label.into();
        tokio::spawn(async move {
            guard.guarded(label, None, fut).await;
        })
    }

    /// Like [`launch`](Self::launch); runs `on_done` once after a trap was reported.
    ///
    /// `on_done` is not called when the work completes normally. A trap inside
    /// `on_done` is logged and swallowed.
    pub fn launch_with_callback<F, C>(
        &self,
        label: impl Into<Arc<str>>,
        fut: F,
        on_done: C,
    ) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let guard = self.clone();
        let label = label.into();
        tokio::spawn(async move {
            if guard.guarded(Arc::clone(&label), None, fut).await.is_none() {
                guard.run_callback(&label, on_done);
            }
        })
    }

    /// Spawns `work(ctx)` under trap interception; reports carry `ctx`.
    ///
    /// Observing `ctx` is up to `work`; the guard never aborts it.
    pub fn launch_with_context<W, F>(
        &self,
        label: impl Into<Arc<str>>,
        ctx: CancellationToken,
        work: W,
    ) -> JoinHandle<()>
    where
        W: FnOnce(CancellationToken) -> F + Send + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let guard = self.clone();
        let label = label.into();
        tokio::spawn(async move {
            guard.guarded_with_context(label, ctx, work).await;
        })
    }

    /// Awaits `fut` inside a guarded frame in the current task.
    ///
    /// Returns `None` if it trapped; the trap has been reported by then.
    pub async fn protect<F>(&self, label: impl Into<Arc<str>>, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        self.guarded(label.into(), None, fut).await
    }

    /// Awaits `work(ctx)` inside a guarded frame; reports carry `ctx`.
    pub async fn protect_with_context<W, F>(
        &self,
        label: impl Into<Arc<str>>,
        ctx: CancellationToken,
        work: W,
    ) -> Option<F::Output>
    where
        W: FnOnce(CancellationToken) -> F,
        F: Future,
    {
        self.guarded_with_context(label.into(), ctx, work).await
    }

    async fn guarded<F: Future>(
        &self,
        label: Arc<str>,
        ctx: Option<CancellationToken>,
        fut: F,
    ) -> Option<F::Output> {
        match CatchTrap::new(fut, self.inner.cfg.capture_stack).await {
            Ok(out) => Some(out),
            Err(caught) => {
                self.report(label, caught, ctx).await;
                None
            }
        }
    }

    async fn guarded_with_context<W, F>(
        &self,
        label: Arc<str>,
        ctx: CancellationToken,
        work: W,
    ) -> Option<F::Output>
    where
        W: FnOnce(CancellationToken) -> F,
        F: Future,
    {
        let child_ctx = ctx.clone();
        // `work` itself may trap before yielding a future.
        let fut = async move { work(child_ctx).await };
        self.guarded(label, Some(ctx), fut).await
    }
}
