//! # Example: custom_handler
//!
//! Demonstrates how to implement and attach a custom fault handler.
//!
//! Shows how to:
//! - Implement the [`FaultHandler`] trait.
//! - Respect the per-handler timeout through the cancellation token.
//! - Read the [`DispatchSummary`] of a manual dispatch.
//! - Redirect the fallback sink to `tracing` with [`TracingSink`].
//!
//! ## Flow
//! ```text
//! guard.protect("job", fut).await
//!     └─► fut panics ──► FaultReport ──► Dispatcher
//!                                          ├─► CountingHandler ─► Completed
//!                                          └─► SlowHandler     ─► TimedOut (token cancelled)
//!
//! guard.dispatcher().dispatch(report).await ──► DispatchSummary
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example custom_handler
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use taskguard::{
    FaultHandler, FaultReport, GuardConfig, HandlerError, HandlerRef, TaskGuard, Trap,
    TracingSink,
};
use tokio_util::sync::CancellationToken;

/// Counts reports per process. In real life, you could ship them to an alerting system.
#[derive(Default)]
struct CountingHandler {
    seen: AtomicUsize,
}

#[async_trait]
impl FaultHandler for CountingHandler {
    async fn handle(
        &self,
        report: Arc<FaultReport>,
        _ctx: CancellationToken,
    ) -> Result<(), HandlerError> {
        let n = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[count] #{n} source={} cause={}", report.source, report.cause);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Takes longer than the budget and stops when its token is cancelled.
struct SlowHandler;

#[async_trait]
impl FaultHandler for SlowHandler {
    async fn handle(
        &self,
        _report: Arc<FaultReport>,
        ctx: CancellationToken,
    ) -> Result<(), HandlerError> {
        tokio::select! {
            _ = ctx.cancelled() => {
                println!("[slow] cancelled by timeout");
                Err(HandlerError::Canceled)
            }
            _ = tokio::time::sleep(Duration::from_secs(10)) => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let counting = Arc::new(CountingHandler::default());
    let handlers: Vec<HandlerRef> = vec![counting.clone() as HandlerRef, Arc::new(SlowHandler)];

    let cfg = GuardConfig::default().with_handler_timeout(Duration::from_millis(200));
    let guard = TaskGuard::builder(cfg)
        .with_handlers(handlers)
        .with_logger(Arc::new(TracingSink))
        .build()?;

    let out = guard
        .protect("job", async {
            let items: Vec<u32> = Vec::new();
            items[3]
        })
        .await;
    println!("[main] protect returned {out:?}");

    // Reports can also be dispatched by hand.
    let report = Arc::new(FaultReport::new("manual", Trap::from_message("synthetic fault")));
    let summary = guard.dispatcher().dispatch(report).await;
    for (name, outcome) in &summary.outcomes {
        println!("[main] {name}: {}", outcome.as_label());
    }
    println!(
        "[main] invoked={} completed={} timed_out={} total_seen={}",
        summary.invoked(),
        summary.completed(),
        summary.timed_out(),
        counting.seen.load(Ordering::SeqCst)
    );
    Ok(())
}
