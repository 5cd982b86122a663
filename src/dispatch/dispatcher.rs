//! # Concurrent fan-out of one fault report.
//!
//! Provides [`Dispatcher`], which delivers a report to every handler of a registry snapshot,
//! each on its own task, each under its own budget.
//!
//! ## Architecture
//! ```text
//! dispatch(report)
//!     │
//!     ├─ snapshot empty ──► logging sink "[trap] ..." ──► return
//!     │
//!     ├──► spawn ──► CatchTrap(h1.handle(report, child token)) ─┐
//!     ├──► spawn ──► CatchTrap(h2.handle(report, child token)) ─┼─► join_all(timeout(join))
//!     └──► spawn ──► CatchTrap(hN.handle(report, child token)) ─┘          │
//!                                                                          ▼
//!                                                              DispatchSummary
//! ```
//!
//! ## Rules
//! - **Snapshot once**: handlers added or removed during a dispatch do not affect it.
//! - **Spawn order**: registration order; completion order is unspecified.
//! - **Isolation**: a panicking or failing handler is logged; siblings are unaffected.
//! - **Budget**: `GuardConfig::handler_timeout` per handler; on expiry the child token
//!   is cancelled and the dispatcher stops waiting. The handler task is detached,
//!   never aborted.
//! - **Context**: each handler's token is a child of [`FaultReport::context`], so
//!   cancelling the guarded work's context also reaches its handlers.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::dispatch::{DispatchSummary, HandlerOutcome};
use crate::error::HandlerError;
use crate::handlers::{HandlerRef, HandlerRegistry};
use crate::logging::Logger;
use crate::report::FaultReport;
use crate::trap::{CatchTrap, Caught, Trap, catch};

/// One in-flight handler invocation.
struct Call {
    name: &'static str,
    token: CancellationToken,
    join: JoinHandle<Result<Result<(), HandlerError>, Caught>>,
}

/// Fan-out coordinator for fault handlers.
#[derive(Clone)]
pub struct Dispatcher {
    pub(super) registry: Arc<HandlerRegistry>,
    pub(super) logger: Arc<Logger>,
    timeout: Option<Duration>,
    capture_stack: bool,
}

impl Dispatcher {
    pub(crate) fn new(
        registry: Arc<HandlerRegistry>,
        logger: Arc<Logger>,
        timeout: Option<Duration>,
        capture_stack: bool,
    ) -> Self {
        Self {
            registry,
            logger,
            timeout,
            capture_stack,
        }
    }

    /// Delivers `report` to every handler of the current registry snapshot.
    ///
    /// Must be called from within a Tokio runtime with the timer driver enabled: handlers
    /// are spawned on it. Use [`dispatch_isolated`](Self::dispatch_isolated) from any
    /// other context.
    /// Returns once every handler either finished or ran out of budget.
    pub async fn dispatch(&self, report: Arc<FaultReport>) -> DispatchSummary {
        let snapshot = self.registry.snapshot();
        if snapshot.is_empty() {
            self.logger.unhandled(&report);
            return DispatchSummary::default();
        }

        tracing::debug!(
            target: "taskguard",
            report = report.id,
            source = %report.source,
            handlers = snapshot.len(),
            "dispatching fault report"
        );

        let calls: Vec<Call> = snapshot
            .iter()
            .map(|handler| self.spawn_call(handler, &report))
            .collect();
        let outcomes = join_all(calls.into_iter().map(|call| self.settle(call, &report))).await;

        let summary = DispatchSummary { outcomes };
        tracing::trace!(
            target: "taskguard",
            report = report.id,
            completed = summary.completed(),
            timed_out = summary.timed_out(),
            "fault report dispatched"
        );
        summary
    }

    /// Spawns one handler invocation inside a guarded frame.
    fn spawn_call(&self, handler: &HandlerRef, report: &Arc<FaultReport>) -> Call {
        let name = catch(false, || handler.name()).unwrap_or("<unnamed>");
        let token = report.context.child_token();

        let h = Arc::clone(handler);
        let rep = Arc::clone(report);
        let ctx = token.clone();
        let fut = CatchTrap::new(async move { h.handle(rep, ctx).await }, self.capture_stack);

        Call {
            name,
            token,
            join: tokio::spawn(fut),
        }
    }

    /// Waits for one invocation within its budget and accounts the result.
    async fn settle(&self, call: Call, report: &FaultReport) -> (&'static str, HandlerOutcome) {
        let Call { name, token, join } = call;

        let joined = match self.timeout {
            Some(budget) => match time::timeout(budget, join).await {
                Ok(res) => res,
                Err(_elapsed) => {
                    token.cancel();
                    self.logger.handler_timeout(name, report, budget);
                    return (name, HandlerOutcome::TimedOut(budget));
                }
            },
            None => join.await,
        };

        let outcome = match joined {
            Ok(Ok(Ok(()))) => HandlerOutcome::Completed,
            Ok(Ok(Err(err))) => {
                self.logger.handler_failed(name, report, &err);
                HandlerOutcome::Failed(err)
            }
            Ok(Err(caught)) => {
                self.logger.handler_panicked(name, report, &caught.trap);
                HandlerOutcome::Panicked(caught.trap)
            }
            Err(join_err) => {
                let trap = if join_err.is_panic() {
                    Trap::from_payload(join_err.into_panic())
                } else {
                    Trap::from_message("handler task cancelled")
                };
                self.logger.handler_panicked(name, report, &trap);
                HandlerOutcome::Panicked(trap)
            }
        };
        (name, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerFn, LogSink};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[derive(Default)]
    struct Capture(Mutex<Vec<String>>);

    impl LogSink for Capture {
        fn log(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    impl Capture {
        fn count(&self, prefix: &str) -> usize {
            self.0.lock().unwrap().iter().filter(|l| l.starts_with(prefix)).count()
        }
    }

    fn dispatcher(timeout: Duration) -> (Dispatcher, Arc<Capture>) {
        let capture = Arc::new(Capture::default());
        let logger = Arc::new(Logger::new(Some(capture.clone())));
        let registry = Arc::new(HandlerRegistry::new(16));
        (Dispatcher::new(registry, logger, Some(timeout), false), capture)
    }

    fn counting(name: &'static str, hits: &Arc<AtomicUsize>) -> HandlerRef {
        let hits = hits.clone();
        HandlerFn::arc(name, move |_r: Arc<FaultReport>, _c: CancellationToken| {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HandlerError>(())
            }
        })
    }

    fn explode() -> Result<(), HandlerError> {
        panic!("handler exploded")
    }

    fn report() -> Arc<FaultReport> {
        Arc::new(FaultReport::new("test", Trap::from_message("boom")))
    }

    #[tokio::test]
    async fn empty_snapshot_falls_back_to_sink() {
        let (d, capture) = dispatcher(Duration::from_secs(1));
        let summary = d.dispatch(report()).await;
        assert_eq!(summary.invoked(), 0);
        assert_eq!(capture.count("[trap]"), 1);
    }

    #[tokio::test]
    async fn every_handler_is_invoked() {
        let (d, _capture) = dispatcher(Duration::from_secs(1));
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            d.registry.add(counting("count", &hits)).unwrap();
        }
        let summary = d.dispatch(report()).await;
        assert_eq!(hits.load(Ordering::SeqCst), 5);
        assert_eq!(summary.completed(), 5);
    }

    #[tokio::test]
    async fn panicking_handler_does_not_stop_siblings() {
        let (d, capture) = dispatcher(Duration::from_secs(1));
        let hits = Arc::new(AtomicUsize::new(0));
        let bomb: HandlerRef =
            HandlerFn::arc("bomb", |_r: Arc<FaultReport>, _c: CancellationToken| async {
                explode()
            });
        d.registry.add(bomb).unwrap();
        d.registry.add(counting("sibling", &hits)).unwrap();

        let summary = d.dispatch(report()).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(summary.panicked(), 1);
        assert_eq!(summary.outcomes[0].0, "bomb");
        assert!(matches!(
            &summary.outcomes[0].1,
            HandlerOutcome::Panicked(t) if t.message() == "handler exploded"
        ));
        assert_eq!(capture.count("[handler-panicked]"), 1);
    }

    #[tokio::test]
    async fn failing_handler_is_logged() {
        let (d, capture) = dispatcher(Duration::from_secs(1));
        let failing: HandlerRef =
            HandlerFn::arc("failing", |_r: Arc<FaultReport>, _c: CancellationToken| async {
                Err::<(), _>(HandlerError::failed("503"))
            });
        d.registry.add(failing).unwrap();

        let summary = d.dispatch(report()).await;
        assert_eq!(summary.failed(), 1);
        assert_eq!(capture.count("[handler-failed]"), 1);
    }

    #[tokio::test]
    async fn slow_handler_is_bounded_by_timeout() {
        let (d, capture) = dispatcher(Duration::from_millis(100));
        let cancelled = Arc::new(AtomicUsize::new(0));
        let seen = cancelled.clone();
        let slow: HandlerRef = HandlerFn::arc("slow", move |_r: Arc<FaultReport>, ctx: CancellationToken| {
            let seen = seen.clone();
            async move {
                ctx.cancelled().await;
                seen.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok::<_, HandlerError>(())
            }
        });
        d.registry.add(slow).unwrap();

        let started = Instant::now();
        let summary = d.dispatch(report()).await;
        let elapsed = started.elapsed();

        assert_eq!(summary.timed_out(), 1);
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(1000), "dispatch took {elapsed:?}");
        assert_eq!(capture.count("[handler-timeout]"), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cancelled.load(Ordering::SeqCst), 1, "handler observed its token");
    }

    #[tokio::test]
    async fn handlers_share_one_report() {
        let (d, _capture) = dispatcher(Duration::from_secs(1));
        let ids = Arc::new(Mutex::new(Vec::new()));
        for _ in 0..3 {
            let ids = ids.clone();
            let h: HandlerRef = HandlerFn::arc("ptr", move |r: Arc<FaultReport>, _c: CancellationToken| {
                let ids = ids.clone();
                async move {
                    ids.lock().unwrap().push(Arc::as_ptr(&r) as usize);
                    Ok::<_, HandlerError>(())
                }
            });
            d.registry.add(h).unwrap();
        }
        d.dispatch(report()).await;
        let ids = ids.lock().unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|p| *p == ids[0]));
    }
}
