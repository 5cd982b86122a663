//! # Dispatch on the dedicated runtime.
//!
//! Guarded work runs on arbitrary threads and executors: plain threads, Tokio runtimes
//! built without a timer driver, or foreign executors polling a `protect` future.
//! Dispatch needs a Tokio runtime with every driver enabled, so reports produced by the
//! guard are dispatched on a dedicated runtime instead of the caller's.
//!
//! ```text
//! async path:  dispatch_isolated(report) ──► DISPATCH_RT.spawn(dispatch(report)) ──► await JoinHandle
//! sync path:   dispatch_blocking(report) ──► thread::scope ──► DISPATCH_RT.block_on(dispatch(report))
//!                                                                   └─► handlers spawned on DISPATCH_RT
//! ```
//!
//! The runtime has one worker per available core (at least two). Handlers that block
//! a worker thread delay timeout accounting for other handlers once every worker is
//! occupied.
//!
//! Handlers detached after a timeout keep running on the dedicated runtime.

use std::io;
use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock};
use std::thread;

use tokio::runtime::{Builder, Runtime};

use super::{DispatchSummary, Dispatcher};
use crate::report::FaultReport;

static DISPATCH_RT: LazyLock<io::Result<Runtime>> = LazyLock::new(|| {
    let workers = thread::available_parallelism()
        .map_or(2, NonZeroUsize::get)
        .max(2);
    Builder::new_multi_thread()
        .worker_threads(workers)
        .thread_name("taskguard-dispatch")
        .enable_all()
        .build()
});

impl Dispatcher {
    /// Runs [`dispatch`](Self::dispatch) on the dedicated runtime and awaits it.
    ///
    /// The returned future may be polled by any executor, inside or outside a Tokio
    /// runtime, and never panics.
    pub async fn dispatch_isolated(&self, report: Arc<FaultReport>) -> DispatchSummary {
        if self.registry.is_empty() {
            self.logger.unhandled(&report);
            return DispatchSummary::default();
        }
        let Some(rt) = self.dispatch_runtime(&report) else {
            return DispatchSummary::default();
        };

        let this = self.clone();
        let id = report.id;
        match rt.spawn(async move { this.dispatch(report).await }).await {
            Ok(summary) => summary,
            Err(err) => {
                self.logger
                    .log(&format!("[dispatch-unavailable] report={id} err=\"{err}\""));
                DispatchSummary::default()
            }
        }
    }

    /// Runs [`dispatch`](Self::dispatch) to completion from synchronous code.
    ///
    /// Safe to call inside or outside a Tokio runtime; blocks the calling thread
    /// until every handler finished or ran out of budget.
    pub fn dispatch_blocking(&self, report: Arc<FaultReport>) -> DispatchSummary {
        if self.registry.is_empty() {
            self.logger.unhandled(&report);
            return DispatchSummary::default();
        }
        let Some(rt) = self.dispatch_runtime(&report) else {
            return DispatchSummary::default();
        };

        let id = report.id;
        let joined = thread::scope(|s| s.spawn(|| rt.block_on(self.dispatch(report))).join());
        joined.unwrap_or_else(|_| {
            self.logger
                .log(&format!("[dispatch-unavailable] report={id} err=\"dispatch thread panicked\""));
            DispatchSummary::default()
        })
    }

    /// The dedicated runtime; if it could not be built, the report goes to the sink.
    fn dispatch_runtime(&self, report: &FaultReport) -> Option<&'static Runtime> {
        match DISPATCH_RT.as_ref() {
            Ok(rt) => Some(rt),
            Err(err) => {
                self.logger
                    .log(&format!("[dispatch-unavailable] report={} err={err}", report.id));
                self.logger.unhandled(report);
                None
            }
        }
    }
}
