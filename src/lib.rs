//! # taskguard
//!
//! **Taskguard** is a small fault-containment library for Rust.
//!
//! It runs units of work (spawned futures, awaited futures, synchronous callables) inside
//! a trap-catching frame. A panic raised by the work never escapes: it is turned into a
//! [`FaultReport`] and fanned out to a bounded set of observer handlers, each running under
//! its own timeout and itself protected from panics.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   launch()   │   │    wrap*()   │   │  recover() / │
//!     │ (tokio task) │   │  (callable)  │   │  protect()   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskGuard (fault-containment instance)                           │
//! │  - trap frame (catch_unwind + panic hook: location, backtrace)    │
//! │  - enabled flag (disabled: report goes to the sink only)          │
//! │  - HandlerRegistry (bounded, copy-on-write snapshot)              │
//! │  - Logger (fallback LogSink)                                      │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   │ Arc<FaultReport>
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │       Dispatcher       │
//!                       │  (one snapshot/report) │
//!                       └───┬────────────────┬───┘
//!                           ▼                ▼
//!                    no handlers       spawn per handler
//!                   (write to sink)  ┌─────────┼─────────┐
//!                                    ▼         ▼         ▼
//!                                 handle()  handle()  handle()
//!                                    │  timeout + catch  │
//!                                    └─────────┬─────────┘
//!                                              ▼
//!                                       DispatchSummary
//! ```
//!
//! ### Lifecycle
//! ```text
//! TaskGuard::new(cfg) ──► Enabled ◄──► Disabled
//!
//! work ─► catch frame
//!           ├─ Ok       ─► value returned to caller (wrap / recover / protect)
//!           └─ panic    ─► Trap + location (+ stack if capture_stack)
//!                           ├─ Enabled:  Dispatcher::dispatch_isolated(report)
//!                           │     └─ each handler: Completed | Failed | Panicked | TimedOut
//!                           ├─ Disabled: sink "[trap-ignored] ..."
//!                           └─ on_done() (callback variants, trap only)
//! ```
//!
//! ## Features
//! | Area              | Description                                                            | Key types / traits                          |
//! |-------------------|------------------------------------------------------------------------|---------------------------------------------|
//! | **Guard**         | Launch, wrap and recover units of work under a trap-catching frame.    | [`TaskGuard`], [`TaskGuardBuilder`]         |
//! | **Handlers**      | Observe fault reports, with per-handler timeout and isolation.         | [`FaultHandler`], [`HandlerFn`]             |
//! | **Dispatch**      | Fan a report out to the registry snapshot and collect outcomes.        | [`Dispatcher`], [`DispatchSummary`]         |
//! | **Reports**       | Immutable snapshot of one trap.                                        | [`FaultReport`], [`Trap`]                   |
//! | **Errors**        | Typed errors for registration, handlers and wrapped work.              | [`RegistryError`], [`HandlerError`], [`WorkError`] |
//! | **Configuration** | Centralize guard settings.                                             | [`GuardConfig`]                             |
//! | **Logging**       | Fallback sink for unhandled reports and handler failures.              | [`LogSink`], [`StderrSink`], [`TracingSink`] |
//! | **Default guard** | Process-wide, swappable default instance.                              | [`global`], [`replace_global`]              |
//!
//! ## Optional features
//! - `logging` (default): exports a simple built-in [`LogHandler`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskguard::{FaultReport, GuardConfig, HandlerError, HandlerFn, HandlerRef, TaskGuard};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = GuardConfig::default().with_handler_timeout(Duration::from_secs(1));
//!
//!     // Define a handler that prints every report
//!     let printer: HandlerRef = HandlerFn::arc("printer", |report: Arc<FaultReport>, _ctx: CancellationToken| async move {
//!         println!("fault in {}: {}", report.source, report.cause);
//!         Ok::<_, HandlerError>(())
//!     });
//!
//!     let guard = TaskGuard::builder(cfg).with_handlers(vec![printer]).build()?;
//!
//!     // The panic is contained; the task ends normally
//!     guard.launch("worker", async { panic!("boom") }).await?;
//!
//!     // Synchronous work returns `None` when it trapped
//!     let value = guard.recover("parse", || "42".parse::<u32>().ok());
//!     assert_eq!(value, Some(Some(42)));
//!     Ok(())
//! }
//! ```
mod config;
mod dispatch;
mod error;
mod guard;
mod handlers;
mod logging;
mod report;
mod trap;

// ---- Public re-exports ----

pub use config::GuardConfig;
pub use dispatch::{DispatchSummary, Dispatcher, HandlerOutcome};
pub use error::{HandlerError, RegistryError, WorkError};
pub use guard::{TaskGuard, TaskGuardBuilder, global, replace_global, reset_global};
pub use handlers::{FaultHandler, HandlerFn, HandlerRef, HandlerRegistry};
pub use logging::{LogSink, StderrSink, TracingSink};
pub use report::FaultReport;
pub use trap::Trap;

// Optional: expose a simple built-in report printer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogHandler;
