//! # Fault handlers.
//!
//! This module provides the [`FaultHandler`] trait, a closure-backed implementation
//! ([`HandlerFn`]) and the bounded [`HandlerRegistry`] the dispatcher reads from.
//!
//! ## Architecture
//! ```text
//! TaskGuard::add_handler(h) ──► HandlerRegistry (copy-on-write Arc<[HandlerRef]>)
//!                                        │ snapshot()
//!                                        ▼
//!                                   Dispatcher ──► h1.handle(report, ctx)
//!                                              ├─► h2.handle(report, ctx)
//!                                              └─► hN.handle(report, ctx)
//! ```
//!
//! ## Implementing custom handlers
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use taskguard::{FaultHandler, FaultReport, HandlerError};
//! use tokio_util::sync::CancellationToken;
//!
//! struct Pager;
//!
//! #[async_trait]
//! impl FaultHandler for Pager {
//!     async fn handle(&self, report: Arc<FaultReport>, ctx: CancellationToken) -> Result<(), HandlerError> {
//!         if ctx.is_cancelled() {
//!             return Err(HandlerError::Canceled);
//!         }
//!         // page someone about report.source ...
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "pager" }
//! }
//! ```

mod handler;
mod handler_fn;
#[cfg(feature = "logging")]
mod log;
mod registry;

pub use handler::{FaultHandler, HandlerRef};
pub use handler_fn::HandlerFn;
#[cfg(feature = "logging")]
pub use log::LogHandler;
pub use registry::HandlerRegistry;
