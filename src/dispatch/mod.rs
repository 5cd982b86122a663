//! Fault report fan-out.
//!
//! ## Contents
//! - [`Dispatcher`] concurrent delivery of one report to a registry snapshot
//! - [`HandlerOutcome`], [`DispatchSummary`] per-handler accounting
//! - `blocking` driving a dispatch from synchronous code

mod blocking;
mod dispatcher;
mod outcome;

pub use dispatcher::Dispatcher;
pub use outcome::{DispatchSummary, HandlerOutcome};
