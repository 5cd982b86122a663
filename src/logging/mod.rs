//! Logging fallback for traps nobody handles.
//!
//! The guard writes a one-line record to its [`LogSink`] when:
//! - no handler is registered (`[trap]`);
//! - the guard is disabled (`[trap-ignored]`);
//! - a handler fails, panics, or runs out of budget (`[handler-*]`);
//! - a completion callback panics (`[callback-panicked]`).
//!
//! ## Contents
//! - [`LogSink`] the sink capability, plus [`StderrSink`] (default) and [`TracingSink`]
//! - `Logger` the swappable sink slot owned by a guard

mod logger;
mod sink;

pub(crate) use logger::Logger;
pub use sink::{LogSink, StderrSink, TracingSink};
