//! Guard runtime: the public entry points.
//!
//! The only public types from this module are [`TaskGuard`] and [`TaskGuardBuilder`],
//! plus the process-wide default accessors.
//!
//! Internal modules:
//! - [`task_guard`]: instance state, lifecycle, handler registration;
//! - [`launch`]: spawned and awaited guarded futures;
//! - [`wrap`]: guarded synchronous callables;
//! - [`builder`]: construction with handlers and sink;
//! - [`global`]: the swappable process-wide default guard.

mod builder;
mod global;
mod launch;
mod task_guard;
mod wrap;

pub use builder::TaskGuardBuilder;
pub use global::{global, replace_global, reset_global};
pub use task_guard::TaskGuard;
