//! Trap interception: catching panics inside guarded frames.
//!
//! A *trap* is a panic raised by guarded work or by a fault handler. This module
//! turns it into a value:
//! - [`Trap`] the normalized cause (message, panic site, optional error source);
//! - [`catch`](frame::catch) runs a closure inside a guarded frame;
//! - [`CatchTrap`](future::CatchTrap) does the same for every poll of a future.
//!
//! ## Architecture
//! ```text
//! catch(capture, f) / CatchTrap::poll
//!     │
//!     ├─► mark thread-local frame (capture flag)
//!     ├─► catch_unwind(f)
//!     │       └─ panic ──► panic hook (installed once)
//!     │                      ├─ in guarded frame: record location + backtrace, stay silent
//!     │                      └─ otherwise: forward to the previous hook
//!     ├─► restore previous frame marker
//!     └─► Err(Caught { trap, stack })
//! ```

mod cause;
pub(crate) mod frame;
pub(crate) mod future;

pub use cause::Trap;
pub(crate) use frame::{Caught, catch};
pub(crate) use future::CatchTrap;
