//! # Guarded frames and the panic hook.
//!
//! `catch_unwind` alone only yields the payload; the panic site and a backtrace
//! pointing at it are only visible from the panic hook, which runs before unwinding.
//! A thread-local marker tells the hook that the panicking code is inside a guarded
//! frame and whether a backtrace was requested.
//!
//! ## Rules
//! - The hook is installed once per process and chains the previously installed hook.
//! - Panics outside guarded frames are forwarded to the previous hook untouched.
//! - Panics inside guarded frames are recorded silently (no default panic print).
//! - Frames nest: the innermost frame's capture flag wins, the outer marker is
//!   restored on exit.
//! - What the hook recorded is attached to a trap only if its message matches the
//!   caught payload. A payload re-raised with `resume_unwind` after an unrelated panic
//!   was caught by user code inside the frame carries no location or stack.
//! - Panics that user code catches itself inside a guarded frame are not printed
//!   by the default hook either.

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use super::Trap;
use super::cause::payload_message;

static HOOK: Once = Once::new();

thread_local! {
    /// `Some(capture_stack)` while inside a guarded frame.
    static FRAME: Cell<Option<bool>> = const { Cell::new(None) };
    /// What the hook saw for the most recent guarded panic on this thread.
    static SEEN: RefCell<Option<Seen>> = const { RefCell::new(None) };
}

struct Seen {
    message: String,
    location: Option<String>,
    stack: Option<String>,
}

/// A trap intercepted by [`catch`], with the stack text when it was captured.
#[derive(Debug)]
pub(crate) struct Caught {
    pub(crate) trap: Trap,
    pub(crate) stack: Option<String>,
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let frame = FRAME.try_with(Cell::get).ok().flatten();
            let Some(capture_stack) = frame else {
                previous(info);
                return;
            };
            let seen = Seen {
                message: payload_message(info.payload()),
                location: info.location().map(|l| l.to_string()),
                stack: capture_stack.then(|| Backtrace::force_capture().to_string()),
            };
            let _ = SEEN.try_with(|s| *s.borrow_mut() = Some(seen));
        }));
    });
}

/// Runs `f` inside a guarded frame.
///
/// Returns `Ok` with the closure result, or `Err(Caught)` if it panicked.
/// `capture_stack` controls whether a backtrace is recorded for the panic.
pub(crate) fn catch<R>(capture_stack: bool, f: impl FnOnce() -> R) -> Result<R, Caught> {
    install_hook();

    SEEN.with(|s| s.borrow_mut().take());
    let outer = FRAME.with(|frame| frame.replace(Some(capture_stack)));
    let res = panic::catch_unwind(AssertUnwindSafe(f));
    FRAME.with(|frame| frame.set(outer));
    let seen = SEEN.with(|s| s.borrow_mut().take());

    res.map_err(|payload| {
        let trap = Trap::from_payload(payload);
        let (location, stack) = match seen {
            Some(seen) if seen.message == trap.message() => (seen.location, seen.stack),
            _ => (None, None),
        };
        Caught {
            trap: trap.with_location(location),
            stack,
        }
    })
}
