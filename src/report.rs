//! # Fault reports.
//!
//! A [`FaultReport`] is an immutable snapshot of one intercepted trap. It is built exactly
//! once per trap, wrapped in an `Arc`, and every handler invocation for that trap sees the
//! same instance.
//!
//! ## Example
//! ```rust
//! use taskguard::{FaultReport, Trap};
//!
//! let report = FaultReport::new("billing", Trap::from_message("boom"));
//! assert_eq!(report.source.as_ref(), "billing");
//! assert_eq!(report.cause.message(), "boom");
//! assert!(report.stack.is_none());
//! assert!(!report.context.is_cancelled());
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use tokio_util::sync::CancellationToken;

use crate::trap::Trap;

/// Global counter for report ids.
static REPORT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Snapshot of one intercepted trap.
///
/// - `id`: process-wide increasing number, for correlating log lines (not an ordering guarantee)
/// - `source`: caller-supplied label of the guarded work (may be empty)
/// - `cause`: the trap, normalized to an error value
/// - `at`: wall-clock capture time
/// - `stack`: backtrace text, only when stack capture is enabled
/// - `context`: token active when the trap occurred (a fresh one if none was supplied)
#[derive(Clone)]
pub struct FaultReport {
    /// Report number.
    pub id: u64,
    /// Label of the guarded work.
    pub source: Arc<str>,
    /// Normalized trap.
    pub cause: Trap,
    /// Capture timestamp.
    pub at: SystemTime,
    /// Backtrace of the panic site.
    pub stack: Option<String>,
    /// Execution context of the guarded work.
    pub context: CancellationToken,
}

impl FaultReport {
    /// Creates a report with a background context and no stack text.
    pub fn new(source: impl Into<Arc<str>>, cause: Trap) -> Self {
        Self {
            id: REPORT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            source: source.into(),
            cause,
            at: SystemTime::now(),
            stack: None,
            context: CancellationToken::new(),
        }
    }

    /// Attaches the execution context of the guarded work.
    #[inline]
    pub fn with_context(mut self, ctx: CancellationToken) -> Self {
        self.context = ctx;
        self
    }

    /// Attaches stack text.
    #[inline]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub(crate) fn from_caught(
        source: Arc<str>,
        trap: Trap,
        stack: Option<String>,
        ctx: Option<CancellationToken>,
    ) -> Arc<Self> {
        let mut report = Self::new(source, trap);
        report.stack = stack;
        if let Some(ctx) = ctx {
            report.context = ctx;
        }
        Arc::new(report)
    }
}

impl fmt::Debug for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultReport")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("cause", &self.cause)
            .field("at", &self.at)
            .field("has_stack", &self.stack.is_some())
            .finish_non_exhaustive()
    }
}

/// One-line summary used by the logging fallback.
impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "report={} source={:?} cause={:?}",
            self.id,
            self.source,
            self.cause.message()
        )?;
        if let Some(at) = self.cause.location() {
            write!(f, " at={at}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let a = FaultReport::new("a", Trap::from_message("x"));
        let b = FaultReport::new("b", Trap::from_message("y"));
        assert!(b.id > a.id);
    }

    #[test]
    fn carries_supplied_context() {
        let ctx = CancellationToken::new();
        let report = FaultReport::new("", Trap::from_message("x")).with_context(ctx.clone());
        ctx.cancel();
        assert!(report.context.is_cancelled());
        assert_eq!(report.source.as_ref(), "");
    }

    #[test]
    fn display_is_single_line() {
        let report = FaultReport::new("job", Trap::from_message("bad\nthing")).with_stack("s");
        let line = report.to_string();
        assert!(!line.contains('\n'));
        assert!(line.contains("source=\"job\""));
        assert_eq!(report.stack.as_deref(), Some("s"));
    }
}
