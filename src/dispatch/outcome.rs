//! # Dispatch accounting.
//!
//! Every handler call of a dispatch ends in exactly one [`HandlerOutcome`].
//! [`DispatchSummary`] keeps them in registration order.

use std::time::Duration;

use crate::error::HandlerError;
use crate::trap::Trap;

/// Result of one handler invocation.
#[derive(Debug, Clone)]
pub enum HandlerOutcome {
    /// Handler returned `Ok(())` within its budget.
    Completed,
    /// Handler returned an error.
    Failed(HandlerError),
    /// Handler panicked; the panic was contained.
    Panicked(Trap),
    /// Handler was still running when its budget ran out.
    ///
    /// The call was not aborted; its token was cancelled.
    TimedOut(Duration),
}

impl HandlerOutcome {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerOutcome::Completed => "handler_completed",
            HandlerOutcome::Failed(_) => "handler_failed",
            HandlerOutcome::Panicked(_) => "handler_panicked",
            HandlerOutcome::TimedOut(_) => "handler_timeout",
        }
    }

    /// Returns `true` for [`HandlerOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, HandlerOutcome::Completed)
    }
}

/// Outcomes of one dispatch, in registration order of the snapshot.
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    /// `(handler name, outcome)` pairs.
    pub outcomes: Vec<(&'static str, HandlerOutcome)>,
}

impl DispatchSummary {
    /// Number of handlers invoked.
    pub fn invoked(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of handlers that completed successfully.
    pub fn completed(&self) -> usize {
        self.count(HandlerOutcome::is_completed)
    }

    /// Number of handlers accounted as timed out.
    pub fn timed_out(&self) -> usize {
        self.count(|o| matches!(o, HandlerOutcome::TimedOut(_)))
    }

    /// Number of handlers that panicked.
    pub fn panicked(&self) -> usize {
        self.count(|o| matches!(o, HandlerOutcome::Panicked(_)))
    }

    /// Number of handlers that reported an error.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, HandlerOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&HandlerOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}
