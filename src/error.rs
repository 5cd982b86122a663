//! Error types used by the taskguard runtime and fault handlers.
//!
//! This module defines three error enums:
//!
//! - [`RegistryError`]: errors returned synchronously by handler registration.
//! - [`HandlerError`]: failures reported by a [`FaultHandler`](crate::FaultHandler) itself.
//! - [`WorkError`]: the error side of a guarded result-returning callable.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

use crate::trap::Trap;

/// # Errors produced by handler registration.
///
/// These are the only errors surfaced synchronously to direct callers;
/// everything else is observable only through the logging sink or handlers.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry already holds the configured maximum number of handlers.
    #[error("handler registry is full (max {max})")]
    CapacityExceeded {
        /// Configured capacity of the registry.
        max: usize,
    },

    /// No handler was supplied.
    #[error("handler is missing")]
    MissingHandler,
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use taskguard::RegistryError;
    ///
    /// let err = RegistryError::CapacityExceeded { max: 2 };
    /// assert_eq!(err.as_label(), "registry_capacity_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::CapacityExceeded { .. } => "registry_capacity_exceeded",
            RegistryError::MissingHandler => "registry_missing_handler",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::CapacityExceeded { max } => format!("capacity exceeded: max={max}"),
            RegistryError::MissingHandler => "missing handler".to_string(),
        }
    }
}

/// # Errors reported by a fault handler.
///
/// A handler returns one of these to signal that it could not process a report.
/// The dispatcher writes it to the logging sink; it never affects other handlers
/// or the guarded work.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Handler failed to process the report.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Handler observed its cancellation token and gave up.
    #[error("handler cancelled")]
    Canceled,
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn failed(error: impl Into<String>) -> Self {
        HandlerError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("error: {error}"),
            HandlerError::Canceled => "handler cancelled".to_string(),
        }
    }
}

/// # Error returned by a guarded result-returning callable.
///
/// Distinguishes the work's own error from a trap intercepted while running it.
/// A trap is surfaced as [`WorkError::Trapped`] carrying the normalized [`Trap`],
/// so the caller sees the panic message rather than a generic sentinel.
///
/// # Example
/// ```
/// use taskguard::{TaskGuard, WorkError};
///
/// let guard = TaskGuard::default();
/// let parse = guard.wrap_result("parse", Some(|| "42".parse::<u32>()));
/// assert_eq!(parse().ok(), Some(42));
///
/// let boom = guard.wrap_result("boom", Some(|| -> Result<u32, std::num::ParseIntError> {
///     panic!("bad input")
/// }));
/// match boom() {
///     Err(WorkError::Trapped(trap)) => assert_eq!(trap.message(), "bad input"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum WorkError<E> {
    /// The work returned its own error.
    #[error("work failed: {0}")]
    Failed(E),

    /// The work trapped; the trap was reported and converted into this value.
    #[error("work trapped: {0}")]
    Trapped(Trap),
}

impl<E> WorkError<E> {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkError::Failed(_) => "work_failed",
            WorkError::Trapped(_) => "work_trapped",
        }
    }

    /// Returns `true` if the work trapped.
    pub fn is_trap(&self) -> bool {
        matches!(self, WorkError::Trapped(_))
    }

    /// Returns the intercepted trap, if any.
    pub fn trap(&self) -> Option<&Trap> {
        match self {
            WorkError::Trapped(trap) => Some(trap),
            WorkError::Failed(_) => None,
        }
    }
}

impl<E: std::fmt::Display> WorkError<E> {
    /// Returns a human-readable message with details.
    pub fn as_message(&self) -> String {
        match self {
            WorkError::Failed(e) => format!("work failed: {e}"),
            WorkError::Trapped(trap) => format!("work trapped: {}", trap.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_labels_are_stable() {
        assert_eq!(
            RegistryError::CapacityExceeded { max: 1 }.as_label(),
            "registry_capacity_exceeded"
        );
        assert_eq!(RegistryError::MissingHandler.as_label(), "registry_missing_handler");
        assert_eq!(
            RegistryError::CapacityExceeded { max: 7 }.to_string(),
            "handler registry is full (max 7)"
        );
    }

    #[test]
    fn handler_error_message() {
        let err = HandlerError::failed("smtp down");
        assert_eq!(err.as_label(), "handler_failed");
        assert_eq!(err.as_message(), "error: smtp down");
        assert_eq!(err.to_string(), "handler failed: smtp down");
    }

    #[test]
    fn work_error_exposes_trap() {
        let err: WorkError<std::io::Error> = WorkError::Trapped(Trap::from_message("boom"));
        assert!(err.is_trap());
        assert_eq!(err.trap().map(Trap::message), Some("boom"));
        assert_eq!(err.as_label(), "work_trapped");

        let err: WorkError<&str> = WorkError::Failed("nope");
        assert!(!err.is_trap());
        assert!(err.trap().is_none());
        assert_eq!(err.as_message(), "work failed: nope");
    }
}
