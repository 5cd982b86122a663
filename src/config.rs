//! # Guard configuration.
//!
//! Provides [`GuardConfig`] construction-time settings of a [`TaskGuard`](crate::TaskGuard).
//!
//! | option            | field             | default |
//! |-------------------|-------------------|---------|
//! | `enableStackTrace`| `capture_stack`   | `true`  |
//! | `maxHandlers`     | `max_handlers`    | `100`   |
//! | `handlerTimeout`  | `handler_timeout` | `5s`    |
//!
//! ## Sentinel values
//! - `handler_timeout = 0s` → no per-handler budget (the dispatcher waits for every handler)

use std::time::Duration;

/// Construction-time settings of a guard.
///
/// The configuration is copied into the guard at build time and never changes afterwards.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use taskguard::GuardConfig;
///
/// let cfg = GuardConfig::default()
///     .with_max_handlers(2)
///     .with_handler_timeout(Duration::from_millis(200))
///     .with_stack_trace(false);
/// assert_eq!(cfg.max_handlers, 2);
/// assert_eq!(cfg.timeout(), Some(Duration::from_millis(200)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    /// Capture a backtrace into every [`FaultReport`](crate::FaultReport).
    pub capture_stack: bool,

    /// Maximum number of registered handlers.
    pub max_handlers: usize,

    /// Budget for a single handler invocation.
    ///
    /// - `Duration::ZERO` = no budget
    /// - `> 0` = a handler still running after this long is accounted as timed out
    ///   and its cancellation token is cancelled (it is not aborted)
    pub handler_timeout: Duration,
}

impl GuardConfig {
    /// Enables or disables stack capture.
    pub fn with_stack_trace(mut self, enabled: bool) -> Self {
        self.capture_stack = enabled;
        self
    }

    /// Sets the handler capacity.
    pub fn with_max_handlers(mut self, max: usize) -> Self {
        self.max_handlers = max;
        self
    }

    /// Sets the per-handler timeout.
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Returns the per-handler timeout as an `Option`.
    ///
    /// - `None` → no budget
    /// - `Some(d)` → budget applied per handler call
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        if self.handler_timeout == Duration::ZERO {
            None
        } else {
            Some(self.handler_timeout)
        }
    }
}

impl Default for GuardConfig {
    /// Default configuration:
    ///
    /// - `capture_stack = true`
    /// - `max_handlers = 100`
    /// - `handler_timeout = 5s`
    fn default() -> Self {
        Self {
            capture_stack: true,
            max_handlers: 100,
            handler_timeout: Duration::from_secs(5),
        }
    }
}
