//! # TaskGuard: the fault-containment instance.
//!
//! The [`TaskGuard`] owns a handler registry, its configuration, a logging sink slot
//! and an enabled flag. Entry points live in sibling modules:
//! - `launch`: spawn guarded futures and the async scoped guard (`protect*`)
//! - `wrap`: guarded synchronous callables and the sync scoped guard (`recover*`)
//!
//! ## Lifecycle
//! ```text
//!   Enabled ◄──── enable() ────┐
//!      │                       │
//!      └────── disable() ──► Disabled
//!
//! Enabled:  trap ──► FaultReport ──► Dispatcher ──► handlers (or sink if none)
//! Disabled: trap ──► FaultReport ──► sink "[trap-ignored]"
//! ```
//! A trap is intercepted in both states; the state only decides where the report goes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use tokio_util::sync::CancellationToken;

use crate::config::GuardConfig;
use crate::dispatch::Dispatcher;
use crate::error::RegistryError;
use crate::guard::TaskGuardBuilder;
use crate::handlers::{HandlerRef, HandlerRegistry};
use crate::logging::{LogSink, Logger};
use crate::report::FaultReport;
use crate::trap::{Caught, Trap, catch};

pub(super) struct Inner {
    pub(super) cfg: GuardConfig,
    pub(super) registry: Arc<HandlerRegistry>,
    pub(super) logger: Arc<Logger>,
    pub(super) dispatcher: Dispatcher,
    pub(super) enabled: AtomicBool,
}

/// Fault-containment instance.
///
/// Cloning is cheap and yields a handle to the **same** instance (registry, sink, flag).
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use tokio_util::sync::CancellationToken;
/// use taskguard::{FaultReport, HandlerError, HandlerFn, HandlerRef, TaskGuard};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let guard = TaskGuard::default();
///
///     let seen = Arc::new(AtomicBool::new(false));
///     let flag = seen.clone();
///     let handler: HandlerRef = HandlerFn::arc("flag", move |_r: Arc<FaultReport>, _c: CancellationToken| {
///         let flag = flag.clone();
///         async move {
///             flag.store(true, Ordering::SeqCst);
///             Ok::<_, HandlerError>(())
///         }
///     });
///     guard.add_handler(handler).unwrap();
///
///     guard.launch("x", async { panic!("trap") }).await.unwrap();
///     assert!(seen.load(Ordering::SeqCst));
/// }
/// ```
#[derive(Clone)]
pub struct TaskGuard {
    pub(super) inner: Arc<Inner>,
}

impl TaskGuard {
    /// Returns a builder for a guard with the given configuration.
    pub fn builder(cfg: GuardConfig) -> TaskGuardBuilder {
        TaskGuardBuilder::new(cfg)
    }

    /// Creates an enabled guard with no handlers and the default stderr sink.
    pub fn new(cfg: GuardConfig) -> Self {
        Self::from_parts(cfg, None, true)
    }

    pub(super) fn from_parts(
        cfg: GuardConfig,
        sink: Option<Arc<dyn LogSink>>,
        enabled: bool,
    ) -> Self {
        let registry = Arc::new(HandlerRegistry::new(cfg.max_handlers));
        let logger = Arc::new(Logger::new(sink));
        let dispatcher = Dispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&logger),
            cfg.timeout(),
            cfg.capture_stack,
        );
        Self {
            inner: Arc::new(Inner {
                cfg,
                registry,
                logger,
                dispatcher,
                enabled: AtomicBool::new(enabled),
            }),
        }
    }

    /// Configuration this guard was built with.
    pub fn config(&self) -> &GuardConfig {
        &self.inner.cfg
    }

    /// Resumes dispatching for traps intercepted from now on.
    pub fn enable(&self) {
        self.inner.enabled.store(true, AtomicOrdering::Release);
    }

    /// Stops dispatching; traps are still intercepted and written to the sink.
    pub fn disable(&self) {
        self.inner.enabled.store(false, AtomicOrdering::Release);
    }

    /// Returns `true` while reports are dispatched to handlers.
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(AtomicOrdering::Acquire)
    }

    /// Registers a handler.
    ///
    /// Pass a [`HandlerRef`]; `None` is rejected with [`RegistryError::MissingHandler`],
    /// a full registry with [`RegistryError::CapacityExceeded`].
    pub fn add_handler(&self, handler: impl Into<Option<HandlerRef>>) -> Result<(), RegistryError> {
        self.inner.registry.add(handler)
    }

    /// Unregisters a handler by identity. Unknown handlers are ignored.
    ///
    /// Returns `true` if the handler was registered.
    pub fn remove_handler(&self, handler: &HandlerRef) -> bool {
        self.inner.registry.remove(handler)
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Unregisters every handler.
    pub fn clear_handlers(&self) {
        self.inner.registry.clear();
    }

    /// Replaces the fallback sink; `None` restores the default stderr sink.
    pub fn set_logger(&self, sink: Option<Arc<dyn LogSink>>) {
        self.inner.logger.set(sink);
    }

    /// The dispatcher, for reporting faults that were not intercepted by this guard.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// Returns `true` if both handles point to the same instance.
    pub fn ptr_eq(a: &TaskGuard, b: &TaskGuard) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    // ---------------------------
    // Interception plumbing
    // ---------------------------

    /// Reports a trap from async code, on whatever executor polls the caller.
    pub(super) async fn report(&self, label: Arc<str>, caught: Caught, ctx: Option<CancellationToken>) {
        let report = FaultReport::from_caught(label, caught.trap, caught.stack, ctx);
        if self.is_enabled() {
            self.inner.dispatcher.dispatch_isolated(report).await;
        } else {
            self.inner.logger.ignored(&report);
        }
    }

    /// Runs `f` in a guarded frame; on trap, dispatches synchronously and returns the trap.
    pub(super) fn run_blocking<R>(
        &self,
        label: &Arc<str>,
        ctx: Option<CancellationToken>,
        f: impl FnOnce() -> R,
    ) -> Result<R, Trap> {
        let caught = match catch(self.inner.cfg.capture_stack, f) {
            Ok(out) => return Ok(out),
            Err(caught) => caught,
        };
        let trap = caught.trap.clone();
        let report = FaultReport::from_caught(Arc::clone(label), caught.trap, caught.stack, ctx);
        if self.is_enabled() {
            self.inner.dispatcher.dispatch_blocking(report);
        } else {
            self.inner.logger.ignored(&report);
        }
        Err(trap)
    }

    /// Runs a completion callback; its trap is logged and swallowed.
    pub(super) fn run_callback(&self, label: &str, on_done: impl FnOnce()) {
        if let Err(caught) = catch(false, on_done) {
            self.inner.logger.callback_panicked(label, &caught.trap);
        }
    }
}

impl Default for TaskGuard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerError, HandlerFn};

    fn noop() -> HandlerRef {
        HandlerFn::arc("noop", |_r: Arc<FaultReport>, _c: CancellationToken| async {
            Ok::<_, HandlerError>(())
        })
    }

    #[test]
    fn capacity_scenario() {
        let guard = TaskGuard::new(GuardConfig::default().with_max_handlers(2));
        guard.add_handler(noop()).unwrap();
        guard.add_handler(noop()).unwrap();

        let err = guard.add_handler(noop()).unwrap_err();
        assert_eq!(err, RegistryError::CapacityExceeded { max: 2 });
        assert_eq!(guard.handler_count(), 2);
    }

    #[test]
    fn remove_unknown_handler_is_noop() {
        let guard = TaskGuard::default();
        let registered = noop();
        guard.add_handler(registered.clone()).unwrap();

        assert!(!guard.remove_handler(&noop()));
        assert_eq!(guard.handler_count(), 1);

        assert!(guard.remove_handler(&registered));
        assert_eq!(guard.handler_count(), 0);
        guard.add_handler(noop()).unwrap();
        guard.clear_handlers();
        assert_eq!(guard.handler_count(), 0);
    }

    #[test]
    fn missing_handler_is_a_validation_error() {
        let guard = TaskGuard::default();
        assert_eq!(
            guard.add_handler(None::<HandlerRef>),
            Err(RegistryError::MissingHandler)
        );
    }

    #[test]
    fn enable_disable_toggles() {
        let guard = TaskGuard::default();
        assert!(guard.is_enabled());
        guard.disable();
        assert!(!guard.is_enabled());
        guard.enable();
        assert!(guard.is_enabled());
    }

    #[test]
    fn clones_share_the_instance() {
        let a = TaskGuard::default();
        let b = a.clone();
        b.add_handler(noop()).unwrap();
        assert_eq!(a.handler_count(), 1);
        assert!(TaskGuard::ptr_eq(&a, &b));
        assert!(!TaskGuard::ptr_eq(&a, &TaskGuard::default()));
    }
}
