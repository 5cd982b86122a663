use std::sync::Arc;

use crate::{
    config::GuardConfig,
    error::RegistryError,
    handlers::HandlerRef,
    logging::LogSink,
};
use super::TaskGuard;

/// Builder for constructing a [`TaskGuard`] with handlers and a sink in place.
pub struct TaskGuardBuilder {
    cfg: GuardConfig,
    handlers: Vec<HandlerRef>,
    sink: Option<Arc<dyn LogSink>>,
    enabled: bool,
}

impl TaskGuardBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: GuardConfig) -> Self {
        Self {
            cfg,
            handlers: Vec::new(),
            sink: None,
            enabled: true,
        }
    }

    /// Sets the initial handlers, registered in order.
    pub fn with_handlers(mut self, handlers: Vec<HandlerRef>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Sets the fallback logging sink (default: stderr).
    pub fn with_logger(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Starts the guard in the disabled state.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Builds the guard.
    ///
    /// Fails with [`RegistryError::CapacityExceeded`] if more handlers were supplied
    /// than `max_handlers` allows.
    pub fn build(self) -> Result<TaskGuard, RegistryError> {
        let guard = TaskGuard::from_parts(self.cfg, self.sink, self.enabled);
        for handler in self.handlers {
            guard.add_handler(handler)?;
        }
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FaultReport, HandlerError, HandlerFn};
    use tokio_util::sync::CancellationToken;

    fn noop() -> HandlerRef {
        HandlerFn::arc("noop", |_r: Arc<FaultReport>, _c: CancellationToken| async {
            Ok::<_, HandlerError>(())
        })
    }

    #[test]
    fn builds_with_handlers_and_state() {
        let guard = TaskGuard::builder(GuardConfig::default())
            .with_handlers(vec![noop(), noop()])
            .with_logger(Arc::new(|_: &str| {}))
            .disabled()
            .build()
            .unwrap();
        assert_eq!(guard.handler_count(), 2);
        assert!(!guard.is_enabled());
    }

    #[test]
    fn too_many_handlers_fail_the_build() {
        let res = TaskGuard::builder(GuardConfig::default().with_max_handlers(1))
            .with_handlers(vec![noop(), noop()])
            .build();
        assert!(matches!(res, Err(RegistryError::CapacityExceeded { max: 1 })));
    }
}
