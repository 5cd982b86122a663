//! # Swappable sink slot.
//!
//! Each guard owns one `Logger`; `TaskGuard::set_logger` swaps the sink at runtime.
//! Readers clone the current `Arc` out of the lock, so a slow sink never holds it.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use super::{LogSink, StderrSink};
use crate::report::FaultReport;
use crate::trap::Trap;

pub(crate) struct Logger {
    sink: RwLock<Arc<dyn LogSink>>,
}

impl Logger {
    pub(crate) fn new(sink: Option<Arc<dyn LogSink>>) -> Self {
        Self {
            sink: RwLock::new(sink.unwrap_or_else(default_sink)),
        }
    }

    /// Replaces the sink; `None` restores the default stderr sink.
    pub(crate) fn set(&self, sink: Option<Arc<dyn LogSink>>) {
        let sink = sink.unwrap_or_else(default_sink);
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = sink;
    }

    pub(crate) fn current(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.sink.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn log(&self, message: &str) {
        self.current().log(message);
    }

    pub(crate) fn unhandled(&self, report: &FaultReport) {
        self.log(&format!("[trap] {report}"));
        if let Some(stack) = &report.stack {
            self.log(stack);
        }
    }

    pub(crate) fn ignored(&self, report: &FaultReport) {
        self.log(&format!("[trap-ignored] {report}"));
    }

    pub(crate) fn handler_failed(
        &self,
        handler: &str,
        report: &FaultReport,
        err: &dyn std::fmt::Display,
    ) {
        self.log(&format!(
            "[handler-failed] handler={handler:?} report={} err={:?}",
            report.id,
            err.to_string()
        ));
    }

    pub(crate) fn handler_panicked(&self, handler: &str, report: &FaultReport, trap: &Trap) {
        self.log(&format!(
            "[handler-panicked] handler={handler:?} report={} info={:?}",
            report.id,
            trap.to_string()
        ));
    }

    pub(crate) fn handler_timeout(&self, handler: &str, report: &FaultReport, timeout: Duration) {
        self.log(&format!(
            "[handler-timeout] handler={handler:?} report={} timeout={timeout:?}",
            report.id
        ));
    }

    pub(crate) fn callback_panicked(&self, source: &str, trap: &Trap) {
        self.log(&format!(
            "[callback-panicked] source={source:?} info={:?}",
            trap.to_string()
        ));
    }
}

fn default_sink() -> Arc<dyn LogSink> {
    Arc::new(StderrSink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<String>>);

    impl LogSink for Capture {
        fn log(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn swaps_and_restores_sink() {
        let capture = Arc::new(Capture::default());
        let logger = Logger::new(None);

        logger.set(Some(capture.clone()));
        logger.ignored(&FaultReport::new("job", Trap::from_message("boom")));
        assert_eq!(capture.0.lock().unwrap().len(), 1);
        assert!(capture.0.lock().unwrap()[0].starts_with("[trap-ignored]"));

        logger.set(None);
        logger.log("to stderr");
        assert_eq!(capture.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn unhandled_writes_stack_when_present() {
        let capture = Arc::new(Capture::default());
        let logger = Logger::new(Some(capture.clone()));
        let report = FaultReport::new("job", Trap::from_message("boom")).with_stack("frame 0");
        logger.unhandled(&report);
        let lines = capture.0.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "frame 0");
    }
}
