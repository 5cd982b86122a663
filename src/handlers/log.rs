//! # LogHandler: simple report printer
//!
//! A minimal handler that writes every report it receives to a [`LogSink`].
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [fault] report=0 source="worker" cause="boom" at=src/main.rs:12:9
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::handlers::FaultHandler;
use crate::logging::{LogSink, StderrSink};
use crate::report::FaultReport;

/// Report writer handler.
pub struct LogHandler {
    sink: Arc<dyn LogSink>,
    with_stack: bool,
}

impl LogHandler {
    /// Writes to stderr, without stack text.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(StderrSink))
    }

    /// Writes to the given sink.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            with_stack: false,
        }
    }

    /// Also writes the stack text of reports that carry one.
    #[must_use]
    pub fn print_stack(mut self, enabled: bool) -> Self {
        self.with_stack = enabled;
        self
    }
}

impl Default for LogHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FaultHandler for LogHandler {
    async fn handle(
        &self,
        report: Arc<FaultReport>,
        _ctx: CancellationToken,
    ) -> Result<(), HandlerError> {
        self.sink.log(&format!("[fault] {report}"));
        if self.with_stack {
            if let Some(stack) = &report.stack {
                self.sink.log(stack);
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Trap;
    use std::sync::Mutex;

    #[tokio::test]
    async fn writes_report_line() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink_lines = lines.clone();
        let sink = Arc::new(move |msg: &str| sink_lines.lock().unwrap().push(msg.to_string()));

        let handler = LogHandler::with_sink(sink).print_stack(true);
        let report = Arc::new(FaultReport::new("worker", Trap::from_message("boom")).with_stack("trace"));
        handler
            .handle(report, CancellationToken::new())
            .await
            .unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[fault] report="));
        assert!(lines[0].contains("cause=\"boom\""));
        assert_eq!(lines[1], "trace");
    }
}
