//! # Logging sinks.
//!
//! ## Example output
//! ```text
//! [trap] report=3 source="worker" cause="index out of bounds" at=src/main.rs:10:5
//! [trap-ignored] report=4 source="worker" cause="boom"
//! [handler-failed] handler="slack" report=5 err="handler failed: 503"
//! [handler-panicked] handler="audit" report=5 info="poisoned"
//! [handler-timeout] handler="mailer" report=5 timeout=5s
//! [callback-panicked] source="worker" info="boom"
//! ```

/// Anything able to record a formatted message.
///
/// Implementations must not block for long: they are called from dispatch paths.
pub trait LogSink: Send + Sync + 'static {
    /// Records one message.
    fn log(&self, message: &str);
}

/// Default sink: writes every message to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Forwards messages to [`tracing`] as `error` events with target `taskguard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::error!(target: "taskguard", "{message}");
    }
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn log(&self, message: &str) {
        self(message)
    }
}
