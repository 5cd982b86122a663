//! # Fault handler trait.
//!
//! Provides [`FaultHandler`] the extension point invoked with every dispatched
//! [`FaultReport`].
//!
//! Each invocation gets:
//! - **Dedicated task** (handlers of one report run concurrently)
//! - **Own budget** (`GuardConfig::handler_timeout`)
//! - **Panic isolation** (a panicking handler is logged, siblings keep running)
//!
//! ## Rules
//! - Completion order across handlers is unspecified.
//! - A handler past its budget is not aborted: its token is cancelled and it is
//!   expected to return promptly.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::report::FaultReport;

/// Shared handle to a registered handler.
///
/// Removal from a registry matches handles by identity (same allocation).
pub type HandlerRef = Arc<dyn FaultHandler>;

/// Observer of intercepted traps.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor. Handlers share a dispatch runtime
///   with one worker per core: a handler blocking a worker thread can delay the
///   timeout accounting of other handlers once every worker is busy.
/// - Check `ctx` in long operations: it is cancelled when the budget runs out or
///   when the guarded work's own context is cancelled.
/// - Report failures through the returned `Result`; panics are caught but noisy.
#[async_trait]
pub trait FaultHandler: Send + Sync + 'static {
    /// Processes one report.
    ///
    /// Every handler of a dispatch receives the same `Arc`. `ctx` is a child of
    /// [`FaultReport::context`].
    async fn handle(
        &self,
        report: Arc<FaultReport>,
        ctx: CancellationToken,
    ) -> Result<(), HandlerError>;

    /// Returns the handler name used in log records.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
