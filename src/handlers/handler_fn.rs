//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(Arc<FaultReport>, CancellationToken) -> Fut`,
//! producing a fresh future per report.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tokio_util::sync::CancellationToken;
//! use taskguard::{FaultReport, HandlerError, HandlerFn, HandlerRef};
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = seen.clone();
//! let h: HandlerRef = HandlerFn::arc("counter", move |_report: Arc<FaultReport>, _ctx: CancellationToken| {
//!     let counter = counter.clone();
//!     async move {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         Ok::<_, HandlerError>(())
//!     }
//! });
//! assert_eq!(h.name(), "counter");
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::handlers::FaultHandler;
use crate::report::FaultReport;

/// Function-backed handler implementation.
pub struct HandlerFn<F> {
    name: &'static str,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> FaultHandler for HandlerFn<F>
where
    F: Fn(Arc<FaultReport>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(
        &self,
        report: Arc<FaultReport>,
        ctx: CancellationToken,
    ) -> Result<(), HandlerError> {
        (self.f)(report, ctx).await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
