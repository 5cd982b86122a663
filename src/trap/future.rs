//! # Guarded future.
//!
//! [`CatchTrap`] polls the inner future inside a guarded frame on every poll, so a
//! panic raised on any worker thread the task migrates to is intercepted the same
//! way as a synchronous one.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::frame::{Caught, catch};

/// Future adapter resolving to `Err(Caught)` if the inner future panics.
///
/// After a trap the inner future is never polled again.
pub(crate) struct CatchTrap<F> {
    inner: Pin<Box<F>>,
    capture_stack: bool,
}

impl<F: Future> CatchTrap<F> {
    pub(crate) fn new(fut: F, capture_stack: bool) -> Self {
        Self {
            inner: Box::pin(fut),
            capture_stack,
        }
    }
}

impl<F: Future> Future for CatchTrap<F> {
    type Output = Result<F::Output, Caught>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let capture_stack = self.capture_stack;
        let inner = self.inner.as_mut();
        match catch(capture_stack, move || inner.poll(cx)) {
            Ok(Poll::Ready(out)) => Poll::Ready(Ok(out)),
            Ok(Poll::Pending) => Poll::Pending,
            Err(caught) => Poll::Ready(Err(caught)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn passes_output_through() {
        let out = CatchTrap::new(async { 7 }, false).await;
        assert_eq!(out.ok(), Some(7));
    }

    #[tokio::test]
    async fn catches_panic_after_suspension() {
        let fut = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            panic!("late boom");
        };
        let caught = CatchTrap::new(fut, true).await.unwrap_err();
        assert_eq!(caught.trap.message(), "late boom");
        assert!(caught.stack.is_some());
    }
}
