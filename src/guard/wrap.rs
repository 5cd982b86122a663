//! # Guarded synchronous work.
//!
//! - **scoped guard** `recover` / `recover_with_context`: runs a closure now, in a guarded frame;
//! - **wrapping** `wrap*`: returns a callable that does the same every time it is invoked.
//!
//! Dispatch is synchronous here: a guarded call returns only after its report reached
//! every handler (or their budgets ran out). See `dispatch::blocking` for how this stays
//! safe on runtime threads.
//!
//! ## Absent work
//! Every `wrap*` takes `Option<F>`; `None` yields a callable that does nothing
//! (result variants return `Ok(T::default())`).
//!
//! ## Result variants
//! `wrap_result*` guard `Fn() -> Result<T, E>`. The work's own error comes back as
//! [`WorkError::Failed`]; a trap comes back as [`WorkError::Trapped`] holding the same
//! [`Trap`](crate::Trap) that was reported.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::WorkError;
use crate::guard::TaskGuard;

impl TaskGuard {
    /// Runs `f` in a guarded frame.
    ///
    /// Returns `None` if it trapped; the trap has been dispatched by then.
    pub fn recover<R>(&self, label: impl Into<Arc<str>>, f: impl FnOnce() -> R) -> Option<R> {
        self.run_blocking(&label.into(), None, f).ok()
    }

    /// Runs `f(ctx)` in a guarded frame; the report carries `ctx`.
    pub fn recover_with_context<R>(
        &self,
        label: impl Into<Arc<str>>,
        ctx: CancellationToken,
        f: impl FnOnce(CancellationToken) -> R,
    ) -> Option<R> {
        let child_ctx = ctx.clone();
        self.run_blocking(&label.into(), Some(ctx), move || f(child_ctx)).ok()
    }

    /// Returns a callable running `work` under trap interception.
    ///
    /// # Example
    /// ```
    /// use taskguard::TaskGuard;
    ///
    /// let guard = TaskGuard::default();
    /// let job = guard.wrap("job", Some(|| panic!("contained")));
    /// job(); // reported, not propagated
    ///
    /// let nothing = guard.wrap::<fn()>("empty", None);
    /// nothing();
    /// ```
    pub fn wrap<F>(
        &self,
        label: impl Into<Arc<str>>,
        work: Option<F>,
    ) -> impl Fn() + Send + Sync + 'static
    where
        F: Fn() + Send + Sync + 'static,
    {
        let guard = self.clone();
        let label = label.into();
        move || {
            if let Some(work) = &work {
                let _ = guard.run_blocking(&label, None, work);
            }
        }
    }

    /// Like [`wrap`](Self::wrap); invokes `on_done` after each trapped call.
    pub fn wrap_with_callback<F, C>(
        &self,
        label: impl Into<Arc<str>>,
        work: Option<F>,
        on_done: C,
    ) -> impl Fn() + Send + Sync + 'static
    where
        F: Fn() + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        let guard = self.clone();
        let label = label.into();
        move || {
            let Some(work) = &work else {
                return;
            };
            if guard.run_blocking(&label, None, work).is_err() {
                guard.run_callback(&label, &on_done);
            }
        }
    }

    /// Returns a callable running a result-returning `work` under trap interception.
    pub fn wrap_result<F, T, E>(
        &self,
        label: impl Into<Arc<str>>,
        work: Option<F>,
    ) -> impl Fn() -> Result<T, WorkError<E>> + Send + Sync + 'static
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        T: Default + 'static,
        E: 'static,
    {
        let guard = self.clone();
        let label = label.into();
        move || match &work {
            Some(work) => flatten(guard.run_blocking(&label, None, work)),
            None => Ok(T::default()),
        }
    }

    /// Like [`wrap_result`](Self::wrap_result); invokes `on_done` after each trapped call.
    pub fn wrap_result_with_callback<F, C, T, E>(
        &self,
        label: impl Into<Arc<str>>,
        work: Option<F>,
        on_done: C,
    ) -> impl Fn() -> Result<T, WorkError<E>> + Send + Sync + 'static
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
        T: Default + 'static,
        E: 'static,
    {
        let guard = self.clone();
        let label = label.into();
        move || {
            let Some(work) = &work else {
                return Ok(T::default());
            };
            let res = flatten(guard.run_blocking(&label, None, work));
            if matches!(res, Err(WorkError::Trapped(_))) {
                guard.run_callback(&label, &on_done);
            }
            res
        }
    }
}

fn flatten<T, E>(res: Result<Result<T, E>, crate::Trap>) -> Result<T, WorkError<E>> {
    match res {
        Ok(Ok(out)) => Ok(out),
        Ok(Err(err)) => Err(WorkError::Failed(err)),
        Err(trap) => Err(WorkError::Trapped(trap)),
    }
}
