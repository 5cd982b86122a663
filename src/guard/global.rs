//! # Process-wide default guard.
//!
//! Any code path may read the default with [`global`]. Replacing it swaps the whole
//! [`TaskGuard`] handle under a lock, so readers see either the old or the new instance,
//! never a mix. Handles obtained before a swap keep working against the old instance.
//!
//! Prefer passing a `TaskGuard` explicitly where feasible.

use std::sync::{LazyLock, PoisonError, RwLock};

use super::TaskGuard;

static GLOBAL: LazyLock<RwLock<TaskGuard>> = LazyLock::new(|| RwLock::new(TaskGuard::default()));

/// Returns a handle to the current default guard.
pub fn global() -> TaskGuard {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Installs `guard` as the default and returns the previous one.
pub fn replace_global(guard: TaskGuard) -> TaskGuard {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, guard)
}

/// Installs a fresh default-configured guard and returns the previous one.
pub fn reset_global() -> TaskGuard {
    replace_global(TaskGuard::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GuardConfig;

    #[test]
    fn swap_is_whole_reference() {
        let mine = TaskGuard::new(GuardConfig::default().with_max_handlers(3));
        let before = global();
        let previous = replace_global(mine.clone());

        assert!(TaskGuard::ptr_eq(&global(), &mine));
        assert_eq!(global().config().max_handlers, 3);
        assert!(TaskGuard::ptr_eq(&before, &previous));
        // handles taken earlier still point at the old instance
        assert!(!TaskGuard::ptr_eq(&before, &mine));

        reset_global();
        assert!(!TaskGuard::ptr_eq(&global(), &mine));
        assert_eq!(global().config().max_handlers, 100);
    }
}
