//! # Bounded handler registry.
//!
//! Ordered, capacity-bounded collection of [`HandlerRef`]s.
//!
//! ## Rules
//! - Size never exceeds the configured maximum; a failed add leaves the registry unchanged.
//! - Removal matches by identity (same `Arc` allocation), never by value.
//! - `snapshot()` is a point-in-time `Arc<[HandlerRef]>`: writers replace the slice
//!   instead of mutating it, so an in-flight dispatch iterates a stable view.
//! - Snapshot order is registration order.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::RegistryError;
use crate::handlers::HandlerRef;

/// Copy-on-write registry of fault handlers.
pub struct HandlerRegistry {
    handlers: RwLock<Arc<[HandlerRef]>>,
    max: usize,
}

impl HandlerRegistry {
    /// Creates an empty registry holding at most `max` handlers.
    pub fn new(max: usize) -> Self {
        Self {
            handlers: RwLock::new(Arc::from(Vec::new())),
            max,
        }
    }

    /// Appends a handler.
    ///
    /// Fails with [`RegistryError::MissingHandler`] for `None` and with
    /// [`RegistryError::CapacityExceeded`] when full.
    pub fn add(&self, handler: impl Into<Option<HandlerRef>>) -> Result<(), RegistryError> {
        let handler = handler.into().ok_or(RegistryError::MissingHandler)?;

        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        if handlers.len() >= self.max {
            return Err(RegistryError::CapacityExceeded { max: self.max });
        }
        let mut next = Vec::with_capacity(handlers.len() + 1);
        next.extend(handlers.iter().cloned());
        next.push(handler);
        *handlers = Arc::from(next);
        Ok(())
    }

    /// Removes a handler by identity.
    ///
    /// Returns `true` if it was registered; removing an unknown handler is a no-op.
    pub fn remove(&self, handler: &HandlerRef) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(pos) = handlers.iter().position(|h| same_handler(h, handler)) else {
            return false;
        };
        let mut next = handlers.to_vec();
        next.remove(pos);
        *handlers = Arc::from(next);
        true
    }

    /// Returns `true` if this exact handler is registered.
    pub fn contains(&self, handler: &HandlerRef) -> bool {
        self.snapshot().iter().any(|h| same_handler(h, handler))
    }

    /// Removes every handler.
    pub fn clear(&self) {
        *self.handlers.write().unwrap_or_else(PoisonError::into_inner) = Arc::from(Vec::new());
    }

    /// Point-in-time view in registration order.
    pub fn snapshot(&self) -> Arc<[HandlerRef]> {
        Arc::clone(&self.handlers.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.max
    }
}

/// Compares data pointers only; vtable pointers of the same type may differ across codegen units.
fn same_handler(a: &HandlerRef, b: &HandlerRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FaultReport, HandlerError, HandlerFn};
    use tokio_util::sync::CancellationToken;

    fn noop(name: &'static str) -> HandlerRef {
        HandlerFn::arc(name, |_r: Arc<FaultReport>, _c: CancellationToken| async {
            Ok::<_, HandlerError>(())
        })
    }

    #[test]
    fn capacity_is_enforced_without_mutation() {
        let reg = HandlerRegistry::new(2);
        reg.add(noop("a")).unwrap();
        reg.add(noop("b")).unwrap();
        let before = reg.snapshot();

        let err = reg.add(noop("c")).unwrap_err();
        assert_eq!(err, RegistryError::CapacityExceeded { max: 2 });
        assert_eq!(reg.len(), 2);
        assert!(Arc::ptr_eq(&before, &reg.snapshot()));
    }

    #[test]
    fn missing_handler_is_rejected() {
        let reg = HandlerRegistry::new(2);
        assert_eq!(reg.add(None::<HandlerRef>), Err(RegistryError::MissingHandler));
        assert!(reg.is_empty());
    }

    #[test]
    fn removal_is_by_identity_and_idempotent() {
        let reg = HandlerRegistry::new(4);
        let a = noop("same");
        let b = noop("same");
        reg.add(a.clone()).unwrap();

        assert!(!reg.remove(&b));
        assert_eq!(reg.len(), 1);
        assert!(reg.contains(&a));

        assert!(reg.remove(&a));
        assert!(!reg.remove(&a));
        assert!(reg.is_empty());

        reg.add(b).unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn removal_frees_a_capacity_slot() {
        let reg = HandlerRegistry::new(3);
        let handlers: Vec<HandlerRef> = (0..3).map(|_| noop("h")).collect();
        for h in &handlers {
            reg.add(h.clone()).unwrap();
        }
        assert_eq!(
            reg.add(noop("extra")),
            Err(RegistryError::CapacityExceeded { max: 3 })
        );

        assert!(reg.remove(&handlers[1]));
        reg.add(noop("extra")).unwrap();
        assert_eq!(reg.len(), reg.capacity());
        assert!(reg.add(noop("again")).is_err());
    }

    #[test]
    fn snapshot_is_stable_under_mutation() {
        let reg = HandlerRegistry::new(4);
        let a = noop("a");
        reg.add(a.clone()).unwrap();
        reg.add(noop("b")).unwrap();

        let snap = reg.snapshot();
        reg.remove(&a);
        reg.clear();

        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].name(), "a");
        assert_eq!(snap[1].name(), "b");
        assert!(reg.is_empty());
    }

    #[test]
    fn concurrent_add_remove() {
        let reg = Arc::new(HandlerRegistry::new(1000));
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let reg = reg.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let h = noop("t");
                        reg.add(h.clone()).unwrap();
                        let _ = reg.snapshot();
                        assert!(reg.remove(&h));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert!(reg.is_empty());
    }
}
