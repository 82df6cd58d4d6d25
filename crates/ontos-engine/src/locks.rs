//! Per-identity mutex registry
//!
//! Create-or-get operations hold the mutex of the identity they may create,
//! so two callers racing on the same new IRI in the same scope serialize
//! instead of both observing "not present". An entry lives only while some
//! caller holds or waits on it; the last guard to drop evicts it.

use dashmap::DashMap;
use ontos_model::ElementId;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct IdentityLocks {
    inner: DashMap<ElementId, Arc<Mutex<()>>>,
}

impl IdentityLocks {
    /// Block until the identity's mutex is held
    pub(crate) fn lock(&self, id: &ElementId) -> IdentityGuard<'_> {
        let handle = self.handle(id);
        let guard = Mutex::lock_arc(&handle);
        IdentityGuard {
            locks: self,
            id: id.clone(),
            guard: Some(guard),
        }
    }

    fn handle(&self, id: &ElementId) -> Arc<Mutex<()>> {
        Arc::clone(self.inner.entry(id.clone()).or_default().value())
    }

    /// Identities currently held or waited on
    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Held identity mutex; releasing the last one removes the registry entry
pub(crate) struct IdentityGuard<'a> {
    locks: &'a IdentityLocks,
    id: ElementId,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl Drop for IdentityGuard<'_> {
    fn drop(&mut self) {
        // Release first so the registry holds the only remaining reference.
        self.guard.take();
        self.locks
            .inner
            .remove_if(&self.id, |_, handle| Arc::strong_count(handle) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn same_identity_shares_a_mutex() {
        let locks = IdentityLocks::default();
        let a = locks.handle(&ElementId::raw("x"));
        let b = locks.handle(&ElementId::raw("x"));
        let c = locks.handle(&ElementId::raw("y"));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));

        let _guard = a.lock();
        assert!(b.try_lock().is_none());
        assert!(c.try_lock().is_some());
    }

    #[test]
    fn released_identities_are_evicted() {
        let locks = IdentityLocks::default();
        for name in ["a", "b", "c"] {
            let _guard = locks.lock(&ElementId::raw(name));
            assert_eq!(locks.len(), 1);
        }
        assert_eq!(locks.len(), 0);
    }

    #[test]
    fn entry_survives_while_another_caller_waits() {
        let locks = IdentityLocks::default();
        let id = ElementId::raw("x");
        let waiting = locks.handle(&id);
        drop(locks.lock(&id));
        assert_eq!(locks.len(), 1);
        drop(waiting);
        drop(locks.lock(&id));
        assert_eq!(locks.len(), 0);
    }

    #[test]
    fn lock_serializes_callers() {
        let locks = Arc::new(IdentityLocks::default());
        let inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let _guard = locks.lock(&ElementId::raw("x"));
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        std::thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(locks.len(), 0);
    }
}
