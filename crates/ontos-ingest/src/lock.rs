//! Process-wide named mutexes
//!
//! Start-up ingestion holds the configured import lock so concurrent
//! loaders in one process import the configured documents once, in order.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;

static GLOBAL: Lazy<NamedLocks> = Lazy::new(NamedLocks::new);

/// Registry of mutexes addressed by name
#[derive(Debug, Default)]
pub struct NamedLocks {
    inner: DashMap<String, Arc<Mutex<()>>>,
}

impl NamedLocks {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by the whole process
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Shared mutex for a name
    #[must_use]
    pub fn handle(&self, name: &str) -> Arc<Mutex<()>> {
        if let Some(existing) = self.inner.get(name) {
            return Arc::clone(existing.value());
        }
        Arc::clone(self.inner.entry(name.to_string()).or_default().value())
    }

    /// Run `f` while holding the named mutex
    pub fn with_lock<T>(&self, name: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.handle(name);
        let _guard = lock.lock();
        tracing::trace!(lock = name, "named lock held");
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn same_name_shares_a_mutex() {
        let locks = NamedLocks::new();
        let a = locks.handle("import");
        let b = locks.handle("import");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &locks.handle("other")));
    }

    #[test]
    fn with_lock_serializes_callers() {
        let locks = Arc::new(NamedLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                std::thread::spawn(move || {
                    locks.with_lock("import", || {
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        std::thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn global_registry_is_shared() {
        assert!(Arc::ptr_eq(
            &NamedLocks::global().handle("lock-test"),
            &NamedLocks::global().handle("lock-test")
        ));
    }
}
