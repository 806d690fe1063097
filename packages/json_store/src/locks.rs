//! Per-collection mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maps each collection name to the one lock its mutations serialize on.
///
/// The registry belongs to a single store, so two stores over different roots never contend.
/// The outer map lock is held only for the lookup-or-insert; it is never held across I/O.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for `collection`, creating it on first use.
    ///
    /// This is the only way collection locks are created, so every caller asking for the same
    /// name gets the same instance.
    pub fn get_or_create(&self, collection: &str) -> Arc<Mutex<()>> {
        // The map holds no invariants a panicking holder could break.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            locks
                .entry(collection.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locks `lock`, ignoring poisoning: the guarded value is `()`.
pub(crate) fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_yields_same_lock() {
        let registry = LockRegistry::new();
        let a = registry.get_or_create("users");
        let b = registry.get_or_create("users");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn different_names_yield_different_locks() {
        let registry = LockRegistry::new();
        let users = registry.get_or_create("users");
        let orders = registry.get_or_create("orders");
        assert!(!Arc::ptr_eq(&users, &orders));

        // Holding one collection's lock leaves the other free.
        let _guard = acquire(&users);
        assert!(orders.try_lock().is_ok());
        assert!(users.try_lock().is_err());
    }

    #[test]
    fn concurrent_lookups_agree_on_one_instance() {
        let registry = LockRegistry::new();
        let locks: Vec<Arc<Mutex<()>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.get_or_create("users")))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(registry.len(), 1);
        for lock in &locks[1..] {
            assert!(Arc::ptr_eq(&locks[0], lock));
        }
    }

    #[test]
    fn registries_are_independent() {
        let first = LockRegistry::new();
        let second = LockRegistry::new();
        assert!(!Arc::ptr_eq(
            &first.get_or_create("users"),
            &second.get_or_create("users")
        ));
        assert!(LockRegistry::new().is_empty());
    }

    #[test]
    fn poisoned_lock_is_still_usable() {
        let registry = LockRegistry::new();
        let lock = registry.get_or_create("users");
        let poisoner = Arc::clone(&lock);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the collection lock");
        })
        .join();

        assert!(lock.is_poisoned());
        let _guard = acquire(&lock);
    }
}
