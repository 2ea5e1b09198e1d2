//! In-memory counter store for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use portico_core::BoxFuture;
use portico_limiter::{CounterStore, StoreError};

/// An in-memory [`CounterStore`] with failure injection.
///
/// Entries never expire; the TTL passed to `put` is recorded so tests can
/// assert on it. Flip [`fail_gets`](Self::fail_gets) or
/// [`fail_puts`](Self::fail_puts) to simulate a degraded backend.
#[derive(Default)]
pub struct MemoryCounterStore {
    entries: Mutex<HashMap<String, (String, u64)>>,
    fail_gets: AtomicBool,
    fail_puts: AtomicBool,
}

impl MemoryCounterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get` fail.
    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `put` fail.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Returns the stored value for `key`, if any.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("store lock")
            .get(key)
            .map(|(value, _)| value.clone())
    }

    /// Returns the TTL recorded by the last `put` for `key`, if any.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<u64> {
        self.entries
            .lock()
            .expect("store lock")
            .get(key)
            .map(|(_, ttl)| *ttl)
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("store lock").len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CounterStore for MemoryCounterStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            if self.fail_gets.load(Ordering::SeqCst) {
                return Err(StoreError::new("injected get failure"));
            }
            Ok(self
                .entries
                .lock()
                .expect("store lock")
                .get(&key)
                .map(|(value, _)| value.clone()))
        })
    }

    fn put(
        &self,
        key: &str,
        value: String,
        ttl_seconds: u64,
    ) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            if self.fail_puts.load(Ordering::SeqCst) {
                return Err(StoreError::new("injected put failure"));
            }
            self.entries
                .lock()
                .expect("store lock")
                .insert(key, (value, ttl_seconds));
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.entries.lock().expect("store lock").remove(&key);
            Ok(())
        })
    }
}
