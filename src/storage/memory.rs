//! In-memory storage backend for testing.

use crate::error::Result;
use crate::storage::traits::KeyValueStore;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-memory storage backend for testing and embedding.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create a new in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key() {
        let store = MemoryBackend::new();
        assert!(store.get("nothing").unwrap().is_none());
    }

    #[test]
    fn set_and_get() {
        let store = MemoryBackend::new();
        store.set("record", b"hello").unwrap();
        assert_eq!(store.get("record").unwrap().unwrap(), b"hello");
    }

    #[test]
    fn set_replaces_value() {
        let store = MemoryBackend::new();
        store.set("record", b"first").unwrap();
        store.set("record", b"second").unwrap();
        assert_eq!(store.get("record").unwrap().unwrap(), b"second");
    }

    #[test]
    fn concurrent_read_write() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryBackend::new());
        store.set("shared", b"0").unwrap();

        let mut handles = vec![];

        for _ in 0..5 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    assert!(store_clone.get("shared").unwrap().is_some());
                }
            }));
        }

        for i in 0..5 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for j in 0..20 {
                    store_clone
                        .set(&format!("key-{i}-{j}"), b"v")
                        .unwrap();
                }
            }));
        }

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(store.get("key-4-19").unwrap().unwrap(), b"v");
    }
}
