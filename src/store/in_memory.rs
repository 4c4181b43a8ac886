//! InMemoryStore — process-memory record store with no persistence.

use std::sync::{Arc, RwLock};

use super::{RecordStore, StoreError};

/// Record store that keeps the working set only in process memory.
///
/// Nothing survives the process; this is the explicit "no persistence"
/// backend, not a cache. Clone-friendly via Arc — clones share storage.
#[derive(Clone)]
pub struct InMemoryStore<R> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryStore<R> {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<R: Clone + Send + Sync> RecordStore<R> for InMemoryStore<R> {
    fn load_all(&self) -> Result<Vec<R>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Lock("lock poisoned".into()))?;
        Ok(records.clone())
    }

    fn save_all(&self, records: &[R]) -> Result<(), StoreError> {
        let mut stored = self
            .records
            .write()
            .map_err(|_| StoreError::Lock("lock poisoned".into()))?;
        *stored = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store: InMemoryStore<String> = InMemoryStore::new();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let store = InMemoryStore::new();
        store.save_all(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(store.load_all().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn save_overwrites_in_full() {
        let store = InMemoryStore::new();
        store.save_all(&["a".to_string()]).unwrap();
        store.save_all(&["b".to_string()]).unwrap();
        assert_eq!(store.load_all().unwrap(), vec!["b"]);
    }

    #[test]
    fn clone_shares_storage() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        store.save_all(&["a".to_string()]).unwrap();
        assert_eq!(clone.load_all().unwrap(), vec!["a"]);
    }
}
