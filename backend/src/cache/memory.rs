use parking_lot::RwLock;
use std::collections::HashMap;

use super::{CacheKey, LookupCache};
use crate::error::CoreResult;

/// In-process cache, shared across threads behind a read-write lock.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> LookupCache<V> for MemoryCache<V> {
    fn lookup(&self, key: &CacheKey) -> Option<V> {
        self.entries.read().get(&key.canonical()).cloned()
    }

    fn store(&self, key: &CacheKey, value: &V) -> CoreResult<()> {
        self.entries.write().insert(key.canonical(), value.clone());
        Ok(())
    }
}
