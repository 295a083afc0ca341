//! Lookup-with-cache capability for externally computed values.
//!
//! Entries are keyed by the full parameter tuple of the call they memoize and
//! are never invalidated automatically.

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::CoreResult;

/// Cache key built from a namespace and an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: String,
    parts: Vec<String>,
}

impl CacheKey {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: impl fmt::Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Canonical string form, `namespace|part|part...`.
    pub fn canonical(&self) -> String {
        std::iter::once(self.namespace.as_str())
            .chain(self.parts.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// SHA-256 of the canonical form, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Storage consulted before falling back to direct computation.
pub trait LookupCache<V>: Send + Sync {
    /// Stored value for `key`, if any.
    fn lookup(&self, key: &CacheKey) -> Option<V>;

    /// Store `value` under `key`, replacing any previous entry.
    fn store(&self, key: &CacheKey, value: &V) -> CoreResult<()>;
}

/// A cache that never hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl<V> LookupCache<V> for NoCache {
    fn lookup(&self, _key: &CacheKey) -> Option<V> {
        None
    }

    fn store(&self, _key: &CacheKey, _value: &V) -> CoreResult<()> {
        Ok(())
    }
}
