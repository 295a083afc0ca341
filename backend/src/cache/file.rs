use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{CacheKey, LookupCache};
use crate::error::{CoreError, CoreResult};

/// On-disk cache: one JSON document per key, named by the key fingerprint.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (and create if needed) a cache directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> CoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            CoreError::Cache(format!(
                "Failed to create cache directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `key`.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.fingerprint()))
    }
}

impl<V: Serialize + DeserializeOwned> LookupCache<V> for FileCache {
    fn lookup(&self, key: &CacheKey) -> Option<V> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cache load failed for {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => {
                debug!("Cache hit for {}", key);
                Some(value)
            }
            Err(e) => {
                warn!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    fn store(&self, key: &CacheKey, value: &V) -> CoreResult<()> {
        let path = self.entry_path(key);
        let json = serde_json::to_string(value)
            .map_err(|e| CoreError::Cache(format!("Failed to encode {}: {}", key, e)))?;
        fs::write(&path, json).map_err(|e| {
            CoreError::Cache(format!("Failed to write {}: {}", path.display(), e))
        })?;
        debug!("Cached {} at {}", key, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested")).unwrap();
        let key = CacheKey::new("lon").with_part("mars").with_part("2024-01-01");

        assert!(LookupCache::<Vec<f64>>::lookup(&cache, &key).is_none());
        cache.store(&key, &vec![12.5, 13.0]).unwrap();
        assert!(cache.entry_path(&key).exists());

        let reopened = FileCache::new(cache.dir()).unwrap();
        let value: Option<Vec<f64>> = reopened.lookup(&key);
        assert_eq!(value, Some(vec![12.5, 13.0]));
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        let key = CacheKey::new("broken");
        fs::write(cache.entry_path(&key), "{not json").unwrap();

        let value: Option<Vec<f64>> = cache.lookup(&key);
        assert!(value.is_none());
    }
}
