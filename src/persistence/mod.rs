//! Key-value stores for scores and settings
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `FileStore`: one JSON object file on disk (native)
//! - `LocalStorage`: browser LocalStorage (wasm32)
//!
//! Callers treat every error as non-fatal; the session logs and moves on.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;

/// String key-value store consumed by high scores and settings
pub trait ScoreStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object file holding every key (native builds)
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_all(&self) -> anyhow::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&json).with_context(|| format!("parsing {}", self.path.display()))
    }
}

impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        // A corrupt file is replaced rather than blocking every later write
        let mut entries = self.read_all().unwrap_or_else(|err| {
            log::warn!("Discarding unreadable store: {err:#}");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> anyhow::Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .context("LocalStorage unavailable")
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|err| anyhow::anyhow!("LocalStorage read failed: {err:?}"))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| anyhow::anyhow!("LocalStorage write failed (quota?): {err:?}"))
    }
}

/// Store whose every call fails; stands in for blocked storage in tests
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenStore;

#[cfg(test)]
impl ScoreStore for BrokenStore {
    fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("storage disabled")
    }

    fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("quota exceeded")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bitwave-arcade-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("snake-high-score").unwrap(), None);
        store.set("snake-high-score", "120").unwrap();
        assert_eq!(store.get("snake-high-score").unwrap().as_deref(), Some("120"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_recovers_from_corruption() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();

        let mut store = FileStore::new(&path);
        assert!(store.get("a").is_err());
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_broken_store_errors() {
        let mut store = BrokenStore;
        assert!(store.get("x").is_err());
        assert!(store.set("x", "1").is_err());
    }
}
