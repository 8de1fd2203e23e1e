//! Backing Stores
//!
//! Session-scoped (in-memory) and persistent (file-backed) string
//! key-value stores behind the fluent wrapper.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// String key-value backing store
#[derive(Debug, Default)]
pub struct Backing {
    data: HashMap<String, String>,
    persistent: bool,
    path: Option<PathBuf>,
}

impl Backing {
    /// In-memory store, discarded on drop (session-scoped)
    pub fn session() -> Self {
        Self {
            data: HashMap::new(),
            persistent: false,
            path: None,
        }
    }

    /// File-backed store. Loads the map from `path` when it exists and
    /// writes the whole map back after every mutation.
    pub fn local(path: PathBuf) -> Self {
        let mut backing = Self {
            data: HashMap::new(),
            persistent: true,
            path: Some(path.clone()),
        };

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<HashMap<String, String>>(&contents) {
                    Ok(data) => backing.data = data,
                    Err(e) => tracing::warn!("ignoring unreadable store file {}: {}", path.display(), e),
                },
                Err(e) => tracing::warn!("failed to read store file {}: {}", path.display(), e),
            }
        }

        backing
    }

    /// Get raw value
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }

    /// Set raw value
    pub fn set_item(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
        self.persist();
    }

    /// Remove key; absent keys are a no-op
    pub fn remove_item(&mut self, key: &str) {
        self.data.remove(key);
        self.persist();
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.data.clear();
        self.persist();
    }

    /// Key at index (arbitrary but stable-between-mutations order)
    pub fn key(&self, index: usize) -> Option<&str> {
        self.data.keys().nth(index).map(|s| s.as_str())
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write the map to disk if persistent. I/O failures are logged.
    fn persist(&self) {
        if !self.persistent {
            return;
        }
        let Some(path) = &self.path else { return };
        match serde_json::to_string(&self.data) {
            Ok(contents) => {
                if let Err(e) = fs::write(path, contents) {
                    tracing::warn!("failed to persist store to {}: {}", path.display(), e);
                }
            }
            Err(e) => tracing::warn!("failed to serialize store map: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lunar-backing-{}-{}.json", std::process::id(), name))
    }

    #[test]
    fn test_session_set_get_remove() {
        let mut backing = Backing::session();

        backing.set_item("key", "value");
        assert_eq!(backing.get_item("key"), Some("value"));

        backing.remove_item("key");
        assert_eq!(backing.get_item("key"), None);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut backing = Backing::session();
        backing.remove_item("never-set");
        assert!(backing.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut backing = Backing::session();
        backing.set_item("a", "1");
        backing.set_item("b", "2");
        assert_eq!(backing.len(), 2);

        backing.clear();
        assert!(backing.is_empty());
    }

    #[test]
    fn test_local_round_trip_via_disk() {
        let path = temp_path("round-trip");
        let _ = fs::remove_file(&path);

        {
            let mut backing = Backing::local(path.clone());
            backing.set_item("id", "42");
        }

        let reloaded = Backing::local(path.clone());
        assert_eq!(reloaded.get_item("id"), Some("42"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_local_ignores_corrupt_file() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json at all").unwrap();

        let backing = Backing::local(path.clone());
        assert!(backing.is_empty());

        let _ = fs::remove_file(&path);
    }
}
