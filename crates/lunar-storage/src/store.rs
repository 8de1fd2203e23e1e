//! Expiring Store
//!
//! Fluent wrapper over a backing store with an opt-in expiration
//! envelope and lazy eviction on read.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backing::Backing;
use crate::StorageError;

/// Record envelope persisted for every key
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    value: Value,
    #[serde(rename = "expiresAt", skip_serializing_if = "Option::is_none", default)]
    expires_at: Option<u64>,
}

/// Milliseconds since the Unix epoch
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Key-value store wrapper. The expiration deadline, when configured, is
/// computed once at construction and stamped onto every subsequent write.
#[derive(Debug)]
pub struct Store {
    backing: Backing,
    expires_at: Option<u64>,
}

impl Store {
    /// Wrap an existing backing store
    pub fn new(backing: Backing, expires: Option<Duration>) -> Self {
        let expires_at = expires
            .filter(|d| !d.is_zero())
            .map(|d| now_ms() + d.as_millis() as u64);
        Self { backing, expires_at }
    }

    /// Session-scoped store (in-memory backing)
    pub fn session(expires: Option<Duration>) -> Self {
        Self::new(Backing::session(), expires)
    }

    /// Persistent store (file backing at `path`)
    pub fn local(path: impl Into<PathBuf>, expires: Option<Duration>) -> Self {
        Self::new(Backing::local(path.into()), expires)
    }

    /// The absolute expiration deadline stamped on writes, if any
    pub fn expires_at(&self) -> Option<u64> {
        self.expires_at
    }

    /// Direct access to the backing store
    pub fn backing(&self) -> &Backing {
        &self.backing
    }

    /// Number of raw records, expired or not
    pub fn len(&self) -> usize {
        self.backing.len()
    }

    /// Whether the backing store holds no records
    pub fn is_empty(&self) -> bool {
        self.backing.is_empty()
    }

    /// Wrap `value` in the record envelope and write it under `key`
    pub fn set<V: Serialize>(&mut self, key: &str, value: V) -> Result<&mut Self, StorageError> {
        let record = Record {
            value: serde_json::to_value(value)?,
            expires_at: self.expires_at,
        };
        let raw = serde_json::to_string(&record)?;
        self.backing.set_item(key, &raw);
        Ok(self)
    }

    /// Read one key. Absent, expired and unreadable records all resolve
    /// to `None`; an expired record is removed by the read that saw it.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, now_ms())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: u64) -> Option<Value> {
        let raw = self.backing.get_item(key)?.to_string();
        match serde_json::from_str::<Record>(&raw) {
            Ok(record) => {
                if let Some(expires_at) = record.expires_at {
                    if now >= expires_at {
                        self.backing.remove_item(key);
                        return None;
                    }
                }
                Some(record.value)
            }
            Err(e) => {
                tracing::warn!("discarding unreadable record for {:?}: {}", key, e);
                None
            }
        }
    }

    /// Read several keys independently. Expiration and eviction apply per
    /// key exactly as in [`get`](Self::get); an unreadable record is
    /// logged and skipped, never aborting the batch. Returns `None` when
    /// zero requested keys resolve.
    pub fn get_many(&mut self, keys: &[&str]) -> Option<BTreeMap<String, Value>> {
        self.get_many_at(keys, now_ms())
    }

    pub(crate) fn get_many_at(&mut self, keys: &[&str], now: u64) -> Option<BTreeMap<String, Value>> {
        let mut found = BTreeMap::new();
        for &key in keys {
            if let Some(value) = self.get_at(key, now) {
                found.insert(key.to_string(), value);
            }
        }
        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }

    /// `set` every entry of a mapping, in arbitrary order
    pub fn import<I, K, V>(&mut self, entries: I) -> Result<&mut Self, StorageError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        for (key, value) in entries {
            self.set(key.as_ref(), value)?;
        }
        Ok(self)
    }

    /// Delete one key; missing keys are a no-op
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.backing.remove_item(key);
        self
    }

    /// Delete several keys; missing keys are no-ops
    pub fn remove_many(&mut self, keys: &[&str]) -> &mut Self {
        for &key in keys {
            self.backing.remove_item(key);
        }
        self
    }

    /// Wipe every record in the backing store
    pub fn clear(&mut self) -> &mut Self {
        self.backing.clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_round_trip() {
        let mut store = Store::session(None);
        store.set("key", "value").unwrap();

        assert_eq!(store.get("key"), Some(json!("value")));
    }

    #[test]
    fn test_structured_value_round_trip() {
        let mut store = Store::session(None);
        let settings = json!({
            "renew": false,
            "persist": true,
            "auth": { "method": "facebook" }
        });
        store.set("settings", &settings).unwrap();

        assert_eq!(store.get("settings"), Some(settings));
    }

    #[test]
    fn test_get_absent_key() {
        let mut store = Store::session(None);
        assert_eq!(store.get("never"), None);
    }

    #[test]
    fn test_no_expiry_when_unconfigured() {
        let mut store = Store::session(None);
        store.set("key", 1).unwrap();

        // even far in the future the record survives
        assert_eq!(store.get_at("key", u64::MAX), Some(json!(1)));
    }

    #[test]
    fn test_expiry_is_fixed_at_construction() {
        let mut store = Store::session(Some(Duration::from_millis(500)));
        let deadline = store.expires_at().expect("deadline configured");

        store.set("a", 1).unwrap();
        store.set("b", 2).unwrap();

        // both records carry the same deadline
        for key in ["a", "b"] {
            let raw = store.backing().get_item(key).unwrap();
            let record: serde_json::Value = serde_json::from_str(raw).unwrap();
            assert_eq!(record["expiresAt"], json!(deadline));
        }
    }

    #[test]
    fn test_expired_record_is_removed_on_read() {
        let mut store = Store::session(Some(Duration::from_millis(500)));
        let deadline = store.expires_at().unwrap();
        store.set("key", "value").unwrap();

        // just before the deadline the value is alive
        assert_eq!(store.get_at("key", deadline - 1), Some(json!("value")));

        // at the deadline it reads as absent and the raw record is gone
        assert_eq!(store.get_at("key", deadline), None);
        assert_eq!(store.backing().get_item("key"), None);
    }

    #[test]
    fn test_batch_read_applies_expiration() {
        let mut store = Store::session(Some(Duration::from_millis(500)));
        let deadline = store.expires_at().unwrap();
        store.import([("a", 1), ("b", 2)]).unwrap();

        let alive = store.get_many_at(&["a", "b"], deadline - 1).unwrap();
        assert_eq!(alive.len(), 2);

        assert_eq!(store.get_many_at(&["a", "b"], deadline), None);
        assert_eq!(store.backing().get_item("a"), None);
        assert_eq!(store.backing().get_item("b"), None);
    }

    #[test]
    fn test_unreadable_record_does_not_abort_batch() {
        let mut store = Store::session(None);
        store.set("good", 1).unwrap();
        store.backing.set_item("bad", "{ not json");

        let found = store.get_many(&["bad", "good"]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found["good"], json!(1));
    }

    #[test]
    fn test_get_many_none_when_nothing_resolves() {
        let mut store = Store::session(None);
        assert_eq!(store.get_many(&["x", "y"]), None);
    }

    #[test]
    fn test_get_many_partial() {
        let mut store = Store::session(None);
        store.set("a", 1).unwrap();

        let found = store.get_many(&["a", "z"]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found["a"], json!(1));
    }
}
