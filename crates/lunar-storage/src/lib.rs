//! lunar-storage
//!
//! Fluent key-value store with opt-in time-based expiration.
//!
//! Values are wrapped in a `{ value, expiresAt? }` envelope, serialized
//! as JSON into a session-scoped or persistent backing store. Expiration
//! is lazy: an expired record is removed by the read that observes it.
//!
//! ```
//! use lunar_storage::Store;
//!
//! let mut store = Store::session(None);
//! store.set("id", 42).unwrap();
//! assert_eq!(store.get("id"), Some(serde_json::json!(42)));
//! store.remove("id");
//! assert_eq!(store.get("id"), None);
//! ```

pub mod backing;
pub mod store;

pub use backing::Backing;
pub use store::Store;

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The caller's value could not be serialized for storage
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}
