//! Cache store capability consumed by the cache manager.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Generic key/value store with optional per-entry expiry.
///
/// Implementations decide how expiry is enforced; an entry whose TTL has elapsed must read as
/// absent. Keys arrive fully namespaced, the store never sees logical keys.
#[async_trait::async_trait]
pub trait CacheStore: std::fmt::Debug + Send + Sync {
	/// Read a value; `Ok(None)` when the key is missing or expired.
	async fn get(&self, key: &str) -> Result<Option<Value>>;

	/// Write a value; `None` keeps it until deleted.
	///
	/// A zero TTL removes the key, as the value would already be expired.
	async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<bool>;

	/// Remove a key, reporting whether the store accepted the removal.
	async fn delete(&self, key: &str) -> Result<bool>;

	/// Whether a live (unexpired) entry exists for the key.
	async fn has(&self, key: &str) -> Result<bool>;

	/// Drop every entry in the store, including entries written by other tenants.
	async fn clear(&self) -> Result<bool>;

	/// Remove every key starting with `prefix`.
	///
	/// Returns the number of removed keys, or `None` when the store cannot enumerate keys.
	async fn delete_prefix(&self, prefix: &str) -> Result<Option<usize>> {
		let _ = prefix;

		Ok(None)
	}
}
