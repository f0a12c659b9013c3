//! In-process cache store backed by a shared hash map.

// std
use std::collections::HashMap;
// crates.io
use serde_json::Value;
use tokio::sync::RwLock;
// self
use crate::{
	_prelude::*,
	cache::{entry::CacheEntry, store::CacheStore},
};

/// Hash-map store with lazy expiry measured on the tokio clock.
///
/// Clones share the same map, so several clients can coordinate through one instance within a
/// process. Expired entries are dropped when they are next touched; there is no sweeper.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}
impl MemoryStore {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of live entries.
	pub async fn len(&self) -> usize {
		let now = Instant::now();

		self.entries.read().await.values().filter(|entry| !entry.is_expired(now)).count()
	}

	/// Whether the store holds no live entries.
	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}

	/// Every live key, sorted.
	pub async fn keys(&self) -> Vec<String> {
		let now = Instant::now();
		let mut keys: Vec<String> = self
			.entries
			.read()
			.await
			.iter()
			.filter(|(_, entry)| !entry.is_expired(now))
			.map(|(key, _)| key.clone())
			.collect();

		keys.sort_unstable();

		keys
	}

	async fn evict_if_expired(&self, key: &str, now: Instant) {
		let mut entries = self.entries.write().await;

		if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
			entries.remove(key);

			tracing::trace!(key, "evicted expired cache entry");
		}
	}
}
#[async_trait::async_trait]
impl CacheStore for MemoryStore {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		let now = Instant::now();
		{
			let entries = self.entries.read().await;

			match entries.get(key) {
				None => return Ok(None),
				Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value().clone())),
				Some(_) => {},
			}
		}

		self.evict_if_expired(key, now).await;

		Ok(None)
	}

	async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<bool> {
		let mut entries = self.entries.write().await;

		if ttl.is_some_and(|ttl| ttl.is_zero()) {
			entries.remove(key);

			return Ok(true);
		}

		entries.insert(key.to_owned(), CacheEntry::new(value, ttl, Instant::now()));

		Ok(true)
	}

	async fn delete(&self, key: &str) -> Result<bool> {
		self.entries.write().await.remove(key);

		Ok(true)
	}

	async fn has(&self, key: &str) -> Result<bool> {
		Ok(self.get(key).await?.is_some())
	}

	async fn clear(&self) -> Result<bool> {
		self.entries.write().await.clear();

		Ok(true)
	}

	async fn delete_prefix(&self, prefix: &str) -> Result<Option<usize>> {
		let mut entries = self.entries.write().await;
		let before = entries.len();

		entries.retain(|key, _| !key.starts_with(prefix));

		Ok(Some(before - entries.len()))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn values_expire_lazily_after_ttl() {
		let store = MemoryStore::new();

		store.set("k", json!("v"), Some(Duration::from_secs(60))).await.expect("set");
		tokio::time::advance(Duration::from_secs(59)).await;

		assert_eq!(store.get("k").await.expect("get"), Some(json!("v")));
		assert!(store.has("k").await.expect("has"));

		tokio::time::advance(Duration::from_secs(1)).await;

		assert_eq!(store.get("k").await.expect("get"), None);
		assert!(!store.has("k").await.expect("has"));
		assert!(store.is_empty().await);
	}

	#[tokio::test]
	async fn zero_ttl_removes_existing_value() {
		let store = MemoryStore::new();

		store.set("k", json!(1), None).await.expect("set");

		assert!(store.set("k", json!(2), Some(Duration::ZERO)).await.expect("set"));
		assert_eq!(store.get("k").await.expect("get"), None);
	}

	#[tokio::test]
	async fn delete_prefix_only_touches_matching_keys() {
		let store = MemoryStore::new();

		store.set("a_one", json!(1), None).await.expect("set");
		store.set("a_two", json!(2), None).await.expect("set");
		store.set("b_one", json!(3), None).await.expect("set");

		assert_eq!(store.delete_prefix("a_").await.expect("delete"), Some(2));
		assert_eq!(store.keys().await, vec!["b_one".to_string()]);
	}

	#[tokio::test]
	async fn clones_share_entries() {
		let store = MemoryStore::new();
		let shared = store.clone();

		store.set("k", json!("v"), None).await.expect("set");

		assert_eq!(shared.get("k").await.expect("get"), Some(json!("v")));
		assert!(shared.clear().await.expect("clear"));
		assert!(store.is_empty().await);
	}
}
