//! Cache manager applying key namespacing and per-purpose TTLs over a shared store.

// std
use std::future::Future;
// crates.io
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	cache::{memory::MemoryStore, store::CacheStore},
	config::CacheConfig,
	metrics::{self, ClientMetrics},
};

/// Single point of access to cached values.
///
/// Every logical key is rewritten as `prefix + key` before it reaches the store, so several
/// managers with distinct prefixes can share one backend. The manager adds no locking of its
/// own: concurrent misses on the same key may both compute, and the last write wins.
#[derive(Clone, Debug)]
pub struct CacheManager {
	store: Arc<dyn CacheStore>,
	config: Arc<CacheConfig>,
	metrics: Arc<ClientMetrics>,
}
impl CacheManager {
	/// Wrap a store with the given namespacing and TTL configuration.
	pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
		Self::with_metrics(store, config, ClientMetrics::new())
	}

	/// Wrap a store, reporting lookups into an existing metrics accumulator.
	pub fn with_metrics(
		store: Arc<dyn CacheStore>,
		config: CacheConfig,
		metrics: Arc<ClientMetrics>,
	) -> Self {
		Self { store, config: Arc::new(config), metrics }
	}

	/// Manager over a fresh private [`MemoryStore`].
	pub fn in_memory(config: CacheConfig) -> Self {
		Self::new(Arc::new(MemoryStore::new()), config)
	}

	/// Active key prefix.
	pub fn prefix(&self) -> &str {
		&self.config.prefix
	}

	/// Namespacing and TTL configuration.
	pub fn config(&self) -> &CacheConfig {
		&self.config
	}

	/// Underlying store, shared with any other manager built over it.
	pub fn store(&self) -> &Arc<dyn CacheStore> {
		&self.store
	}

	/// Metrics accumulator receiving hit/miss observations.
	pub fn metrics(&self) -> Arc<ClientMetrics> {
		self.metrics.clone()
	}

	/// Namespaced form of a logical key.
	pub fn key(&self, key: &str) -> String {
		format!("{}{key}", self.config.prefix)
	}

	/// Configured TTL for a purpose key, falling back to `default`.
	pub fn ttl(&self, key: &str, default: Option<Duration>) -> Option<Duration> {
		self.config.ttl.get(key).or(default)
	}

	/// Return the cached value for `key`, computing and storing it on a miss.
	///
	/// The value is stored with `ttl` when given, otherwise with the TTL configured for `key`,
	/// otherwise without expiry. A failing `compute` propagates its error and caches nothing.
	#[tracing::instrument(skip(self, compute, ttl), fields(prefix = %self.config.prefix))]
	pub async fn get<T, F, Fut>(&self, key: &str, compute: F, ttl: Option<Duration>) -> Result<T>
	where
		T: Serialize + DeserializeOwned,
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		let namespaced = self.key(key);

		if let Some(value) = self.read(&namespaced).await? {
			tracing::debug!("cache hit");

			self.observe_lookup(true);

			return Ok(value);
		}

		tracing::debug!("cache miss; computing value");

		self.observe_lookup(false);

		let value = compute().await?;
		let ttl = ttl.or_else(|| self.config.ttl.get(key));

		self.store.set(&namespaced, serde_json::to_value(&value)?, ttl).await?;

		Ok(value)
	}

	/// Read a value directly, without a compute fallback.
	pub async fn get_value<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		self.read(&self.key(key)).await
	}

	/// Read a value directly, returning `default` when it is absent.
	pub async fn get_value_or<T>(&self, key: &str, default: T) -> Result<T>
	where
		T: DeserializeOwned,
	{
		Ok(self.get_value(key).await?.unwrap_or(default))
	}

	/// Write a value; `None` stores it without expiry.
	pub async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<bool>
	where
		T: Serialize + ?Sized,
	{
		self.store.set(&self.key(key), serde_json::to_value(value)?, ttl).await
	}

	/// Remove a key, returning the store's success flag.
	pub async fn delete(&self, key: &str) -> Result<bool> {
		self.store.delete(&self.key(key)).await
	}

	/// Whether a live value exists for `key`.
	pub async fn has(&self, key: &str) -> Result<bool> {
		self.store.has(&self.key(key)).await
	}

	/// Clear the entire underlying store.
	///
	/// This is not limited to this manager's prefix: co-tenants sharing the store lose their
	/// entries too. Use [`CacheManager::clear_by_prefix`] to stay inside the namespace.
	pub async fn clear(&self) -> Result<bool> {
		tracing::debug!(prefix = %self.config.prefix, "clearing entire cache store");

		self.store.clear().await
	}

	/// Remove every key under `prefix + sub_prefix`; an empty `sub_prefix` clears the namespace.
	///
	/// Returns `false` when the store cannot enumerate its keys.
	pub async fn clear_by_prefix(&self, sub_prefix: &str) -> Result<bool> {
		match self.store.delete_prefix(&self.key(sub_prefix)).await? {
			Some(removed) => {
				tracing::debug!(prefix = %self.config.prefix, sub_prefix, removed, "cleared keys");

				Ok(true)
			},
			None => {
				tracing::debug!(
					prefix = %self.config.prefix,
					"store does not support prefix deletion"
				);

				Ok(false)
			},
		}
	}

	async fn read<T>(&self, namespaced: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		let Some(raw) = self.store.get(namespaced).await? else {
			return Ok(None);
		};

		Ok(decode(namespaced, raw))
	}

	fn observe_lookup(&self, hit: bool) {
		metrics::record_cache_lookup(&self.config.prefix, hit);

		if hit {
			self.metrics.record_cache_hit();
		} else {
			self.metrics.record_cache_miss();
		}
	}
}

fn decode<T>(key: &str, raw: Value) -> Option<T>
where
	T: DeserializeOwned,
{
	if raw.is_null() {
		return None;
	}

	match serde_json::from_value(raw) {
		Ok(value) => Some(value),
		Err(err) => {
			tracing::warn!(key, error = %err, "cached value has an unexpected shape; ignoring it");

			None
		},
	}
}
