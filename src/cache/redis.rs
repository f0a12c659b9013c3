//! Redis-backed cache store for sharing state across processes.

// std
use std::fmt::{Debug, Formatter, Result as FmtResult};
// crates.io
use redis::{AsyncCommands, aio::MultiplexedConnection};
use serde_json::Value;
use tokio::sync::OnceCell;
// self
use crate::{_prelude::*, cache::store::CacheStore};

/// Store keeping JSON-encoded values in Redis.
///
/// Expiry is delegated to Redis (`PX`), so every process pointed at the same database observes
/// the same token and metadata state. One multiplexed connection is opened lazily and shared by
/// every clone.
#[derive(Clone)]
pub struct RedisStore {
	client: redis::Client,
	connection: Arc<OnceCell<MultiplexedConnection>>,
}
impl RedisStore {
	/// Wrap an existing Redis client.
	pub fn new(client: redis::Client) -> Self {
		Self { client, connection: Arc::new(OnceCell::new()) }
	}

	/// Connect using a `redis://` URL.
	pub fn open(url: &str) -> Result<Self> {
		Ok(Self::new(redis::Client::open(url)?))
	}

	async fn connection(&self) -> Result<MultiplexedConnection> {
		let connection = self
			.connection
			.get_or_try_init(|| self.client.get_multiplexed_async_connection())
			.await?;

		Ok(connection.clone())
	}
}
impl Debug for RedisStore {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.debug_struct("RedisStore")
			.field("client", &self.client)
			.field("connected", &self.connection.initialized())
			.finish()
	}
}
#[async_trait::async_trait]
impl CacheStore for RedisStore {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		let mut conn = self.connection().await?;
		let raw: Option<String> = conn.get(key).await?;

		match raw {
			Some(json) => Ok(Some(serde_json::from_str(&json)?)),
			None => Ok(None),
		}
	}

	async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<bool> {
		let mut conn = self.connection().await?;

		match ttl {
			Some(ttl) if ttl.is_zero() => {
				conn.del::<_, ()>(key).await?;
			},
			Some(ttl) => {
				let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

				conn.pset_ex::<_, _, ()>(key, serde_json::to_string(&value)?, millis).await?;
			},
			None => {
				conn.set::<_, _, ()>(key, serde_json::to_string(&value)?).await?;
			},
		}

		Ok(true)
	}

	async fn delete(&self, key: &str) -> Result<bool> {
		let mut conn = self.connection().await?;

		conn.del::<_, ()>(key).await?;

		Ok(true)
	}

	async fn has(&self, key: &str) -> Result<bool> {
		let mut conn = self.connection().await?;

		Ok(conn.exists(key).await?)
	}

	async fn clear(&self) -> Result<bool> {
		let mut conn = self.connection().await?;

		redis::cmd("FLUSHDB").query_async::<()>(&mut conn).await?;

		Ok(true)
	}

	async fn delete_prefix(&self, prefix: &str) -> Result<Option<usize>> {
		let mut conn = self.connection().await?;
		let pattern = format!("{}*", escape_glob(prefix));
		let mut cursor = 0_u64;
		let mut removed = 0;

		loop {
			let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
				.arg(cursor)
				.arg("MATCH")
				.arg(&pattern)
				.arg("COUNT")
				.arg(100)
				.query_async(&mut conn)
				.await?;

			if !keys.is_empty() {
				let deleted: usize = conn.del(&keys).await?;

				removed += deleted;
			}
			if next == 0 {
				break;
			}

			cursor = next;
		}

		tracing::debug!(prefix, removed, "deleted redis keys by prefix");

		Ok(Some(removed))
	}
}

fn escape_glob(raw: &str) -> String {
	let mut escaped = String::with_capacity(raw.len());

	for c in raw.chars() {
		if matches!(c, '*' | '?' | '[' | ']' | '\\') {
			escaped.push('\\');
		}

		escaped.push(c);
	}

	escaped
}
