//! Server metadata, memoized in the cache.

// self
use crate::{
	_prelude::*,
	cache::manager::CacheManager,
	config::{DEFAULT_SERVER_INFO_TTL, SERVER_INFO_KEY},
	http::{executor::QueryExecutor, request::Query},
	representation::ServerInfo,
};

/// `/admin/serverinfo` endpoint.
///
/// The document is cached under the `server_info` key, the same name as its TTL purpose. Stores
/// populated by clients that cache it as `serverinfo` are therefore not shared with this one.
#[derive(Clone, Debug)]
pub struct ServerInfoResource {
	queries: QueryExecutor,
	cache: CacheManager,
}
impl ServerInfoResource {
	/// Resource over a query executor and the cache holding the memoized document.
	pub fn new(queries: QueryExecutor, cache: CacheManager) -> Self {
		Self { queries, cache }
	}

	/// Fetch the server info document, served from the cache while fresh.
	pub async fn get(&self) -> Result<ServerInfo> {
		let ttl = self.cache.ttl(SERVER_INFO_KEY, Some(DEFAULT_SERVER_INFO_TTL));

		self.cache
			.get(
				SERVER_INFO_KEY,
				|| async { self.queries.execute_query(&Query::new("/admin/serverinfo")).await },
				ttl,
			)
			.await
	}

	/// Drop the memoized document.
	pub async fn clear_cache(&self) -> Result<bool> {
		self.cache.delete(SERVER_INFO_KEY).await
	}
}
