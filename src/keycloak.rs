//! Top-level admin client façade.

// std
use std::fmt::{Debug, Formatter, Result as FmtResult};
// crates.io
use tokio::sync::RwLock;
// self
use crate::{
	_prelude::*,
	cache::{manager::CacheManager, memory::MemoryStore, store::CacheStore},
	config::{
		CacheConfig, ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
		DEFAULT_VERSION_TTL, VERSION_KEY,
	},
	http::{
		client::Client,
		executor::{CommandExecutor, QueryExecutor},
		transport::{ReqwestTransport, Transport},
	},
	metrics::ClientMetrics,
	resource::{
		attack_detection::AttackDetection, clients::Clients, groups::Groups,
		organizations::Organizations, realms::Realms, roles::Roles, server_info::ServerInfoResource,
		users::Users,
	},
};

/// Builder for [`Keycloak`].
pub struct KeycloakBuilder {
	base_url: String,
	username: String,
	password: String,
	cache: CacheConfig,
	connect_timeout: Duration,
	request_timeout: Duration,
	store: Option<Arc<dyn CacheStore>>,
	transport: Option<Arc<dyn Transport>>,
}
impl KeycloakBuilder {
	/// Start from the server base URL and administrator credentials.
	pub fn new(
		base_url: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			base_url: base_url.into(),
			username: username.into(),
			password: password.into(),
			cache: CacheConfig::default(),
			connect_timeout: DEFAULT_CONNECT_TIMEOUT,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			store: None,
			transport: None,
		}
	}

	/// Start from a loaded configuration.
	pub fn from_config(config: ClientConfig) -> Self {
		Self {
			base_url: config.base_url.into(),
			username: config.username,
			password: config.password,
			cache: config.cache,
			connect_timeout: config.connect_timeout,
			request_timeout: config.request_timeout,
			store: None,
			transport: None,
		}
	}

	/// Namespace prepended to every cache key.
	pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
		self.cache.prefix = prefix.into();

		self
	}

	/// Override the TTL for one purpose key.
	pub fn ttl(mut self, key: impl Into<String>, ttl: Duration) -> Self {
		self.cache.ttl.insert(key, ttl);

		self
	}

	/// Replace the whole cache configuration.
	pub fn cache_config(mut self, cache: CacheConfig) -> Self {
		self.cache = cache;

		self
	}

	/// Share a cache store, e.g. with other clients or processes.
	pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
		self.store = Some(store);

		self
	}

	/// Use a custom transport instead of the bundled reqwest one.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);

		self
	}

	/// Connect timeout of the bundled transport.
	pub fn connect_timeout(mut self, timeout: Duration) -> Self {
		self.connect_timeout = timeout;

		self
	}

	/// Request timeout of the bundled transport.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Validate the configuration and assemble the client.
	pub fn build(self) -> Result<Keycloak> {
		let mut config = ClientConfig::new(&self.base_url, self.username, self.password)?;

		config.cache = self.cache;
		config.connect_timeout = self.connect_timeout;
		config.request_timeout = self.request_timeout;
		config.validate()?;

		let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
		let transport = match self.transport {
			Some(transport) => transport,
			None => Arc::new(ReqwestTransport::new(config.connect_timeout, config.request_timeout)?),
		};
		let cache = CacheManager::new(store, config.cache.clone());

		tracing::debug!(
			base_url = config.base_url.as_str(),
			prefix = cache.prefix(),
			"keycloak client configured"
		);

		Ok(Keycloak::from_client(Client::new(config.credentials(), transport, cache)))
	}
}
impl Debug for KeycloakBuilder {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.debug_struct("KeycloakBuilder")
			.field("base_url", &self.base_url)
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.field("cache", &self.cache)
			.field("connect_timeout", &self.connect_timeout)
			.field("request_timeout", &self.request_timeout)
			.field("store", &self.store)
			.field("transport", &self.transport)
			.finish()
	}
}

/// Admin client for a Keycloak server.
///
/// Cloning is cheap; clones share the cache, the transport, and the memoized version.
#[derive(Clone, Debug)]
pub struct Keycloak {
	client: Client,
	queries: QueryExecutor,
	commands: CommandExecutor,
	version: Arc<RwLock<Option<String>>>,
}
impl Keycloak {
	/// Builder with default cache and transport settings.
	pub fn builder(
		base_url: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> KeycloakBuilder {
		KeycloakBuilder::new(base_url, username, password)
	}

	/// Client from a loaded configuration, using the in-memory store and reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		KeycloakBuilder::from_config(config).build()
	}

	/// Wrap an already assembled HTTP client.
	pub fn from_client(client: Client) -> Self {
		Self {
			queries: QueryExecutor::new(client.clone()),
			commands: CommandExecutor::new(client.clone()),
			client,
			version: Arc::new(RwLock::new(None)),
		}
	}

	/// Server version, memoized in memory and in the cache under `version`.
	pub async fn version(&self) -> Result<String> {
		if let Some(version) = self.version.read().await.clone() {
			return Ok(version);
		}

		let server_info = self.server_info();
		let ttl = self.cache().ttl(VERSION_KEY, Some(DEFAULT_VERSION_TTL));
		let version: String = self
			.cache()
			.get(
				VERSION_KEY,
				|| async move {
					let info = server_info.get().await?;

					Ok(info.version()?.to_owned())
				},
				ttl,
			)
			.await?;

		*self.version.write().await = Some(version.clone());

		Ok(version)
	}

	/// Forget the memoized version, both in memory and in the cache.
	pub async fn clear_version_cache(&self) -> Result<bool> {
		self.version.write().await.take();

		self.cache().delete(VERSION_KEY).await
	}

	/// Server metadata resource.
	pub fn server_info(&self) -> ServerInfoResource {
		ServerInfoResource::new(self.queries.clone(), self.cache().clone())
	}

	/// Realm administration resource.
	pub fn realms(&self) -> Realms {
		Realms::new(self.queries.clone(), self.commands.clone())
	}

	/// Brute-force detection resource.
	pub fn attack_detection(&self) -> AttackDetection {
		AttackDetection::new(self.queries.clone(), self.commands.clone())
	}

	/// User administration resource.
	pub fn users(&self) -> Users {
		Users::new(self.queries.clone(), self.commands.clone())
	}

	/// Group administration resource.
	pub fn groups(&self) -> Groups {
		Groups::new(self.queries.clone(), self.commands.clone())
	}

	/// Client administration resource.
	pub fn clients(&self) -> Clients {
		Clients::new(self.queries.clone(), self.commands.clone())
	}

	/// Realm role administration resource.
	pub fn roles(&self) -> Roles {
		Roles::new(self.queries.clone(), self.commands.clone())
	}

	/// Organization administration resource.
	pub fn organizations(&self) -> Organizations {
		Organizations::new(self.queries.clone(), self.commands.clone())
	}

	/// Underlying authorized HTTP client.
	pub fn client(&self) -> &Client {
		&self.client
	}

	/// Cache manager shared by tokens and memoized metadata.
	pub fn cache(&self) -> &CacheManager {
		self.client.cache()
	}

	/// Per-client counters.
	pub fn metrics(&self) -> Arc<ClientMetrics> {
		self.client.metrics()
	}

	/// Drop cached tokens, forcing re-authorization on the next request.
	pub async fn clear_tokens(&self) -> Result<bool> {
		self.client.clear_tokens().await
	}
}
