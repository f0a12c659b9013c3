//! Client configuration, credentials, and cache TTL defaults.

// std
use std::{
	collections::HashMap,
	fmt::{Debug, Formatter, Result as FmtResult},
};
// crates.io
use serde::{Deserialize, Serialize};
use url::Url;
// self
use crate::_prelude::*;

/// Default namespace prepended to every cache key.
pub const DEFAULT_PREFIX: &str = "keycloak_";
/// Default TTL for the memoized server version.
pub const DEFAULT_VERSION_TTL: Duration = Duration::from_secs(60 * 60 * 24);
/// Default TTL for memoized server metadata.
pub const DEFAULT_SERVER_INFO_TTL: Duration = Duration::from_secs(60 * 60);
/// Default TTL for cached access tokens.
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);
/// Default TTL for cached refresh tokens.
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);
/// Default connect timeout of the bundled reqwest transport.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default overall request timeout of the bundled reqwest transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cache purpose key for the server version.
pub const VERSION_KEY: &str = "version";
/// Cache purpose key for server metadata.
pub const SERVER_INFO_KEY: &str = "server_info";
/// Cache purpose key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Cache purpose key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Per-purpose TTL table.
///
/// Entries supplied by the caller are merged over the built-in defaults, so overriding a
/// single purpose keeps the others intact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Duration>", into = "HashMap<String, Duration>")]
pub struct TtlTable {
	entries: HashMap<String, Duration>,
}
impl TtlTable {
	/// Table without any entries, not even the defaults.
	pub fn empty() -> Self {
		Self { entries: HashMap::new() }
	}

	/// Look up the TTL configured for a purpose key.
	pub fn get(&self, key: &str) -> Option<Duration> {
		self.entries.get(key).copied()
	}

	/// Insert or replace the TTL for a purpose key.
	pub fn insert(&mut self, key: impl Into<String>, ttl: Duration) -> Option<Duration> {
		self.entries.insert(key.into(), ttl)
	}

	/// Builder-style variant of [`TtlTable::insert`].
	pub fn with(mut self, key: impl Into<String>, ttl: Duration) -> Self {
		self.insert(key, ttl);

		self
	}

	/// Iterate over every configured purpose.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Duration)> {
		self.entries.iter().map(|(key, ttl)| (key.as_str(), *ttl))
	}

	/// Validate that no purpose is configured with a zero TTL.
	pub fn validate(&self) -> Result<()> {
		if let Some((key, _)) = self.iter().find(|(_, ttl)| ttl.is_zero()) {
			return Err(Error::Validation {
				field: "cache.ttl",
				reason: format!("TTL for '{key}' must be greater than zero."),
			});
		}

		Ok(())
	}
}
impl Default for TtlTable {
	fn default() -> Self {
		Self::empty()
			.with(VERSION_KEY, DEFAULT_VERSION_TTL)
			.with(SERVER_INFO_KEY, DEFAULT_SERVER_INFO_TTL)
			.with(ACCESS_TOKEN_KEY, DEFAULT_ACCESS_TOKEN_TTL)
			.with(REFRESH_TOKEN_KEY, DEFAULT_REFRESH_TOKEN_TTL)
	}
}
impl From<HashMap<String, Duration>> for TtlTable {
	fn from(overrides: HashMap<String, Duration>) -> Self {
		let mut table = Self::default();

		table.entries.extend(overrides);

		table
	}
}
impl From<TtlTable> for HashMap<String, Duration> {
	fn from(value: TtlTable) -> Self {
		value.entries
	}
}

/// Cache namespacing and expiry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
	/// Prefix prepended to every logical key before it reaches the store.
	#[serde(default = "default_prefix")]
	pub prefix: String,
	/// Default TTL per purpose key.
	#[serde(default)]
	pub ttl: TtlTable,
}
impl CacheConfig {
	/// Replace the key prefix.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();

		self
	}

	/// Override the TTL for a purpose key.
	pub fn with_ttl(mut self, key: impl Into<String>, ttl: Duration) -> Self {
		self.ttl.insert(key, ttl);

		self
	}
}
impl Default for CacheConfig {
	fn default() -> Self {
		Self { prefix: default_prefix(), ttl: TtlTable::default() }
	}
}

/// Administrator credentials used for the password grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	base_url: Url,
	username: String,
	password: String,
}
impl Credentials {
	/// Build credentials, validating the base URL.
	pub fn new(
		base_url: impl AsRef<str>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Result<Self> {
		let base_url = Url::parse(base_url.as_ref())?;
		let credentials = Self { base_url, username: username.into(), password: password.into() };

		credentials.validate()?;

		Ok(credentials)
	}

	/// Server base URL.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Administrator username.
	pub fn username(&self) -> &str {
		&self.username
	}

	/// Administrator password.
	pub fn password(&self) -> &str {
		&self.password
	}

	/// Resolve an absolute URL by appending `path` to the base URL verbatim.
	pub fn endpoint(&self, path: &str) -> Result<Url> {
		let base = self.base_url.as_str().trim_end_matches('/');

		Ok(Url::parse(&format!("{base}{path}"))?)
	}

	/// Validate the credential set.
	pub fn validate(&self) -> Result<()> {
		if !matches!(self.base_url.scheme(), "http" | "https") {
			return Err(Error::Validation {
				field: "base_url",
				reason: "Must use the http or https scheme.".into(),
			});
		}
		if self.base_url.host_str().is_none() {
			return Err(Error::Validation {
				field: "base_url",
				reason: "Must include a host component.".into(),
			});
		}
		if self.username.trim().is_empty() {
			return Err(Error::Validation { field: "username", reason: "Must not be empty.".into() });
		}

		Ok(())
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.debug_struct("Credentials")
			.field("base_url", &self.base_url.as_str())
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Complete client configuration, loadable through serde.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Server base URL, e.g. `http://localhost:8080`.
	pub base_url: Url,
	/// Administrator username for the `master` realm.
	pub username: String,
	/// Administrator password for the `master` realm.
	pub password: String,
	/// Cache namespacing and TTL settings.
	#[serde(default)]
	pub cache: CacheConfig,
	/// Connect timeout applied by the bundled transport.
	#[serde(default = "default_connect_timeout")]
	pub connect_timeout: Duration,
	/// Request timeout applied by the bundled transport.
	#[serde(default = "default_request_timeout")]
	pub request_timeout: Duration,
}
impl ClientConfig {
	/// Construct a configuration with default cache and timeout settings.
	pub fn new(
		base_url: impl AsRef<str>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Result<Self> {
		Ok(Self {
			base_url: Url::parse(base_url.as_ref())?,
			username: username.into(),
			password: password.into(),
			cache: CacheConfig::default(),
			connect_timeout: DEFAULT_CONNECT_TIMEOUT,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		})
	}

	/// Extract the credential set.
	pub fn credentials(&self) -> Credentials {
		Credentials {
			base_url: self.base_url.clone(),
			username: self.username.clone(),
			password: self.password.clone(),
		}
	}

	/// Validate the configuration against the documented constraints.
	pub fn validate(&self) -> Result<()> {
		self.credentials().validate()?;
		self.cache.ttl.validate()?;

		if self.request_timeout.is_zero() {
			return Err(Error::Validation {
				field: "request_timeout",
				reason: "Must be greater than zero.".into(),
			});
		}
		if self.connect_timeout > self.request_timeout {
			return Err(Error::Validation {
				field: "connect_timeout",
				reason: "Must be less than or equal to request_timeout.".into(),
			});
		}

		Ok(())
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("base_url", &self.base_url.as_str())
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.field("cache", &self.cache)
			.field("connect_timeout", &self.connect_timeout)
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}

fn default_prefix() -> String {
	DEFAULT_PREFIX.into()
}

fn default_connect_timeout() -> Duration {
	DEFAULT_CONNECT_TIMEOUT
}

fn default_request_timeout() -> Duration {
	DEFAULT_REQUEST_TIMEOUT
}
