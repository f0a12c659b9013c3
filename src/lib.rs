//! Typed async client for the Keycloak admin REST API, with cached token lifecycle and
//! prefix-namespaced metadata caching over pluggable stores.
//!
//! ```no_run
//! # async fn demo() -> keycloak_admin_client::Result<()> {
//! use keycloak_admin_client::Keycloak;
//!
//! let keycloak = Keycloak::builder("http://localhost:8080", "admin", "admin")
//! 	.prefix("app_")
//! 	.build()?;
//!
//! println!("server version: {}", keycloak.version().await?);
//!
//! for realm in keycloak.realms().all(None).await? {
//! 	println!("{:?}", realm.realm);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod config;
pub mod http;
pub mod keycloak;
pub mod metrics;
pub mod representation;
pub mod resource;

mod error;
mod _prelude {
	pub use std::{sync::Arc, time::Duration};

	pub use chrono::{DateTime, Utc};
	pub use tokio::time::Instant;

	pub use crate::{Error, Result};
}

#[cfg(feature = "redis")] pub use crate::cache::redis::RedisStore;
#[cfg(feature = "prometheus")]
pub use crate::metrics::{install_default_exporter, prometheus_handle};
pub use crate::{
	cache::{manager::CacheManager, memory::MemoryStore, store::CacheStore},
	config::{CacheConfig, ClientConfig, Credentials, TtlTable},
	error::{Error, Result},
	http::{
		client::Client,
		executor::{CommandExecutor, QueryExecutor},
		request::{Command, ContentType, Criteria, Criterion, Payload, Query},
		token::{Token, TokenSlot, TokenState},
		transport::{Body, ReqwestTransport, RequestOptions, Transport, TransportResponse},
	},
	keycloak::{Keycloak, KeycloakBuilder},
	metrics::{ClientMetrics, ClientMetricsSnapshot},
	representation::{
		BruteForceStatus, ClientRepresentation, Credential, Group, Member, Organization, Realm, Role,
		ServerInfo, SystemInfo, User,
	},
};
