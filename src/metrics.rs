//! Metrics helpers and per-client telemetry bookkeeping.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

#[cfg(feature = "metrics")] pub use facade::*;
#[cfg(not(feature = "metrics"))] pub use noop::*;

/// Kind of grant issued against the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grant {
	/// `grant_type=password`.
	Password,
	/// `grant_type=refresh_token`.
	RefreshToken,
}
impl Grant {
	/// Wire value of the `grant_type` form field.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Password => "password",
			Self::RefreshToken => "refresh_token",
		}
	}
}

/// Thread-safe metrics accumulator for a single client instance.
#[derive(Debug, Default)]
pub struct ClientMetrics {
	cache_hits: AtomicU64,
	cache_misses: AtomicU64,
	password_grants: AtomicU64,
	refresh_grants: AtomicU64,
	refresh_fallbacks: AtomicU64,
	requests: AtomicU64,
}
impl ClientMetrics {
	/// Create a new metrics accumulator.
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Record a memoized lookup served from the cache.
	pub fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	/// Record a memoized lookup that had to compute its value.
	pub fn record_cache_miss(&self) {
		self.cache_misses.fetch_add(1, Ordering::Relaxed);
	}

	/// Record a successful token grant.
	pub fn record_grant(&self, grant: Grant) {
		match grant {
			Grant::Password => self.password_grants.fetch_add(1, Ordering::Relaxed),
			Grant::RefreshToken => self.refresh_grants.fetch_add(1, Ordering::Relaxed),
		};
	}

	/// Record a refresh grant failure that fell back to the password grant.
	pub fn record_refresh_fallback(&self) {
		self.refresh_fallbacks.fetch_add(1, Ordering::Relaxed);
	}

	/// Record an authorized request handed to the transport.
	pub fn record_request(&self) {
		self.requests.fetch_add(1, Ordering::Relaxed);
	}

	/// Take a point-in-time snapshot for diagnostics.
	pub fn snapshot(&self) -> ClientMetricsSnapshot {
		ClientMetricsSnapshot {
			cache_hits: self.cache_hits.load(Ordering::Relaxed),
			cache_misses: self.cache_misses.load(Ordering::Relaxed),
			password_grants: self.password_grants.load(Ordering::Relaxed),
			refresh_grants: self.refresh_grants.load(Ordering::Relaxed),
			refresh_fallbacks: self.refresh_fallbacks.load(Ordering::Relaxed),
			requests: self.requests.load(Ordering::Relaxed),
		}
	}
}

/// Read-only snapshot of per-client counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientMetricsSnapshot {
	/// Memoized lookups served from the cache.
	pub cache_hits: u64,
	/// Memoized lookups that computed their value.
	pub cache_misses: u64,
	/// Successful password grants.
	pub password_grants: u64,
	/// Successful refresh grants.
	pub refresh_grants: u64,
	/// Refresh grants that failed and fell back to the password grant.
	pub refresh_fallbacks: u64,
	/// Authorized requests issued through the client.
	pub requests: u64,
}
impl ClientMetricsSnapshot {
	/// Ratio of cache hits over all memoized lookups.
	pub fn hit_rate(&self) -> f64 {
		let total = self.cache_hits + self.cache_misses;

		if total == 0 { 0.0 } else { self.cache_hits as f64 / total as f64 }
	}
}

#[cfg(feature = "metrics")]
mod facade {
	// crates.io
	use metrics::Label;
	use smallvec::SmallVec;
	// self
	use super::Grant;

	type LabelSet = SmallVec<[Label; 4]>;

	const METRIC_CACHE_LOOKUPS: &str = "keycloak_cache_lookups_total";
	const METRIC_TOKEN_GRANTS: &str = "keycloak_token_grants_total";
	const METRIC_REQUESTS: &str = "keycloak_requests_total";

	/// Record a memoized cache lookup.
	pub fn record_cache_lookup(prefix: &str, hit: bool) {
		let mut labels = base_labels(prefix);

		labels.push(Label::new("outcome", if hit { "hit" } else { "miss" }));

		metrics::counter!(METRIC_CACHE_LOOKUPS, labels.iter()).increment(1);
	}

	/// Record a token grant attempt and its outcome.
	pub fn record_token_grant(prefix: &str, grant: Grant, success: bool) {
		let mut labels = base_labels(prefix);

		labels.push(Label::new("grant", grant.as_str()));
		labels.push(Label::new("outcome", if success { "success" } else { "error" }));

		metrics::counter!(METRIC_TOKEN_GRANTS, labels.iter()).increment(1);
	}

	/// Record an authorized request handed to the transport.
	pub fn record_request(prefix: &str) {
		metrics::counter!(METRIC_REQUESTS, base_labels(prefix).iter()).increment(1);
	}

	fn base_labels(prefix: &str) -> LabelSet {
		let mut labels = LabelSet::with_capacity(3);

		labels.push(Label::new("prefix", prefix.to_owned()));

		labels
	}
}

#[cfg(not(feature = "metrics"))]
mod noop {
	use super::Grant;

	/// Record a memoized cache lookup.
	pub fn record_cache_lookup(_prefix: &str, _hit: bool) {}

	/// Record a token grant attempt and its outcome.
	pub fn record_token_grant(_prefix: &str, _grant: Grant, _success: bool) {}

	/// Record an authorized request handed to the transport.
	pub fn record_request(_prefix: &str) {}
}

#[cfg(feature = "prometheus")]
mod exporter {
	// std
	use std::sync::OnceLock;
	// crates.io
	use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
	// self
	use crate::_prelude::*;

	/// Shared Prometheus handle installed by [`install_default_exporter`].
	static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

	/// Install the default Prometheus recorder backed by `metrics`.
	///
	/// Multiple invocations are safe; subsequent calls become no-ops once the recorder is
	/// installed.
	pub fn install_default_exporter() -> Result<()> {
		if PROMETHEUS_HANDLE.get().is_some() {
			return Ok(());
		}

		let handle = PrometheusBuilder::new()
			.install_recorder()
			.map_err(|err| Error::Metrics(err.to_string()))?;
		let _ = PROMETHEUS_HANDLE.set(handle);

		Ok(())
	}

	/// Access the global Prometheus exporter handle when installed.
	pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
		PROMETHEUS_HANDLE.get()
	}
}
#[cfg(feature = "prometheus")] pub use exporter::{install_default_exporter, prometheus_handle};
