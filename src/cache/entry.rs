//! Stored cache entries with lazy expiry bookkeeping.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Value held by an in-process store together with its expiry deadline.
#[derive(Clone, Debug)]
pub struct CacheEntry {
	value: Value,
	expires_at: Option<Instant>,
}
impl CacheEntry {
	/// Create an entry stored at `now`, expiring after `ttl` when given.
	///
	/// A TTL too large for the clock to represent never expires.
	pub fn new(value: Value, ttl: Option<Duration>, now: Instant) -> Self {
		Self { value, expires_at: ttl.and_then(|ttl| now.checked_add(ttl)) }
	}

	/// Stored value.
	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Whether the entry has passed its deadline.
	pub fn is_expired(&self, now: Instant) -> bool {
		self.expires_at.is_some_and(|deadline| now >= deadline)
	}
}
