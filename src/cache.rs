//! Pluggable cache stores and the namespacing cache manager.

pub mod entry;
pub mod manager;
pub mod memory;
#[cfg(feature = "redis")] pub mod redis;
pub mod store;
