//! HTTP transport, token lifecycle, and request execution.

pub mod client;
pub mod executor;
pub mod request;
pub mod token;
pub mod transport;
