//! End-to-end tests against a mocked identity server.

mod common;
mod facade;
mod shared_cache;
mod token_lifecycle;
