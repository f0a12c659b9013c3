//! Shared fixtures for the integration suite.

// std
use std::sync::Arc;
// crates.io
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use keycloak_admin_client::{Keycloak, cache::memory::MemoryStore};
use serde_json::json;
use wiremock::{
	Mock, MockServer, ResponseTemplate,
	matchers::{body_string_contains, method, path},
};

pub const TOKEN_PATH: &str = "/realms/master/protocol/openid-connect/token";

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// HS256 token expiring `offset_secs` from now.
pub fn mint(offset_secs: i64) -> String {
	let claims = json!({ "sub": "admin", "exp": Utc::now().timestamp() + offset_secs });

	jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(b"integration"))
		.expect("token should encode")
}

pub fn token_response(access: &str, refresh: &str) -> ResponseTemplate {
	ResponseTemplate::new(200)
		.set_body_json(json!({
			"access_token": access,
			"refresh_token": refresh,
			"token_type": "Bearer",
			"expires_in": 300,
		}))
		.insert_header("content-type", "application/json")
}

/// Mount a password grant answering with `access`, expected `times` times.
pub async fn mount_password_grant(server: &MockServer, access: &str, times: u64) {
	Mock::given(method("POST"))
		.and(path(TOKEN_PATH))
		.and(body_string_contains("grant_type=password"))
		.and(body_string_contains("client_id=admin-cli"))
		.respond_with(token_response(access, &mint(86_400)))
		.expect(times)
		.mount(server)
		.await;
}

pub fn keycloak(server: &MockServer, store: &MemoryStore, prefix: &str) -> Keycloak {
	Keycloak::builder(server.uri(), "admin", "secret")
		.prefix(prefix)
		.store(Arc::new(store.clone()))
		.build()
		.expect("client should build")
}
