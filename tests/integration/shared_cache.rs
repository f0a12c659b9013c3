//! Several clients coordinating through one cache store.

// crates.io
use keycloak_admin_client::{Result, cache::memory::MemoryStore};
use serde_json::json;
use wiremock::{
	Mock, MockServer, ResponseTemplate,
	matchers::{method, path},
};
// self
use crate::common;

async fn mount_realms(server: &MockServer, times: u64) {
	Mock::given(method("GET"))
		.and(path("/admin/realms"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.expect(times)
		.mount(server)
		.await;
}

#[tokio::test]
async fn clients_sharing_prefix_share_tokens() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let store = MemoryStore::new();

	common::mount_password_grant(&server, &common::mint(300), 1).await;
	mount_realms(&server, 2).await;

	let first = common::keycloak(&server, &store, "app_");
	let second = common::keycloak(&server, &store, "app_");

	first.realms().all(None).await?;

	assert!(second.client().is_authorized().await?);

	second.realms().all(None).await?;

	assert_eq!(store.keys().await, ["app_access_token", "app_refresh_token"]);

	Ok(())
}

#[tokio::test]
async fn distinct_prefixes_keep_separate_sessions() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let store = MemoryStore::new();

	common::mount_password_grant(&server, &common::mint(300), 2).await;
	mount_realms(&server, 2).await;

	let tenant_a = common::keycloak(&server, &store, "a_");
	let tenant_b = common::keycloak(&server, &store, "b_");

	tenant_a.realms().all(None).await?;

	assert!(!tenant_b.client().is_authorized().await?);

	tenant_b.realms().all(None).await?;

	assert!(tenant_a.cache().clear_by_prefix("").await?);
	assert!(!tenant_a.client().is_authorized().await?);
	assert!(tenant_b.client().is_authorized().await?);
	assert_eq!(store.keys().await, ["b_access_token", "b_refresh_token"]);

	Ok(())
}
