//! Façade behaviour: memoized metadata and resource endpoints.

// std
use std::time::Duration;
// crates.io
use keycloak_admin_client::{
	Keycloak, Result,
	cache::memory::MemoryStore,
	representation::{Realm, User},
};
use serde_json::json;
use wiremock::{
	Mock, MockServer, ResponseTemplate,
	matchers::{body_json, method, path},
};
// self
use crate::common;

async fn mount_server_info(server: &MockServer, version: &str, times: u64) {
	Mock::given(method("GET"))
		.and(path("/admin/serverinfo"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"systemInfo": { "version": version, "uptime": "0 days" },
			"memoryInfo": { "used": 1 },
		})))
		.expect(times)
		.mount(server)
		.await;
}

#[tokio::test]
async fn version_and_server_info_are_memoized() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;

	common::mount_password_grant(&server, &common::mint(300), 1).await;
	mount_server_info(&server, "26.0.5", 1).await;

	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");

	assert_eq!(keycloak.version().await?, "26.0.5");
	assert_eq!(keycloak.version().await?, "26.0.5");
	assert_eq!(keycloak.server_info().get().await?.version()?, "26.0.5");
	assert!(keycloak.metrics().snapshot().cache_hits >= 1);

	Ok(())
}

#[tokio::test]
async fn version_survives_across_clients_through_the_store() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let store = MemoryStore::new();

	common::mount_password_grant(&server, &common::mint(300), 1).await;
	mount_server_info(&server, "25.0.1", 1).await;

	assert_eq!(common::keycloak(&server, &store, "keycloak_").version().await?, "25.0.1");
	assert_eq!(common::keycloak(&server, &store, "keycloak_").version().await?, "25.0.1");

	Ok(())
}

#[tokio::test]
async fn cleared_server_info_is_refetched() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let keycloak = Keycloak::builder(server.uri(), "admin", "secret")
		.ttl("server_info", Duration::from_secs(60))
		.build()?;

	keycloak.cache().set("access_token", common::mint(86_400).as_str(), None).await?;
	mount_server_info(&server, "26.0.0", 2).await;

	keycloak.server_info().get().await?;
	keycloak.server_info().get().await?;

	assert!(keycloak.server_info().clear_cache().await?);

	keycloak.server_info().get().await?;

	Ok(())
}

#[tokio::test]
async fn realm_import_posts_payload_then_reads_back() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;

	common::mount_password_grant(&server, &common::mint(300), 1).await;
	Mock::given(method("POST"))
		.and(path("/admin/realms"))
		.and(body_json(json!({ "realm": "demo", "enabled": true, "displayName": "Demo" })))
		.respond_with(
			ResponseTemplate::new(201).insert_header("location", format!("{}/admin/realms/demo", server.uri())),
		)
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/admin/realms/demo"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"id": "9f1c",
			"realm": "demo",
			"enabled": true,
			"displayName": "Demo",
			"sslRequired": "external",
		})))
		.expect(1)
		.mount(&server)
		.await;

	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");
	let realm =
		keycloak.realms().import(&Realm::new("demo").with_enabled(true).with_display_name("Demo")).await?;

	assert_eq!(realm.id.as_deref(), Some("9f1c"));
	assert_eq!(realm.ssl_required.as_deref(), Some("external"));

	Ok(())
}

#[tokio::test]
async fn attack_detection_endpoints() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;

	common::mount_password_grant(&server, &common::mint(300), 1).await;
	Mock::given(method("DELETE"))
		.and(path("/admin/realms/master/attack-detection/brute-force/users"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/admin/realms/master/attack-detection/brute-force/users/u-1"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"numFailures": 2,
			"disabled": false,
			"lastIPFailure": "127.0.0.1",
			"lastFailure": 0,
		})))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("DELETE"))
		.and(path("/admin/realms/master/attack-detection/brute-force/users/u-1"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");
	let attack_detection = keycloak.attack_detection();

	attack_detection.clear("master").await?;

	let status = attack_detection.user_status("master", "u-1").await?;

	assert_eq!(status.num_failures, 2);
	assert_eq!(status.last_ip_failure.as_deref(), Some("127.0.0.1"));

	attack_detection.clear_user("master", "u-1").await?;

	Ok(())
}

#[tokio::test]
async fn user_creation_follows_location_header() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let location = format!("{}/admin/realms/demo/users/7f1c-42aa", server.uri());

	common::mount_password_grant(&server, &common::mint(300), 1).await;
	Mock::given(method("POST"))
		.and(path("/admin/realms/demo/users"))
		.and(body_json(json!({ "username": "alice", "email": "alice@demo.test" })))
		.respond_with(ResponseTemplate::new(201).insert_header("Location", location.as_str()))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/admin/realms/demo/users/7f1c-42aa"))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({ "id": "7f1c-42aa", "username": "alice", "enabled": true })),
		)
		.expect(1)
		.mount(&server)
		.await;

	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");
	let user = keycloak.users().create("demo", &User::new("alice").with_email("alice@demo.test")).await?;

	assert_eq!(user.id.as_deref(), Some("7f1c-42aa"));
	assert_eq!(user.enabled, Some(true));

	Ok(())
}
