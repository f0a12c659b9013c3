//! Token acquisition, renewal, and fallback over HTTP.

// crates.io
use keycloak_admin_client::{
	Result, cache::memory::MemoryStore, http::token::{TokenSlot, TokenState},
};
use serde_json::json;
use wiremock::{
	Mock, MockServer, ResponseTemplate,
	matchers::{body_string_contains, header, method, path},
};
// self
use crate::common::{self, TOKEN_PATH};

#[tokio::test]
async fn cold_client_authorizes_once_and_reuses_token() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let access = common::mint(300);

	common::mount_password_grant(&server, &access, 1).await;
	Mock::given(method("GET"))
		.and(path("/admin/realms"))
		.and(header("authorization", format!("Bearer {access}").as_str()))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "realm": "master" }])))
		.expect(2)
		.mount(&server)
		.await;

	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");

	assert!(!keycloak.client().is_authorized().await?);
	assert_eq!(keycloak.realms().all(None).await?.len(), 1);
	assert_eq!(keycloak.realms().all(None).await?.len(), 1);
	assert!(keycloak.client().is_authorized().await?);
	assert_eq!(keycloak.metrics().snapshot().password_grants, 1);

	Ok(())
}

#[tokio::test]
async fn expired_access_token_is_renewed_with_refresh_grant() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let store = MemoryStore::new();
	let keycloak = common::keycloak(&server, &store, "keycloak_");
	let refresh = common::mint(3_600);
	let renewed = common::mint(300);

	keycloak.cache().set("access_token", common::mint(-60).as_str(), None).await?;
	keycloak.cache().set("refresh_token", refresh.as_str(), None).await?;

	assert_eq!(keycloak.client().token_state(TokenSlot::Access).await?, TokenState::Expired);

	Mock::given(method("POST"))
		.and(path(TOKEN_PATH))
		.and(body_string_contains("grant_type=refresh_token"))
		.and(body_string_contains(format!("refresh_token={refresh}")))
		.respond_with(common::token_response(&renewed, &common::mint(86_400)))
		.expect(1)
		.mount(&server)
		.await;
	common::mount_password_grant(&server, &renewed, 0).await;
	Mock::given(method("GET"))
		.and(path("/admin/realms/master"))
		.and(header("authorization", format!("Bearer {renewed}").as_str()))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "realm": "master" })))
		.expect(1)
		.mount(&server)
		.await;

	let realm = keycloak.realms().get("master").await?;

	assert_eq!(realm.realm.as_deref(), Some("master"));
	assert_eq!(keycloak.metrics().snapshot().refresh_grants, 1);

	Ok(())
}

#[tokio::test]
async fn rejected_refresh_falls_back_to_password_grant() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");
	let access = common::mint(300);

	keycloak.cache().set("refresh_token", common::mint(3_600).as_str(), None).await?;

	Mock::given(method("POST"))
		.and(path(TOKEN_PATH))
		.and(body_string_contains("grant_type=refresh_token"))
		.respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
		.expect(1)
		.mount(&server)
		.await;
	common::mount_password_grant(&server, &access, 1).await;
	Mock::given(method("POST"))
		.and(path("/admin/realms/master/clear-user-cache"))
		.and(header("authorization", format!("Bearer {access}").as_str()))
		.and(header("content-type", "application/json"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	keycloak.realms().clear_user_cache("master").await?;

	let snapshot = keycloak.metrics().snapshot();

	assert_eq!(snapshot.refresh_fallbacks, 1);
	assert_eq!(snapshot.password_grants, 1);

	Ok(())
}

#[tokio::test]
async fn password_grant_failure_surfaces_status() {
	common::init_tracing();

	let server = MockServer::start().await;

	Mock::given(method("POST"))
		.and(path(TOKEN_PATH))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_grant" })))
		.expect(1)
		.mount(&server)
		.await;

	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");
	let err = keycloak.realms().all(None).await.expect_err("authorization should fail");

	assert_eq!(err.status().map(|status| status.as_u16()), Some(401));
}

#[tokio::test]
async fn clear_tokens_triggers_new_password_grant() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;
	let access = common::mint(300);

	common::mount_password_grant(&server, &access, 2).await;
	Mock::given(method("GET"))
		.and(path("/admin/realms"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.expect(2)
		.mount(&server)
		.await;

	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");

	keycloak.realms().all(None).await?;

	assert!(keycloak.clear_tokens().await?);
	assert!(!keycloak.client().is_authorized().await?);

	keycloak.realms().all(None).await?;

	Ok(())
}

#[tokio::test]
async fn api_errors_carry_status_and_body() -> Result<()> {
	common::init_tracing();

	let server = MockServer::start().await;

	common::mount_password_grant(&server, &common::mint(300), 1).await;
	Mock::given(method("GET"))
		.and(path("/admin/realms/missing"))
		.respond_with(
			ResponseTemplate::new(404).set_body_json(json!({ "error": "Realm not found." })),
		)
		.expect(1)
		.mount(&server)
		.await;

	let keycloak = common::keycloak(&server, &MemoryStore::new(), "keycloak_");
	let err = keycloak.realms().get("missing").await.expect_err("realm should be missing");

	match err {
		keycloak_admin_client::Error::HttpStatus { status, body, .. } => {
			assert_eq!(status.as_u16(), 404);
			assert!(body.unwrap_or_default().contains("Realm not found."));
		},
		other => panic!("unexpected error: {other:?}"),
	}

	Ok(())
}
