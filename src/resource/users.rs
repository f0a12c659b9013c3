//! User administration.

// crates.io
use http::Method;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	http::{
		executor::{CommandExecutor, QueryExecutor},
		request::{Command, Criteria, Query},
	},
	representation::{Credential, Group, Role, User},
	resource::{created_id, filtered},
};

const USERS_PATH: &str = "/admin/realms/{realm}/users";
const USER_PATH: &str = "/admin/realms/{realm}/users/{userId}";
const REALM_ROLES_PATH: &str = "/admin/realms/{realm}/users/{userId}/role-mappings/realm";
const GROUP_MEMBERSHIP_PATH: &str = "/admin/realms/{realm}/users/{userId}/groups/{groupId}";

/// `/admin/realms/{realm}/users` endpoints.
#[derive(Clone, Debug)]
pub struct Users {
	queries: QueryExecutor,
	commands: CommandExecutor,
}
impl Users {
	/// Resource over the shared query and command executors.
	pub fn new(queries: QueryExecutor, commands: CommandExecutor) -> Self {
		Self { queries, commands }
	}

	/// List users, optionally paginated with `first`/`max`.
	pub async fn all(&self, realm: &str, criteria: Option<Criteria>) -> Result<Vec<User>> {
		self.search(realm, criteria).await
	}

	/// Search users by `search`, `username`, `email`, `exact` and the other server filters.
	pub async fn search(&self, realm: &str, criteria: Option<Criteria>) -> Result<Vec<User>> {
		let query = Query::new(USERS_PATH).with_parameter("realm", realm);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Fetch one user.
	pub async fn get(&self, realm: &str, user_id: &str) -> Result<User> {
		self.query(USER_PATH, realm, user_id, None).await
	}

	/// Create a user and return it as stored by the server.
	///
	/// The new identifier is read from the `Location` header of the creation response.
	pub async fn create(&self, realm: &str, user: &User) -> Result<User> {
		let command =
			Command::new(USERS_PATH, Method::POST).with_parameter("realm", realm).with_json(user)?;
		let response = self.commands.execute_command(&command).await?;

		self.get(realm, &created_id(&response, "users")?).await
	}

	/// Replace a user's settings and return the updated user.
	pub async fn update(&self, realm: &str, user_id: &str, updated: &User) -> Result<User> {
		self.execute(command(USER_PATH, Method::PUT, realm, user_id).with_json(updated)?).await?;

		self.get(realm, user_id).await
	}

	/// Delete a user.
	pub async fn delete(&self, realm: &str, user_id: &str) -> Result<()> {
		self.execute(command(USER_PATH, Method::DELETE, realm, user_id)).await
	}

	/// Add the user to a group.
	pub async fn join_group(&self, realm: &str, user_id: &str, group_id: &str) -> Result<()> {
		self.execute(
			command(GROUP_MEMBERSHIP_PATH, Method::PUT, realm, user_id)
				.with_parameter("groupId", group_id),
		)
		.await
	}

	/// Remove the user from a group.
	pub async fn leave_group(&self, realm: &str, user_id: &str, group_id: &str) -> Result<()> {
		self.execute(
			command(GROUP_MEMBERSHIP_PATH, Method::DELETE, realm, user_id)
				.with_parameter("groupId", group_id),
		)
		.await
	}

	/// Groups the user belongs to.
	pub async fn groups(
		&self,
		realm: &str,
		user_id: &str,
		criteria: Option<Criteria>,
	) -> Result<Vec<Group>> {
		self.query("/admin/realms/{realm}/users/{userId}/groups", realm, user_id, criteria).await
	}

	/// Realm roles mapped directly to the user.
	pub async fn realm_roles(&self, realm: &str, user_id: &str) -> Result<Vec<Role>> {
		self.query(REALM_ROLES_PATH, realm, user_id, None).await
	}

	/// Realm roles that could still be mapped to the user.
	pub async fn available_realm_roles(&self, realm: &str, user_id: &str) -> Result<Vec<Role>> {
		self.query(
			"/admin/realms/{realm}/users/{userId}/role-mappings/realm/available",
			realm,
			user_id,
			None,
		)
		.await
	}

	/// Map realm roles to the user.
	pub async fn add_realm_roles(&self, realm: &str, user_id: &str, roles: &[Role]) -> Result<()> {
		self.execute(command(REALM_ROLES_PATH, Method::POST, realm, user_id).with_json(roles)?).await
	}

	/// Remove realm role mappings from the user.
	pub async fn remove_realm_roles(&self, realm: &str, user_id: &str, roles: &[Role]) -> Result<()> {
		self.execute(command(REALM_ROLES_PATH, Method::DELETE, realm, user_id).with_json(roles)?)
			.await
	}

	/// Email the user a link to perform the given required actions.
	///
	/// `criteria` carries `client_id`, `redirect_uri` and `lifespan`.
	pub async fn execute_actions_email(
		&self,
		realm: &str,
		user_id: &str,
		actions: Option<&[String]>,
		criteria: Option<Criteria>,
	) -> Result<()> {
		let mut command = command(
			"/admin/realms/{realm}/users/{userId}/execute-actions-email",
			Method::PUT,
			realm,
			user_id,
		);

		if let Some(actions) = actions {
			command = command.with_json(actions)?;
		}
		if let Some(criteria) = criteria {
			command = command.with_criteria(criteria);
		}

		self.execute(command).await
	}

	/// Unlink an identity provider from the user.
	pub async fn remove_federated_identity(
		&self,
		realm: &str,
		user_id: &str,
		provider: &str,
	) -> Result<()> {
		self.execute(
			command(
				"/admin/realms/{realm}/users/{userId}/federated-identity/{provider}",
				Method::DELETE,
				realm,
				user_id,
			)
			.with_parameter("provider", provider),
		)
		.await
	}

	/// Credentials stored for the user; secret values are not disclosed.
	pub async fn credentials(&self, realm: &str, user_id: &str) -> Result<Vec<Credential>> {
		self.query("/admin/realms/{realm}/users/{userId}/credentials", realm, user_id, None).await
	}

	async fn query<T>(
		&self,
		path: &str,
		realm: &str,
		user_id: &str,
		criteria: Option<Criteria>,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let query = Query::new(path).with_parameter("realm", realm).with_parameter("userId", user_id);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	async fn execute(&self, command: Command) -> Result<()> {
		self.commands.execute_command(&command).await?;

		Ok(())
	}
}

fn command(path: &str, method: Method, realm: &str, user_id: &str) -> Command {
	Command::new(path, method).with_parameter("realm", realm).with_parameter("userId", user_id)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::resource::test_support::{calls, created, executors, json_body, ok};

	async fn users() -> (Users, Arc<crate::http::transport::ScriptedTransport>) {
		let (queries, commands, transport) = executors().await;

		(Users::new(queries, commands), transport)
	}

	#[tokio::test]
	async fn create_follows_location_header() {
		let (users, transport) = users().await;

		transport.push(created("http://keycloak:8080/admin/realms/demo/users/999a-e757"));
		transport.push(ok(json!({ "id": "999a-e757", "username": "alice" })));

		let user = users.create("demo", &User::new("alice").with_enabled(true)).await.unwrap();

		assert_eq!(user.id.as_deref(), Some("999a-e757"));
		assert_eq!(
			calls(&transport),
			vec![
				(Method::POST, "/admin/realms/demo/users".to_string()),
				(Method::GET, "/admin/realms/demo/users/999a-e757".into()),
			]
		);
		assert_eq!(
			json_body(&transport.requests()[0]),
			Some(&json!({ "username": "alice", "enabled": true }))
		);
	}

	#[tokio::test]
	async fn create_without_location_is_an_error() {
		let (users, transport) = users().await;

		transport.push(ok(json!({})));

		assert!(matches!(
			users.create("demo", &User::new("alice")).await,
			Err(Error::MissingField("Location"))
		));
		assert_eq!(transport.requests().len(), 1);
	}

	#[tokio::test]
	async fn search_passes_criteria() {
		let (users, transport) = users().await;

		transport.push(ok(json!([{ "username": "alice" }])));

		let found = users
			.search("demo", Some(Criteria::new().with("username", "alice").with("exact", true)))
			.await
			.unwrap();

		assert_eq!(found.len(), 1);
		assert_eq!(
			transport.requests()[0].url.as_str(),
			"http://keycloak:8080/admin/realms/demo/users?username=alice&exact=true"
		);
	}

	#[tokio::test]
	async fn group_membership_and_role_mappings() {
		let (users, transport) = users().await;

		users.join_group("demo", "u1", "g1").await.unwrap();
		users.leave_group("demo", "u1", "g1").await.unwrap();
		users.add_realm_roles("demo", "u1", &[Role::new("admin")]).await.unwrap();
		users.remove_realm_roles("demo", "u1", &[Role::new("admin")]).await.unwrap();

		assert_eq!(
			calls(&transport),
			vec![
				(Method::PUT, "/admin/realms/demo/users/u1/groups/g1".to_string()),
				(Method::DELETE, "/admin/realms/demo/users/u1/groups/g1".into()),
				(Method::POST, "/admin/realms/demo/users/u1/role-mappings/realm".into()),
				(Method::DELETE, "/admin/realms/demo/users/u1/role-mappings/realm".into()),
			]
		);
		assert_eq!(json_body(&transport.requests()[2]), Some(&json!([{ "name": "admin" }])));
	}

	#[tokio::test]
	async fn execute_actions_email_sends_actions_and_criteria() {
		let (users, transport) = users().await;
		let actions = ["UPDATE_PASSWORD".to_string()];

		users
			.execute_actions_email(
				"demo",
				"u1",
				Some(&actions),
				Some(Criteria::new().with("lifespan", 600)),
			)
			.await
			.unwrap();

		let request = &transport.requests()[0];

		assert_eq!(request.method, Method::PUT);
		assert_eq!(
			request.url.as_str(),
			"http://keycloak:8080/admin/realms/demo/users/u1/execute-actions-email?lifespan=600"
		);
		assert_eq!(json_body(request), Some(&json!(["UPDATE_PASSWORD"])));
	}

	#[tokio::test]
	async fn read_endpoints_decode_collections() {
		let (users, transport) = users().await;

		transport.push(ok(json!([{ "id": "g1", "name": "staff", "path": "/staff" }])));
		transport.push(ok(json!([{ "name": "offline_access" }])));
		transport.push(ok(json!([{ "type": "password", "createdDate": 1700000000000_i64 }])));

		assert_eq!(users.groups("demo", "u1", None).await.unwrap()[0].path.as_deref(), Some("/staff"));
		assert_eq!(
			users.available_realm_roles("demo", "u1").await.unwrap()[0].name.as_deref(),
			Some("offline_access")
		);
		assert_eq!(users.credentials("demo", "u1").await.unwrap()[0].kind.as_deref(), Some("password"));
		assert_eq!(
			calls(&transport)[1].1,
			"/admin/realms/demo/users/u1/role-mappings/realm/available"
		);
	}
}
