//! Group administration.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	http::{
		executor::{CommandExecutor, QueryExecutor},
		request::{Command, Criteria, Query},
	},
	representation::{Group, User},
	resource::{created_id, filtered},
};

const GROUPS_PATH: &str = "/admin/realms/{realm}/groups";
const GROUP_PATH: &str = "/admin/realms/{realm}/groups/{groupId}";
const CHILDREN_PATH: &str = "/admin/realms/{realm}/groups/{groupId}/children";

/// `/admin/realms/{realm}/groups` endpoints.
#[derive(Clone, Debug)]
pub struct Groups {
	queries: QueryExecutor,
	commands: CommandExecutor,
}
impl Groups {
	/// Resource over the shared query and command executors.
	pub fn new(queries: QueryExecutor, commands: CommandExecutor) -> Self {
		Self { queries, commands }
	}

	/// Top-level groups.
	pub async fn all(&self, realm: &str, criteria: Option<Criteria>) -> Result<Vec<Group>> {
		let query = Query::new(GROUPS_PATH).with_parameter("realm", realm);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Look a group up by its slash-separated path, e.g. `staff/admins`.
	pub async fn by_path(&self, realm: &str, path: &str) -> Result<Group> {
		let query = Query::new("/admin/realms/{realm}/group-by-path/{path}")
			.with_parameter("realm", realm)
			.with_parameter("path", path.trim_start_matches('/'));

		self.queries.execute_query(&query).await
	}

	/// Direct children of a group.
	pub async fn children(
		&self,
		realm: &str,
		group_id: &str,
		criteria: Option<Criteria>,
	) -> Result<Vec<Group>> {
		self.queries.execute_query(&filtered(group(CHILDREN_PATH, realm, group_id), criteria)).await
	}

	/// Users that are members of a group.
	pub async fn members(
		&self,
		realm: &str,
		group_id: &str,
		criteria: Option<Criteria>,
	) -> Result<Vec<User>> {
		let query = group("/admin/realms/{realm}/groups/{groupId}/members", realm, group_id);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Fetch one group.
	pub async fn get(&self, realm: &str, group_id: &str) -> Result<Group> {
		self.queries.execute_query(&group(GROUP_PATH, realm, group_id)).await
	}

	/// Create a top-level group and return it as stored by the server.
	pub async fn create(&self, realm: &str, new: &Group) -> Result<Group> {
		let command =
			Command::new(GROUPS_PATH, Method::POST).with_parameter("realm", realm).with_json(new)?;

		self.create_with(realm, command).await
	}

	/// Create a group under `parent_id` and return it as stored by the server.
	pub async fn create_child(&self, realm: &str, new: &Group, parent_id: &str) -> Result<Group> {
		let command = Command::new(CHILDREN_PATH, Method::POST)
			.with_parameter("realm", realm)
			.with_parameter("groupId", parent_id)
			.with_json(new)?;

		self.create_with(realm, command).await
	}

	/// Replace a group's settings.
	pub async fn update(&self, realm: &str, group_id: &str, updated: &Group) -> Result<()> {
		let command = Command::new(GROUP_PATH, Method::PUT)
			.with_parameter("realm", realm)
			.with_parameter("groupId", group_id)
			.with_json(updated)?;

		self.commands.execute_command(&command).await?;

		Ok(())
	}

	/// Delete a group and its subgroups.
	pub async fn delete(&self, realm: &str, group_id: &str) -> Result<()> {
		let command = Command::new(GROUP_PATH, Method::DELETE)
			.with_parameter("realm", realm)
			.with_parameter("groupId", group_id);

		self.commands.execute_command(&command).await?;

		Ok(())
	}

	async fn create_with(&self, realm: &str, command: Command) -> Result<Group> {
		let response = self.commands.execute_command(&command).await?;

		self.get(realm, &created_id(&response, "groups")?).await
	}
}

fn group(path: &str, realm: &str, group_id: &str) -> Query {
	Query::new(path).with_parameter("realm", realm).with_parameter("groupId", group_id)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		http::transport::ScriptedTransport,
		resource::test_support::{calls, created, executors, json_body, ok},
	};

	async fn groups() -> (Groups, Arc<ScriptedTransport>) {
		let (queries, commands, transport) = executors().await;

		(Groups::new(queries, commands), transport)
	}

	#[tokio::test]
	async fn create_child_posts_under_parent_then_fetches() {
		let (groups, transport) = groups().await;

		transport.push(created("http://keycloak:8080/admin/realms/demo/groups/1ccc-e35d"));
		transport.push(ok(json!({ "id": "1ccc-e35d", "name": "admins", "path": "/staff/admins" })));

		let child = groups.create_child("demo", &Group::new("admins"), "parent-1").await.unwrap();

		assert_eq!(child.path.as_deref(), Some("/staff/admins"));
		assert_eq!(
			calls(&transport),
			vec![
				(Method::POST, "/admin/realms/demo/groups/parent-1/children".to_string()),
				(Method::GET, "/admin/realms/demo/groups/1ccc-e35d".into()),
			]
		);
		assert_eq!(json_body(&transport.requests()[0]), Some(&json!({ "name": "admins" })));
	}

	#[tokio::test]
	async fn create_rejects_foreign_location() {
		let (groups, transport) = groups().await;

		transport.push(created("http://keycloak:8080/admin/realms/demo/users/u1"));

		assert!(matches!(
			groups.create("demo", &Group::new("staff")).await,
			Err(Error::MissingField("Location"))
		));
	}

	#[tokio::test]
	async fn by_path_keeps_nested_segments() {
		let (groups, transport) = groups().await;

		transport.push(ok(json!({ "id": "g2", "path": "/staff/admins" })));
		groups.by_path("demo", "/staff/admins").await.unwrap();

		assert_eq!(calls(&transport)[0].1, "/admin/realms/demo/group-by-path/staff/admins");
	}

	#[tokio::test]
	async fn listing_endpoints_pass_criteria() {
		let (groups, transport) = groups().await;

		transport.push(ok(json!([])));
		transport.push(ok(json!([{ "username": "alice" }])));
		groups.all("demo", Some(Criteria::new().with("search", "staff"))).await.unwrap();

		let members =
			groups.members("demo", "g1", Some(Criteria::new().with("max", 10))).await.unwrap();

		assert_eq!(members[0].username.as_deref(), Some("alice"));

		let urls: Vec<_> =
			transport.requests().into_iter().map(|request| request.url.to_string()).collect();

		assert_eq!(
			urls,
			[
				"http://keycloak:8080/admin/realms/demo/groups?search=staff",
				"http://keycloak:8080/admin/realms/demo/groups/g1/members?max=10",
			]
		);
	}

	#[tokio::test]
	async fn update_and_delete() {
		let (groups, transport) = groups().await;

		groups.update("demo", "g1", &Group::new("renamed")).await.unwrap();
		groups.delete("demo", "g1").await.unwrap();

		assert_eq!(
			calls(&transport),
			vec![
				(Method::PUT, "/admin/realms/demo/groups/g1".to_string()),
				(Method::DELETE, "/admin/realms/demo/groups/g1".into()),
			]
		);
	}
}
