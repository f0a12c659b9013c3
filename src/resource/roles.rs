//! Realm role administration.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	http::{
		executor::{CommandExecutor, QueryExecutor},
		request::{Command, Criteria, Query},
	},
	representation::Role,
	resource::filtered,
};

const ROLES_PATH: &str = "/admin/realms/{realm}/roles";
const ROLE_PATH: &str = "/admin/realms/{realm}/roles/{roleName}";

/// `/admin/realms/{realm}/roles` endpoints. Realm roles are addressed by name.
#[derive(Clone, Debug)]
pub struct Roles {
	queries: QueryExecutor,
	commands: CommandExecutor,
}
impl Roles {
	/// Resource over the shared query and command executors.
	pub fn new(queries: QueryExecutor, commands: CommandExecutor) -> Self {
		Self { queries, commands }
	}

	/// List realm roles.
	pub async fn all(&self, realm: &str, criteria: Option<Criteria>) -> Result<Vec<Role>> {
		let query = Query::new(ROLES_PATH).with_parameter("realm", realm);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Fetch one role by name.
	pub async fn get(&self, realm: &str, role_name: &str) -> Result<Role> {
		let query =
			Query::new(ROLE_PATH).with_parameter("realm", realm).with_parameter("roleName", role_name);

		self.queries.execute_query(&query).await
	}

	/// Create a role and return it as stored by the server.
	pub async fn create(&self, realm: &str, role: &Role) -> Result<Role> {
		let name = role_name(role)?;
		let command =
			Command::new(ROLES_PATH, Method::POST).with_parameter("realm", realm).with_json(role)?;

		self.commands.execute_command(&command).await?;

		self.get(realm, name).await
	}

	/// Replace the settings of the role named by `role.name`.
	pub async fn update(&self, realm: &str, role: &Role) -> Result<Role> {
		let name = role_name(role)?;
		let command = Command::new(ROLE_PATH, Method::PUT)
			.with_parameter("realm", realm)
			.with_parameter("roleName", name)
			.with_json(role)?;

		self.commands.execute_command(&command).await?;

		self.get(realm, name).await
	}

	/// Delete a role by name.
	pub async fn delete(&self, realm: &str, role_name: &str) -> Result<()> {
		let command = Command::new(ROLE_PATH, Method::DELETE)
			.with_parameter("realm", realm)
			.with_parameter("roleName", role_name);

		self.commands.execute_command(&command).await?;

		Ok(())
	}
}

fn role_name(role: &Role) -> Result<&str> {
	role.name.as_deref().filter(|name| !name.is_empty()).ok_or_else(|| Error::Validation {
		field: "role",
		reason: "Role name is required.".into(),
	})
}
