//! Realm administration.

// crates.io
use http::Method;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	http::{
		executor::{CommandExecutor, QueryExecutor},
		request::{Command, Criteria, Query},
	},
	representation::Realm,
	resource::filtered,
};

const REALMS_PATH: &str = "/admin/realms";
const REALM_PATH: &str = "/admin/realms/{realm}";

/// `/admin/realms` endpoints.
#[derive(Clone, Debug)]
pub struct Realms {
	queries: QueryExecutor,
	commands: CommandExecutor,
}
impl Realms {
	/// Resource over the shared query and command executors.
	pub fn new(queries: QueryExecutor, commands: CommandExecutor) -> Self {
		Self { queries, commands }
	}

	/// List realms visible to the administrator.
	pub async fn all(&self, criteria: Option<Criteria>) -> Result<Vec<Realm>> {
		self.queries.execute_query(&filtered(Query::new(REALMS_PATH), criteria)).await
	}

	/// Fetch one realm.
	pub async fn get(&self, realm: &str) -> Result<Realm> {
		self.queries.execute_query(&Query::new(REALM_PATH).with_parameter("realm", realm)).await
	}

	/// Create a realm and return it as stored by the server.
	pub async fn import(&self, realm: &Realm) -> Result<Realm> {
		let name = realm_name(realm)?;

		self.commands.execute_command(&Command::new(REALMS_PATH, Method::POST).with_json(realm)?).await?;

		self.get(name).await
	}

	/// Replace a realm's settings and return the updated realm.
	///
	/// Renaming is followed: the updated realm is fetched under its new name when one is given.
	pub async fn update(&self, realm: &str, updated: &Realm) -> Result<Realm> {
		let command =
			Command::new(REALM_PATH, Method::PUT).with_parameter("realm", realm).with_json(updated)?;

		self.commands.execute_command(&command).await?;

		self.get(updated.realm.as_deref().unwrap_or(realm)).await
	}

	/// Delete a realm.
	pub async fn delete(&self, realm: &str) -> Result<()> {
		self.post_or_delete(REALM_PATH, Method::DELETE, realm).await
	}

	/// Admin events recorded for a realm.
	pub async fn admin_events(&self, realm: &str, criteria: Option<Criteria>) -> Result<Vec<Value>> {
		let query = Query::new("/admin/realms/{realm}/admin-events").with_parameter("realm", realm);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Delete every admin event of a realm.
	pub async fn delete_admin_events(&self, realm: &str) -> Result<()> {
		self.post_or_delete("/admin/realms/{realm}/admin-events", Method::DELETE, realm).await
	}

	/// Key metadata of a realm.
	pub async fn keys(&self, realm: &str, criteria: Option<Criteria>) -> Result<Value> {
		let query = Query::new("/admin/realms/{realm}/keys").with_parameter("realm", realm);

		self.queries.execute_query_value(&filtered(query, criteria)).await
	}

	/// Evict the realm's cached public keys.
	pub async fn clear_keys_cache(&self, realm: &str) -> Result<()> {
		self.post_or_delete("/admin/realms/{realm}/clear-keys-cache", Method::POST, realm).await
	}

	/// Evict the server-side realm cache.
	pub async fn clear_realm_cache(&self, realm: &str) -> Result<()> {
		self.post_or_delete("/admin/realms/{realm}/clear-realm-cache", Method::POST, realm).await
	}

	/// Evict the server-side user cache.
	pub async fn clear_user_cache(&self, realm: &str) -> Result<()> {
		self.post_or_delete("/admin/realms/{realm}/clear-user-cache", Method::POST, realm).await
	}

	async fn post_or_delete(&self, path: &str, method: Method, realm: &str) -> Result<()> {
		self.commands.execute_command(&Command::new(path, method).with_parameter("realm", realm)).await?;

		Ok(())
	}
}

fn realm_name(realm: &Realm) -> Result<&str> {
	realm.realm.as_deref().filter(|name| !name.is_empty()).ok_or_else(|| Error::Validation {
		field: "realm",
		reason: "Realm name is required.".into(),
	})
}
