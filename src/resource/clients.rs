//! Client (relying party) administration.

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
	representation::{ClientRepresentation, Credential},
	resource::{created_id, filtered},
};

const CLIENTS_PATH: &str = "/admin/realms/{realm}/clients";
const CLIENT_PATH: &str = "/admin/realms/{realm}/clients/{clientUuid}";

/// `/admin/realms/{realm}/clients` endpoints.
///
/// Clients are addressed by their internal UUID, not by the protocol-level `clientId`.
#[derive(Clone, Debug)]
pub struct Clients {
	queries: QueryExecutor,
	commands: CommandExecutor,
}
impl Clients {
	/// Resource over the shared query and command executors.
	pub fn new(queries: QueryExecutor, commands: CommandExecutor) -> Self {
		Self { queries, commands }
	}

	/// List clients; `clientId` and `search` narrow the result.
	pub async fn all(
		&self,
		realm: &str,
		criteria: Option<Criteria>,
	) -> Result<Vec<ClientRepresentation>> {
		let query = Query::new(CLIENTS_PATH).with_parameter("realm", realm);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Fetch one client.
	pub async fn get(&self, realm: &str, client_uuid: &str) -> Result<ClientRepresentation> {
		self.queries.execute_query(&query(CLIENT_PATH, realm, client_uuid)).await
	}

	/// Create a client and return it as stored by the server.
	///
	/// The UUID comes from the `Location` header, or from `client.id` when the server omits it.
	pub async fn import(
		&self,
		realm: &str,
		client: &ClientRepresentation,
	) -> Result<ClientRepresentation> {
		let command =
			Command::new(CLIENTS_PATH, Method::POST).with_parameter("realm", realm).with_json(client)?;
		let response = self.commands.execute_command(&command).await?;
		let uuid = match (created_id(&response, "clients"), client.id.as_deref()) {
			(Ok(uuid), _) => uuid,
			(Err(_), Some(uuid)) => uuid.to_owned(),
			(Err(err), None) => return Err(err),
		};

		self.get(realm, &uuid).await
	}

	/// Replace a client's settings and return the updated client.
	pub async fn update(
		&self,
		realm: &str,
		client_uuid: &str,
		updated: &ClientRepresentation,
	) -> Result<ClientRepresentation> {
		let command = command(CLIENT_PATH, Method::PUT, realm, client_uuid).with_json(updated)?;

		self.commands.execute_command(&command).await?;

		self.get(realm, updated.id.as_deref().unwrap_or(client_uuid)).await
	}

	/// Delete a client.
	pub async fn delete(&self, realm: &str, client_uuid: &str) -> Result<()> {
		let command = command(CLIENT_PATH, Method::DELETE, realm, client_uuid);

		self.commands.execute_command(&command).await?;

		Ok(())
	}

	/// Active user sessions of a client.
	pub async fn user_sessions(
		&self,
		realm: &str,
		client_uuid: &str,
		criteria: Option<Criteria>,
	) -> Result<Vec<Value>> {
		let query =
			query("/admin/realms/{realm}/clients/{clientUuid}/user-sessions", realm, client_uuid);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Current secret of a confidential client.
	pub async fn client_secret(&self, realm: &str, client_uuid: &str) -> Result<Credential> {
		let query =
			query("/admin/realms/{realm}/clients/{clientUuid}/client-secret", realm, client_uuid);

		self.queries.execute_query(&query).await
	}
}

fn query(path: &str, realm: &str, client_uuid: &str) -> Query {
	Query::new(path).with_parameter("realm", realm).with_parameter("clientUuid", client_uuid)
}

fn command(path: &str, method: Method, realm: &str, client_uuid: &str) -> Command {
	Command::new(path, method)
		.with_parameter("realm", realm)
		.with_parameter("clientUuid", client_uuid)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		http::transport::ScriptedTransport,
		resource::test_support::{calls, created, executors, ok},
	};

	async fn clients() -> (Clients, Arc<ScriptedTransport>) {
		let (queries, commands, transport) = executors().await;

		(Clients::new(queries, commands), transport)
	}

	#[tokio::test]
	async fn import_reads_uuid_from_location() {
		let (clients, transport) = clients().await;

		transport.push(created("http://keycloak:8080/admin/realms/demo/clients/c-123"));
		transport.push(ok(json!({ "id": "c-123", "clientId": "portal" })));

		let client = clients.import("demo", &ClientRepresentation::new("portal")).await.unwrap();

		assert_eq!(client.client_id.as_deref(), Some("portal"));
		assert_eq!(calls(&transport)[1].1, "/admin/realms/demo/clients/c-123");
	}

	#[tokio::test]
	async fn import_falls_back_to_provided_uuid() {
		let (clients, transport) = clients().await;
		let mut portal = ClientRepresentation::new("portal");

		portal.id = Some("c-456".into());
		transport.push(ok(json!({})));
		transport.push(ok(json!({ "id": "c-456" })));
		clients.import("demo", &portal).await.unwrap();

		assert_eq!(calls(&transport)[1].1, "/admin/realms/demo/clients/c-456");

		transport.push(ok(json!({})));

		assert!(matches!(
			clients.import("demo", &ClientRepresentation::new("portal")).await,
			Err(Error::MissingField("Location"))
		));
	}

	#[tokio::test]
	async fn secret_and_sessions() {
		let (clients, transport) = clients().await;

		transport.push(ok(json!({ "type": "secret", "value": "s3cr3t" })));
		transport.push(ok(json!([{ "id": "s1", "username": "alice" }])));

		assert_eq!(
			clients.client_secret("demo", "c-1").await.unwrap().value.as_deref(),
			Some("s3cr3t")
		);
		assert_eq!(
			clients
				.user_sessions("demo", "c-1", Some(Criteria::new().with("first", 0)))
				.await
				.unwrap()
				.len(),
			1
		);
		assert_eq!(
			transport.requests()[1].url.as_str(),
			"http://keycloak:8080/admin/realms/demo/clients/c-1/user-sessions?first=0"
		);
	}

	#[tokio::test]
	async fn update_and_delete() {
		let (clients, transport) = clients().await;

		clients.update("demo", "c-1", &ClientRepresentation::new("portal")).await.unwrap();
		clients.delete("demo", "c-1").await.unwrap();

		assert_eq!(
			calls(&transport),
			vec![
				(Method::PUT, "/admin/realms/demo/clients/c-1".to_string()),
				(Method::GET, "/admin/realms/demo/clients/c-1".into()),
				(Method::DELETE, "/admin/realms/demo/clients/c-1".into()),
			]
		);
	}
}
