//! Organization administration.

// crates.io
use http::Method;
use serde_json::json;
// self
use crate::{
	_prelude::*,
	http::{
		executor::{CommandExecutor, QueryExecutor},
		request::{Command, ContentType, Criteria, Query},
	},
	representation::{Member, Organization},
	resource::{created_id, filtered},
};

const ORGANIZATIONS_PATH: &str = "/admin/realms/{realm}/organizations";
const ORGANIZATION_PATH: &str = "/admin/realms/{realm}/organizations/{id}";
const MEMBERS_PATH: &str = "/admin/realms/{realm}/organizations/{id}/members";
const MEMBER_PATH: &str = "/admin/realms/{realm}/organizations/{id}/members/{memberId}";
const INVITE_USER_PATH: &str = "/admin/realms/{realm}/organizations/{id}/members/invite-user";
const INVITE_EXISTING_USER_PATH: &str =
	"/admin/realms/{realm}/organizations/{id}/members/invite-existing-user";
const IDENTITY_PROVIDERS_PATH: &str = "/admin/realms/{realm}/organizations/{id}/identity-providers";

/// `/admin/realms/{realm}/organizations` endpoints.
#[derive(Clone, Debug)]
pub struct Organizations {
	queries: QueryExecutor,
	commands: CommandExecutor,
}
impl Organizations {
	/// Resource over the shared query and command executors.
	pub fn new(queries: QueryExecutor, commands: CommandExecutor) -> Self {
		Self { queries, commands }
	}

	/// List organizations; `search`, `q`, `first` and `max` narrow the result.
	pub async fn all(&self, realm: &str, criteria: Option<Criteria>) -> Result<Vec<Organization>> {
		let query = Query::new(ORGANIZATIONS_PATH).with_parameter("realm", realm);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Fetch one organization.
	pub async fn get(&self, realm: &str, id: &str) -> Result<Organization> {
		self.queries.execute_query(&query(ORGANIZATION_PATH, realm, id)).await
	}

	/// Create an organization and return it as stored by the server.
	pub async fn create(&self, realm: &str, organization: &Organization) -> Result<Organization> {
		let command = Command::new(ORGANIZATIONS_PATH, Method::POST)
			.with_parameter("realm", realm)
			.with_json(organization)?;
		let response = self.commands.execute_command(&command).await?;

		self.get(realm, &created_id(&response, "organizations")?).await
	}

	/// Replace an organization's settings and return the updated organization.
	pub async fn update(
		&self,
		realm: &str,
		id: &str,
		organization: &Organization,
	) -> Result<Organization> {
		self.execute(command(ORGANIZATION_PATH, Method::PUT, realm, id).with_json(organization)?)
			.await?;

		self.get(realm, id).await
	}

	/// Delete an organization.
	pub async fn delete(&self, realm: &str, id: &str) -> Result<()> {
		self.execute(command(ORGANIZATION_PATH, Method::DELETE, realm, id)).await
	}

	/// Members of an organization.
	pub async fn members(
		&self,
		realm: &str,
		id: &str,
		criteria: Option<Criteria>,
	) -> Result<Vec<Member>> {
		self.queries.execute_query(&filtered(query(MEMBERS_PATH, realm, id), criteria)).await
	}

	/// Number of members of an organization.
	pub async fn members_count(
		&self,
		realm: &str,
		id: &str,
		criteria: Option<Criteria>,
	) -> Result<u64> {
		let query = query("/admin/realms/{realm}/organizations/{id}/members/count", realm, id);

		self.queries.execute_query(&filtered(query, criteria)).await
	}

	/// Fetch one member.
	pub async fn member(&self, realm: &str, id: &str, member_id: &str) -> Result<Member> {
		let query = query(MEMBER_PATH, realm, id).with_parameter("memberId", member_id);

		self.queries.execute_query(&query).await
	}

	/// Add an existing user as a member.
	///
	/// The body is the user id as a bare JSON string.
	pub async fn add_member(&self, realm: &str, id: &str, user_id: &str) -> Result<()> {
		self.execute(command(MEMBERS_PATH, Method::POST, realm, id).with_json(user_id)?).await
	}

	/// Remove a member.
	pub async fn delete_member(&self, realm: &str, id: &str, member_id: &str) -> Result<()> {
		self.execute(
			command(MEMBER_PATH, Method::DELETE, realm, id).with_parameter("memberId", member_id),
		)
		.await
	}

	/// Organizations a user belongs to, across the realm.
	pub async fn member_organizations(
		&self,
		realm: &str,
		member_id: &str,
	) -> Result<Vec<Organization>> {
		let query = Query::new("/admin/realms/{realm}/organizations/members/{memberId}/organizations")
			.with_parameter("realm", realm)
			.with_parameter("memberId", member_id);

		self.queries.execute_query(&query).await
	}

	/// Organizations a member of `id` belongs to.
	pub async fn org_member_organizations(
		&self,
		realm: &str,
		id: &str,
		member_id: &str,
	) -> Result<Vec<Organization>> {
		let query = query(
			"/admin/realms/{realm}/organizations/{id}/members/{memberId}/organizations",
			realm,
			id,
		)
		.with_parameter("memberId", member_id);

		self.queries.execute_query(&query).await
	}

	/// Invite a new user by email; the server creates the account on acceptance.
	pub async fn invite_user(
		&self,
		realm: &str,
		id: &str,
		email: &str,
		first_name: &str,
		last_name: &str,
	) -> Result<()> {
		let form = json!({ "email": email, "firstName": first_name, "lastName": last_name });

		self.execute(
			command(INVITE_USER_PATH, Method::POST, realm, id)
				.with_json(&form)?
				.with_content_type(ContentType::FormParams),
		)
		.await
	}

	/// Invite an existing user by id.
	pub async fn invite_existing_user(&self, realm: &str, id: &str, user_id: &str) -> Result<()> {
		self.execute(
			command(INVITE_EXISTING_USER_PATH, Method::POST, realm, id)
				.with_json(&json!({ "userId": user_id }))?
				.with_content_type(ContentType::FormParams),
		)
		.await
	}

	/// Link an identity provider, by alias, to the organization.
	pub async fn link_identity_provider(&self, realm: &str, id: &str, alias: &str) -> Result<()> {
		self.execute(
			command(IDENTITY_PROVIDERS_PATH, Method::POST, realm, id).with_json(alias)?,
		)
		.await
	}

	/// Unlink an identity provider from the organization.
	pub async fn unlink_identity_provider(&self, realm: &str, id: &str, alias: &str) -> Result<()> {
		self.execute(
			command(
				"/admin/realms/{realm}/organizations/{id}/identity-providers/{alias}",
				Method::DELETE,
				realm,
				id,
			)
			.with_parameter("alias", alias),
		)
		.await
	}

	async fn execute(&self, command: Command) -> Result<()> {
		self.commands.execute_command(&command).await?;

		Ok(())
	}
}

fn query(path: &str, realm: &str, id: &str) -> Query {
	Query::new(path).with_parameter("realm", realm).with_parameter("id", id)
}

fn command(path: &str, method: Method, realm: &str, id: &str) -> Command {
	Command::new(path, method).with_parameter("realm", realm).with_parameter("id", id)
}
