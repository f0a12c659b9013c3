//! Wire representations of admin API documents.
//!
//! Only the fields the client reads or commonly writes are typed; everything else round-trips
//! through the flattened `extra` map.

// std
use std::collections::BTreeMap;
// crates.io
use serde::{Deserialize, Serialize};
use serde_json::Value;
// self
use crate::_prelude::*;

/// `GET /admin/serverinfo` document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
	/// Runtime and version information.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub system_info: Option<SystemInfo>,
	/// Heap usage snapshot.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub memory_info: Option<Value>,
	/// Remaining fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl ServerInfo {
	/// Server version string.
	pub fn version(&self) -> Result<&str> {
		self.system_info
			.as_ref()
			.and_then(|info| info.version.as_deref())
			.ok_or(Error::MissingField("systemInfo.version"))
	}
}

/// Runtime information embedded in [`ServerInfo`].
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server_time: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub uptime: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub uptime_millis: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub java_version: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub os_name: Option<String>,
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

/// Realm document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realm {
	/// Internal identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Realm name, used in admin paths.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub realm: Option<String>,
	/// Human-readable name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Whether the realm accepts logins.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// `all`, `external`, or `none`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ssl_required: Option<String>,
	/// Whether self-registration is allowed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registration_allowed: Option<bool>,
	/// Whether brute-force detection is enabled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub brute_force_protected: Option<bool>,
	/// Access token lifetime in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token_lifespan: Option<i64>,
	/// Remaining fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl Realm {
	/// Realm with the given name.
	pub fn new(realm: impl Into<String>) -> Self {
		Self { realm: Some(realm.into()), ..Default::default() }
	}

	/// Set the display name.
	pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = Some(display_name.into());

		self
	}

	/// Enable or disable the realm.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = Some(enabled);

		self
	}

	/// Set the SSL requirement.
	pub fn with_ssl_required(mut self, ssl_required: impl Into<String>) -> Self {
		self.ssl_required = Some(ssl_required.into());

		self
	}

	/// Allow or forbid self-registration.
	pub fn with_registration_allowed(mut self, allowed: bool) -> Self {
		self.registration_allowed = Some(allowed);

		self
	}

	/// Toggle brute-force detection.
	pub fn with_brute_force_protected(mut self, protected: bool) -> Self {
		self.brute_force_protected = Some(protected);

		self
	}

	/// Set the access token lifetime.
	pub fn with_access_token_lifespan(mut self, lifespan: Duration) -> Self {
		self.access_token_lifespan = Some(lifespan.as_secs().try_into().unwrap_or(i64::MAX));

		self
	}

	/// Set an attribute without a typed field.
	pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);

		self
	}
}

/// Brute-force status of a single user.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BruteForceStatus {
	#[serde(default)]
	pub num_failures: i64,
	#[serde(default)]
	pub disabled: bool,
	#[serde(default, rename = "lastIPFailure", skip_serializing_if = "Option::is_none")]
	pub last_ip_failure: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_failure: Option<i64>,
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

/// User document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Internal identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Login name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Whether the email address is verified.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email_verified: Option<bool>,
	/// Given name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Whether the user may log in.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// Creation time in epoch milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_timestamp: Option<i64>,
	/// Multi-valued custom attributes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attributes: Option<BTreeMap<String, Vec<String>>>,
	/// Required actions pending for the user.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub required_actions: Option<Vec<String>>,
	/// Remaining fields, including `membershipType` on organization members.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl User {
	/// User with the given login name.
	pub fn new(username: impl Into<String>) -> Self {
		Self { username: Some(username.into()), ..Default::default() }
	}

	/// Set the email address.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Set first and last name.
	pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
		self.first_name = Some(first_name.into());
		self.last_name = Some(last_name.into());

		self
	}

	/// Enable or disable the user.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = Some(enabled);

		self
	}
}

/// Organization member; a user document carrying `membershipType` in its extra fields.
pub type Member = User;

/// Group document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
	/// Internal identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Group name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Slash-separated path from the top-level group.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
	/// Identifier of the parent group, for subgroups.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<String>,
	/// Number of direct subgroups.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sub_group_count: Option<i64>,
	/// Child groups, when the server expands them.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sub_groups: Option<Vec<Group>>,
	/// Multi-valued custom attributes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attributes: Option<BTreeMap<String, Vec<String>>>,
	/// Remaining fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl Group {
	/// Group with the given name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: Some(name.into()), ..Default::default() }
	}
}

/// Client (relying party) document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
	/// Internal UUID, used in admin paths.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Protocol-level client identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Whether the client is enabled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// Whether the client is public (no secret).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub public_client: Option<bool>,
	/// `openid-connect` or `saml`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub protocol: Option<String>,
	/// Allowed redirect URIs.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_uris: Option<Vec<String>>,
	/// Remaining fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl ClientRepresentation {
	/// Client with the given protocol-level identifier.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client_id: Some(client_id.into()), ..Default::default() }
	}
}

/// Role document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
	/// Internal identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Role name, unique within its container.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Whether the role aggregates other roles.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub composite: Option<bool>,
	/// Whether the role belongs to a client.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_role: Option<bool>,
	/// Realm or client owning the role.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub container_id: Option<String>,
	/// Remaining fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl Role {
	/// Role with the given name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: Some(name.into()), ..Default::default() }
	}

	/// Set the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}
}

/// Organization document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
	/// Internal identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// URL-safe alias.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub alias: Option<String>,
	/// Whether the organization is enabled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// Free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Email domains, as `{ "name": .., "verified": .. }` documents.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domains: Option<Vec<Value>>,
	/// Remaining fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
impl Organization {
	/// Organization with the given name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: Some(name.into()), ..Default::default() }
	}

	/// Add an email domain.
	pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
		self.domains
			.get_or_insert_with(Vec::new)
			.push(serde_json::json!({ "name": domain.into() }));

		self
	}
}

/// Credential document, such as a client secret or a user password entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
	/// Internal identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// `password`, `secret`, `otp`, ...
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Secret value; only present where the server discloses it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	/// User-chosen label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_label: Option<String>,
	/// Creation time in epoch milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_date: Option<i64>,
	/// Remaining fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}
