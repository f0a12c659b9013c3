//! Brute-force detection state.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	http::{
		executor::{CommandExecutor, QueryExecutor},
		request::{Command, Query},
	},
	representation::BruteForceStatus,
};

const USERS_PATH: &str = "/admin/realms/{realm}/attack-detection/brute-force/users";
const USER_PATH: &str = "/admin/realms/{realm}/attack-detection/brute-force/users/{userId}";

/// `/admin/realms/{realm}/attack-detection` endpoints.
#[derive(Clone, Debug)]
pub struct AttackDetection {
	queries: QueryExecutor,
	commands: CommandExecutor,
}
impl AttackDetection {
	/// Resource over the shared query and command executors.
	pub fn new(queries: QueryExecutor, commands: CommandExecutor) -> Self {
		Self { queries, commands }
	}

	/// Clear login failures for every user of a realm.
	pub async fn clear(&self, realm: &str) -> Result<()> {
		self.commands
			.execute_command(&Command::new(USERS_PATH, Method::DELETE).with_parameter("realm", realm))
			.await?;

		Ok(())
	}

	/// Brute-force status of one user.
	pub async fn user_status(&self, realm: &str, user_id: &str) -> Result<BruteForceStatus> {
		self.queries
			.execute_query(
				&Query::new(USER_PATH).with_parameter("realm", realm).with_parameter("userId", user_id),
			)
			.await
	}

	/// Clear login failures for one user.
	pub async fn clear_user(&self, realm: &str, user_id: &str) -> Result<()> {
		let command = Command::new(USER_PATH, Method::DELETE)
			.with_parameter("realm", realm)
			.with_parameter("userId", user_id);

		self.commands.execute_command(&command).await?;

		Ok(())
	}
}
