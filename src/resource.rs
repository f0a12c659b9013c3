//! Typed façades over admin API endpoints.

pub mod attack_detection;
pub mod clients;
pub mod groups;
pub mod organizations;
pub mod realms;
pub mod roles;
pub mod server_info;
pub mod users;

// self
use crate::{
	_prelude::*,
	http::{
		request::{Criteria, Query},
		transport::TransportResponse,
	},
};

fn filtered(query: Query, criteria: Option<Criteria>) -> Query {
	match criteria {
		Some(criteria) => query.with_criteria(criteria),
		None => query,
	}
}

/// Identifier of a resource created under `collection`, read from the `Location` header.
///
/// The header must end in `/{collection}/{id}`; anything else is reported as a missing field.
fn created_id(response: &TransportResponse, collection: &str) -> Result<String> {
	let id = response.created_id().ok_or(Error::MissingField("Location"))?;
	let parent = response
		.location()
		.map(|location| location.trim_end_matches('/'))
		.and_then(|location| location.strip_suffix(id))
		.and_then(|location| location.strip_suffix('/'))
		.and_then(|location| location.rsplit('/').next());

	if parent != Some(collection) {
		return Err(Error::MissingField("Location"));
	}

	Ok(id.to_owned())
}
