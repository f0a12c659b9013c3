//! Executors turning request descriptors into authorized calls.

// crates.io
use http::{HeaderValue, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	http::{
		client::Client,
		request::{Command, ContentType, Payload, Query},
		transport::{Body, RequestOptions, TransportResponse},
	},
};

/// Runs [`Query`] descriptors and decodes their JSON responses.
#[derive(Clone, Debug)]
pub struct QueryExecutor {
	client: Client,
}
impl QueryExecutor {
	/// Executor over an authorized client.
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	/// Execute a query and decode the body into `T`.
	pub async fn execute_query<T>(&self, query: &Query) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.fetch(query).await?.json()
	}

	/// Execute a query and return the body as untyped JSON.
	pub async fn execute_query_value(&self, query: &Query) -> Result<Value> {
		self.execute_query(query).await
	}

	async fn fetch(&self, query: &Query) -> Result<TransportResponse> {
		self.client.request(query.method(), &query.path(), RequestOptions::new()).await
	}
}

/// Runs [`Command`] descriptors, encoding their payloads.
#[derive(Clone, Debug)]
pub struct CommandExecutor {
	client: Client,
}
impl CommandExecutor {
	/// Executor over an authorized client.
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	/// Execute a command and return the raw response.
	///
	/// The `Content-Type` header always reflects the command's content type, even when there is
	/// no payload.
	pub async fn execute_command(&self, command: &Command) -> Result<TransportResponse> {
		let content_type = command.content_type();
		let body = match (command.payload(), content_type) {
			(None, _) => None,
			(Some(Payload::Text(text)), _) => Some(Body::Text(text.clone())),
			(Some(Payload::Json(value)), ContentType::Json) => Some(Body::Json(value.clone())),
			(Some(Payload::Json(value)), ContentType::FormParams) => Some(Body::Form(form_pairs(value)?)),
		};
		let mut options = RequestOptions::new()
			.with_header(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));

		options.body = body;

		self.client.request(command.method().clone(), &command.path(), options).await
	}
}

/// Flatten a JSON object or array into form fields.
///
/// Arrays use their indices as keys, nested arrays expand to repeated keys, nulls are dropped,
/// and nested objects are sent as JSON text.
pub fn form_pairs(value: &Value) -> Result<Vec<(String, String)>> {
	let entries: Vec<(String, &Value)> = match value {
		Value::Object(map) => map.iter().map(|(key, value)| (key.clone(), value)).collect(),
		Value::Array(items) =>
			items.iter().enumerate().map(|(index, value)| (index.to_string(), value)).collect(),
		_ =>
			return Err(Error::Validation {
				field: "payload",
				reason: "Form payloads must be a JSON object or array.".into(),
			}),
	};
	let mut pairs = Vec::with_capacity(entries.len());

	for (key, value) in entries {
		match value {
			Value::Null => {},
			Value::Array(items) =>
				for item in items {
					if let Some(item) = scalar(item)? {
						pairs.push((key.clone(), item));
					}
				},
			other =>
				if let Some(item) = scalar(other)? {
					pairs.push((key, item));
				},
		}
	}

	Ok(pairs)
}

fn scalar(value: &Value) -> Result<Option<String>> {
	Ok(match value {
		Value::Null => None,
		Value::String(text) => Some(text.clone()),
		Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
		Value::Array(_) | Value::Object(_) => Some(serde_json::to_string(value)?),
	})
}
