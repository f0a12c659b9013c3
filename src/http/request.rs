//! Request descriptors: path templates, query criteria, and command payloads.

// crates.io
use chrono::NaiveDate;
use http::Method;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Single query-string value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Criterion {
	/// Omitted from the query string.
	Null,
	/// Rendered as `true` or `false`.
	Bool(bool),
	/// Rendered as `YYYY-MM-DD`.
	Date(NaiveDate),
	/// Rendered verbatim.
	Text(String),
	/// Rendered in decimal.
	Int(i64),
	/// Rendered as one `key=value` pair per element.
	List(Vec<String>),
}
impl From<bool> for Criterion {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<&str> for Criterion {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for Criterion {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<i64> for Criterion {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}
impl From<i32> for Criterion {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}
impl From<u32> for Criterion {
	fn from(value: u32) -> Self {
		Self::Int(value.into())
	}
}
impl From<NaiveDate> for Criterion {
	fn from(value: NaiveDate) -> Self {
		Self::Date(value)
	}
}
impl From<DateTime<Utc>> for Criterion {
	fn from(value: DateTime<Utc>) -> Self {
		Self::Date(value.date_naive())
	}
}
impl From<Vec<String>> for Criterion {
	fn from(value: Vec<String>) -> Self {
		Self::List(value)
	}
}
impl From<Vec<&str>> for Criterion {
	fn from(value: Vec<&str>) -> Self {
		Self::List(value.into_iter().map(str::to_owned).collect())
	}
}
impl<T> From<Option<T>> for Criterion
where
	T: Into<Criterion>,
{
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

/// Ordered set of query-string criteria.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Criteria {
	entries: Vec<(String, Criterion)>,
}
impl Criteria {
	/// Empty criteria.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add or replace a criterion, keeping first-insertion order.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Criterion>) -> Self {
		self.insert(key, value);

		self
	}

	/// Add or replace a criterion in place.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Criterion>) {
		let key = key.into();
		let value = value.into();

		match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => *slot = value,
			None => self.entries.push((key, value)),
		}
	}

	/// Rendered key/value pairs; `Null` criteria are skipped and lists expand to repeated keys.
	pub fn pairs(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::with_capacity(self.entries.len());

		for (key, value) in &self.entries {
			match value {
				Criterion::Null => {},
				Criterion::Bool(value) => pairs.push((key.clone(), value.to_string())),
				Criterion::Date(date) => pairs.push((key.clone(), date.format("%Y-%m-%d").to_string())),
				Criterion::Text(text) => pairs.push((key.clone(), text.clone())),
				Criterion::Int(value) => pairs.push((key.clone(), value.to_string())),
				Criterion::List(items) =>
					pairs.extend(items.iter().map(|item| (key.clone(), item.clone()))),
			}
		}

		pairs
	}

	/// Whether rendering produces no pairs.
	pub fn is_empty(&self) -> bool {
		self.pairs().is_empty()
	}

	/// URL-encoded query string without the leading `?`.
	pub fn to_query_string(&self) -> String {
		form_urlencoded::Serializer::new(String::new()).extend_pairs(self.pairs()).finish()
	}
}
impl<K, V> FromIterator<(K, V)> for Criteria
where
	K: Into<String>,
	V: Into<Criterion>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut criteria = Self::new();

		for (key, value) in iter {
			criteria.insert(key, value);
		}

		criteria
	}
}

/// Content type used to encode a command payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentType {
	/// `application/json`.
	#[default]
	Json,
	/// `application/x-www-form-urlencoded`.
	FormParams,
}
impl ContentType {
	/// MIME type sent in the `Content-Type` header.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Json => "application/json",
			Self::FormParams => "application/x-www-form-urlencoded",
		}
	}
}

/// Command payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
	/// Structured payload, encoded according to the command's content type.
	Json(Value),
	/// Pre-encoded text sent as is.
	Text(String),
}

/// Read-only request; always `GET`.
#[derive(Clone, Debug, Default)]
pub struct Query {
	path: String,
	parameters: Vec<(String, String)>,
	criteria: Option<Criteria>,
}
impl Query {
	/// Query against a path template such as `/admin/realms/{realm}`.
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into(), ..Default::default() }
	}

	/// Bind a `{name}` placeholder.
	pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parameters.push((name.into(), value.into()));

		self
	}

	/// Attach query-string criteria.
	pub fn with_criteria(mut self, criteria: Criteria) -> Self {
		self.criteria = Some(criteria);

		self
	}

	/// Always [`Method::GET`].
	pub fn method(&self) -> Method {
		Method::GET
	}

	/// Resolved path including the query string.
	pub fn path(&self) -> String {
		render_path(&self.path, &self.parameters, self.criteria.as_ref())
	}
}

/// State-changing request.
#[derive(Clone, Debug)]
pub struct Command {
	path: String,
	method: Method,
	parameters: Vec<(String, String)>,
	payload: Option<Payload>,
	criteria: Option<Criteria>,
	content_type: ContentType,
}
impl Command {
	/// Command against a path template.
	pub fn new(path: impl Into<String>, method: Method) -> Self {
		Self {
			path: path.into(),
			method,
			parameters: Vec::new(),
			payload: None,
			criteria: None,
			content_type: ContentType::default(),
		}
	}

	/// Bind a `{name}` placeholder.
	pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parameters.push((name.into(), value.into()));

		self
	}

	/// Attach a payload.
	pub fn with_payload(mut self, payload: Payload) -> Self {
		self.payload = Some(payload);

		self
	}

	/// Serialize `value` as the payload.
	pub fn with_json<T>(self, value: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		Ok(self.with_payload(Payload::Json(serde_json::to_value(value)?)))
	}

	/// Attach query-string criteria.
	pub fn with_criteria(mut self, criteria: Criteria) -> Self {
		self.criteria = Some(criteria);

		self
	}

	/// Override the payload content type.
	pub fn with_content_type(mut self, content_type: ContentType) -> Self {
		self.content_type = content_type;

		self
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Resolved path including the query string.
	pub fn path(&self) -> String {
		render_path(&self.path, &self.parameters, self.criteria.as_ref())
	}

	/// Payload, when any.
	pub fn payload(&self) -> Option<&Payload> {
		self.payload.as_ref()
	}

	/// Payload content type.
	pub fn content_type(&self) -> ContentType {
		self.content_type
	}
}

fn render_path(template: &str, parameters: &[(String, String)], criteria: Option<&Criteria>) -> String {
	let mut path = template.to_owned();

	for (name, value) in parameters {
		path = path.replace(&format!("{{{name}}}"), value);
	}

	if let Some(query) = criteria.map(Criteria::to_query_string).filter(|query| !query.is_empty()) {
		path.push('?');
		path.push_str(&query);
	}

	path
}
