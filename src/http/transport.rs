//! Transport capability and the bundled reqwest implementation.

// crates.io
use http::{
	HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
	header::{CONTENT_TYPE, LOCATION},
};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
// self
use crate::_prelude::*;

/// Request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
	/// JSON document, sent as `application/json` unless a content type is already set.
	Json(Value),
	/// Form fields, sent as `application/x-www-form-urlencoded`.
	Form(Vec<(String, String)>),
	/// Raw text body.
	Text(String),
}

/// Caller-supplied request options.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// Extra request headers.
	pub headers: HeaderMap,
	/// Optional request body.
	pub body: Option<Body>,
}
impl RequestOptions {
	/// Empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a header, keeping previously added values for the same name.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.append(name, value);

		self
	}

	/// Attach a body.
	pub fn with_body(mut self, body: Body) -> Self {
		self.body = Some(body);

		self
	}

	/// Layer these options over `base` headers.
	///
	/// Headers named by the caller replace the base values for that name; every other base
	/// header survives. Supplying an unrelated header therefore never drops the bearer token,
	/// while an explicit `Authorization` header overrides it.
	pub fn merge_over(self, base: HeaderMap) -> Self {
		let mut headers = base;

		for name in self.headers.keys() {
			headers.remove(name);
		}
		for (name, value) in self.headers.iter() {
			headers.append(name.clone(), value.clone());
		}

		Self { headers, body: self.body }
	}
}

/// Fully resolved request handed to a [`Transport`].
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Headers and body.
	pub options: RequestOptions,
}

/// Response returned by a [`Transport`].
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// Response status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Build a response from its parts.
	pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers, body: body.into() }
	}

	/// Response body as UTF-8 text, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decode the body as JSON.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		Ok(serde_json::from_slice(&self.body)?)
	}

	/// `Location` header, set by the server on resource creation.
	pub fn location(&self) -> Option<&str> {
		self.headers.get(LOCATION).and_then(|value| value.to_str().ok())
	}

	/// Identifier of a created resource: the last path segment of `Location`.
	pub fn created_id(&self) -> Option<&str> {
		self.location()
			.map(|location| location.trim_end_matches('/'))
			.and_then(|location| location.rsplit('/').next())
			.filter(|id| !id.is_empty())
	}
}

/// Capability to issue HTTP requests.
///
/// Implementations own timeouts and connection handling. Non-success statuses should surface as
/// errors so callers never mistake an error document for a payload.
#[async_trait::async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
	/// Send a request and return the response or a transport error.
	async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: reqwest::Client,
}
impl ReqwestTransport {
	/// Build a transport with the given connect and overall request timeouts.
	pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
		let client = reqwest::Client::builder()
			.redirect(Policy::limited(10))
			.user_agent(format!("keycloak-admin-client/{}", env!("CARGO_PKG_VERSION")))
			.connect_timeout(connect_timeout)
			.timeout(request_timeout)
			.build()?;

		Ok(Self::with_client(client))
	}

	/// Wrap a preconfigured reqwest client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}
#[async_trait::async_trait]
impl Transport for ReqwestTransport {
	async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
		let TransportRequest { method, url, options } = request;
		let RequestOptions { headers, body } = options;
		let has_content_type = headers.contains_key(CONTENT_TYPE);
		let mut builder = self.client.request(method.clone(), url.clone()).headers(headers);

		builder = match body {
			Some(Body::Json(value)) => {
				if !has_content_type {
					builder = builder
						.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
				}

				builder.body(serde_json::to_vec(&value)?)
			},
			Some(Body::Form(fields)) => builder.form(&fields),
			Some(Body::Text(text)) => builder.body(text),
			None => builder,
		};

		let start = Instant::now();
		let response = builder.send().await?;
		let elapsed = start.elapsed();
		let status = response.status();
		let headers = response.headers().clone();

		tracing::debug!(%method, path = url.path(), %status, ?elapsed, "request complete");

		if !status.is_success() {
			let body = response.text().await.ok();

			return Err(Error::HttpStatus { status, url, body });
		}

		let body = response.bytes().await?;

		Ok(TransportResponse::new(status, headers, body.to_vec()))
	}
}

/// Transport replaying queued responses and recording every request, for tests.
///
/// Once the queue is drained it answers `200 {}`.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
	responses: std::sync::Mutex<std::collections::VecDeque<Result<TransportResponse>>>,
	requests: std::sync::Mutex<Vec<TransportRequest>>,
}
#[cfg(test)]
impl ScriptedTransport {
	pub(crate) fn push(&self, response: Result<TransportResponse>) {
		self.responses.lock().unwrap().push_back(response);
	}

	pub(crate) fn requests(&self) -> Vec<TransportRequest> {
		self.requests.lock().unwrap().clone()
	}
}
#[cfg(test)]
#[async_trait::async_trait]
impl Transport for ScriptedTransport {
	async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
		self.requests.lock().unwrap().push(request);
		self.responses
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or_else(|| Ok(TransportResponse::new(StatusCode::OK, HeaderMap::new(), "{}")))
	}
}
