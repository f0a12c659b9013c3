//! Crate-wide error types and `Result` alias.

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the Keycloak admin client.
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Base64(#[from] base64::DecodeError),
	#[error(transparent)]
	Http(#[from] http::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
	#[error(transparent)]
	Jsonwebtoken(#[from] jsonwebtoken::errors::Error),
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	Serde(#[from] serde_json::Error),
	#[error(transparent)]
	Url(#[from] url::ParseError),

	#[cfg(feature = "redis")]
	#[error(transparent)]
	Redis(#[from] redis::RedisError),

	#[error("Cache error: {0}")]
	Cache(String),
	#[error("Upstream HTTP status {status} from {url}: {body:?}")]
	HttpStatus { status: http::StatusCode, url: url::Url, body: Option<String> },
	#[error("Metrics error: {0}")]
	Metrics(String),
	#[error("Response is missing required field '{0}'.")]
	MissingField(&'static str),
	#[error("Malformed token: {0}")]
	Token(String),
	#[error("Validation failed for {field}: {reason}")]
	Validation { field: &'static str, reason: String },
}
impl Error {
	/// Upstream status code when the error came from a non-success HTTP response.
	pub fn status(&self) -> Option<http::StatusCode> {
		match self {
			Self::HttpStatus { status, .. } => Some(*status),
			Self::Reqwest(err) => err.status(),
			_ => None,
		}
	}
}
#[cfg(feature = "metrics")]
impl<T> From<metrics::SetRecorderError<T>> for Error
where
	T: std::fmt::Display,
{
	fn from(value: metrics::SetRecorderError<T>) -> Self {
		Self::Metrics(value.to_string())
	}
}
