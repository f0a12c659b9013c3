//! Bearer token parsing and the token endpoint grant shapes.

// crates.io
use base64::prelude::*;
use serde::Deserialize;
// self
use crate::{
	_prelude::*,
	config::{
		ACCESS_TOKEN_KEY, DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_REFRESH_TOKEN_TTL, REFRESH_TOKEN_KEY,
	},
	metrics::Grant,
};

/// Token endpoint of the administrative realm, relative to the base URL.
pub const TOKEN_ENDPOINT: &str = "/realms/master/protocol/openid-connect/token";
/// Public client used for administrator grants.
pub const ADMIN_CLIENT_ID: &str = "admin-cli";

/// Parsed bearer token.
///
/// Only the header structure and the `exp` claim are inspected; signatures are the server's
/// concern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
	raw: String,
	expires_at: Option<DateTime<Utc>>,
}
impl Token {
	/// Parse a compact JWT.
	///
	/// A token without an `exp` claim is treated as never expiring.
	pub fn parse(raw: impl Into<String>) -> Result<Self> {
		let raw = raw.into();

		jsonwebtoken::decode_header(&raw)?;

		let mut segments = raw.split('.');
		let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
			(Some(_), Some(payload), Some(_), None) => payload,
			_ => return Err(Error::Token("Expected three dot-separated segments.".into())),
		};
		let claims: Claims =
			serde_json::from_slice(&BASE64_URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?)?;
		let expires_at = match claims.exp {
			Some(exp) => Some(
				DateTime::from_timestamp(exp.floor() as i64, 0)
					.ok_or_else(|| Error::Token(format!("Claim 'exp' is out of range: {exp}.")))?,
			),
			None => None,
		};

		Ok(Self { raw, expires_at })
	}

	/// Compact serialization, as sent in the `Authorization` header.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Expiry instant from the `exp` claim.
	pub fn expires_at(&self) -> Option<DateTime<Utc>> {
		self.expires_at
	}

	/// Whether the token is expired at `now`; a token is expired from its `exp` second onwards.
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		self.expires_at.is_some_and(|expires_at| now >= expires_at)
	}

	/// Whether the token is expired according to the wall clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(Utc::now())
	}

	/// Lifecycle state of a present token.
	pub fn state(&self) -> TokenState {
		if self.is_expired() { TokenState::Expired } else { TokenState::Valid }
	}
}

#[derive(Deserialize)]
struct Claims {
	#[serde(default)]
	exp: Option<f64>,
}

/// Lifecycle state of a cached token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
	/// Nothing cached, or the cached value could not be parsed.
	Absent,
	/// Present and not yet expired.
	Valid,
	/// Present but past its `exp` claim.
	Expired,
}

/// Which of the two cached tokens to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenSlot {
	/// Short-lived access token.
	Access,
	/// Longer-lived refresh token.
	Refresh,
}
impl TokenSlot {
	/// Logical cache key, also used as the TTL purpose key.
	pub fn key(self) -> &'static str {
		match self {
			Self::Access => ACCESS_TOKEN_KEY,
			Self::Refresh => REFRESH_TOKEN_KEY,
		}
	}

	/// TTL used when the cache configuration names none.
	pub fn default_ttl(self) -> Duration {
		match self {
			Self::Access => DEFAULT_ACCESS_TOKEN_TTL,
			Self::Refresh => DEFAULT_REFRESH_TOKEN_TTL,
		}
	}
}

/// Token pair returned by the token endpoint.
#[derive(Clone, Debug)]
pub struct TokenSet {
	/// Access token, compact serialization.
	pub access_token: String,
	/// Refresh token, compact serialization.
	pub refresh_token: String,
}
impl TokenSet {
	/// Decode a token endpoint response body.
	pub fn from_slice(body: &[u8]) -> Result<Self> {
		#[derive(Deserialize)]
		struct Raw {
			access_token: Option<String>,
			refresh_token: Option<String>,
		}

		let raw: Raw = serde_json::from_slice(body)?;

		Ok(Self {
			access_token: raw.access_token.ok_or(Error::MissingField("access_token"))?,
			refresh_token: raw.refresh_token.ok_or(Error::MissingField("refresh_token"))?,
		})
	}
}

/// Form body sent to [`TOKEN_ENDPOINT`].
#[derive(Clone, Copy, Debug)]
pub enum GrantRequest<'a> {
	/// Resource owner password grant.
	Password {
		/// Administrator username.
		username: &'a str,
		/// Administrator password.
		password: &'a str,
	},
	/// Refresh grant using a cached refresh token.
	RefreshToken(&'a str),
}
impl GrantRequest<'_> {
	/// Grant kind, for logging and metrics.
	pub fn grant(&self) -> Grant {
		match self {
			Self::Password { .. } => Grant::Password,
			Self::RefreshToken(_) => Grant::RefreshToken,
		}
	}

	/// Form fields in wire order.
	pub fn form(&self) -> Vec<(String, String)> {
		let grant_type = ("grant_type".to_string(), self.grant().as_str().to_string());
		let client_id = ("client_id".to_string(), ADMIN_CLIENT_ID.to_string());

		match self {
			Self::Password { username, password } => vec![
				("username".into(), (*username).into()),
				("password".into(), (*password).into()),
				client_id,
				grant_type,
			],
			Self::RefreshToken(token) =>
				vec![("refresh_token".into(), (*token).into()), client_id, grant_type],
		}
	}
}

/// Mint an HS256 token with the given `exp`, for tests.
#[cfg(test)]
pub(crate) fn mint_token(exp: Option<i64>) -> String {
	// crates.io
	use jsonwebtoken::{EncodingKey, Header};

	let claims = match exp {
		Some(exp) => serde_json::json!({ "sub": "admin", "exp": exp }),
		None => serde_json::json!({ "sub": "admin" }),
	};

	jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret"))
		.expect("token should encode")
}

#[cfg(test)]
mod tests {
	// crates.io
	use chrono::TimeDelta;
	// self
	use super::*;

	#[test]
	fn parses_exp_claim() {
		let exp = Utc::now().timestamp() + 300;
		let token = Token::parse(mint_token(Some(exp))).expect("token should parse");

		assert_eq!(token.expires_at().map(|at| at.timestamp()), Some(exp));
		assert_eq!(token.state(), TokenState::Valid);
	}

	#[test]
	fn expiry_is_inclusive_of_exp_second() {
		let exp = Utc::now().timestamp() + 60;
		let token = Token::parse(mint_token(Some(exp))).expect("token should parse");
		let at = DateTime::from_timestamp(exp, 0).unwrap();

		assert!(!token.is_expired_at(at - TimeDelta::seconds(1)));
		assert!(token.is_expired_at(at));
	}

	#[test]
	fn past_exp_is_expired() {
		let token =
			Token::parse(mint_token(Some(Utc::now().timestamp() - 10))).expect("token should parse");

		assert!(token.is_expired());
		assert_eq!(token.state(), TokenState::Expired);
	}

	#[test]
	fn missing_exp_never_expires() {
		let token = Token::parse(mint_token(None)).expect("token should parse");

		assert_eq!(token.expires_at(), None);
		assert!(!token.is_expired_at(DateTime::<Utc>::MAX_UTC));
	}

	#[test]
	fn malformed_tokens_are_rejected() {
		assert!(Token::parse("not-a-token").is_err());
		assert!(Token::parse("a.b").is_err());

		let token = mint_token(None);

		assert!(Token::parse(format!("{token}.extra")).is_err());
	}

	#[test]
	fn grant_forms_follow_wire_order() {
		let password = GrantRequest::Password { username: "admin", password: "secret" };
		let keys: Vec<_> = password.form().into_iter().map(|(key, _)| key).collect();

		assert_eq!(keys, ["username", "password", "client_id", "grant_type"]);
		assert_eq!(password.grant(), Grant::Password);

		let refresh = GrantRequest::RefreshToken("r1").form();

		assert_eq!(refresh[0], ("refresh_token".into(), "r1".into()));
		assert_eq!(refresh[1], ("client_id".into(), "admin-cli".into()));
		assert_eq!(refresh[2], ("grant_type".into(), "refresh_token".into()));
	}

	#[test]
	fn token_set_requires_both_tokens() {
		let set = TokenSet::from_slice(br#"{"access_token":"a","refresh_token":"r","expires_in":60}"#)
			.expect("token set should decode");

		assert_eq!(set.access_token, "a");
		assert!(matches!(
			TokenSet::from_slice(br#"{"access_token":"a"}"#),
			Err(Error::MissingField("refresh_token"))
		));
		assert!(matches!(TokenSet::from_slice(b"<html>"), Err(Error::Serde(_))));
	}
}
