//! Authorized HTTP client with cached token lifecycle.

// crates.io
use http::{HeaderMap, HeaderValue, Method, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	cache::manager::CacheManager,
	config::Credentials,
	http::{
		token::{GrantRequest, TOKEN_ENDPOINT, Token, TokenSet, TokenSlot, TokenState},
		transport::{Body, RequestOptions, Transport, TransportRequest, TransportResponse},
	},
	metrics::{self, ClientMetrics, Grant},
};

/// HTTP client that attaches a bearer token to every request.
///
/// Tokens live in the cache manager under the `access_token` and `refresh_token` keys, so clients
/// sharing a store and prefix share one session. Renewal prefers the refresh grant and falls back
/// to the password grant when it fails.
#[derive(Clone, Debug)]
pub struct Client {
	credentials: Arc<Credentials>,
	transport: Arc<dyn Transport>,
	cache: CacheManager,
}
impl Client {
	/// Build a client from credentials, a transport, and a cache manager.
	pub fn new(credentials: Credentials, transport: Arc<dyn Transport>, cache: CacheManager) -> Self {
		Self { credentials: Arc::new(credentials), transport, cache }
	}

	/// Credentials used for the password grant.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Cache manager holding the tokens.
	pub fn cache(&self) -> &CacheManager {
		&self.cache
	}

	/// Underlying transport.
	pub fn transport(&self) -> &Arc<dyn Transport> {
		&self.transport
	}

	/// Per-client counters, shared with the cache manager.
	pub fn metrics(&self) -> Arc<ClientMetrics> {
		self.cache.metrics()
	}

	/// Whether a cached, unexpired access token exists.
	///
	/// Never contacts the server.
	pub async fn is_authorized(&self) -> Result<bool> {
		Ok(self.token_state(TokenSlot::Access).await? == TokenState::Valid)
	}

	/// Lifecycle state of one of the cached tokens.
	pub async fn token_state(&self, slot: TokenSlot) -> Result<TokenState> {
		Ok(match self.cached_token(slot).await? {
			Some(token) => token.state(),
			None => TokenState::Absent,
		})
	}

	/// Send an authorized request to `path`, relative to the base URL.
	///
	/// Caller headers are layered over the bearer header: unrelated headers keep it, an explicit
	/// `Authorization` header replaces it.
	#[tracing::instrument(skip(self, options), fields(prefix = %self.cache.prefix()))]
	pub async fn request(
		&self,
		method: Method,
		path: &str,
		options: RequestOptions,
	) -> Result<TransportResponse> {
		let access = match self.cached_token(TokenSlot::Access).await? {
			Some(token) if !token.is_expired() => token,
			_ => self.authorize().await?,
		};
		let mut bearer = HeaderValue::from_str(&format!("Bearer {}", access.as_str()))?;

		bearer.set_sensitive(true);

		let mut base = HeaderMap::new();

		base.insert(AUTHORIZATION, bearer);

		let url = self.credentials.endpoint(path)?;
		let options = options.merge_over(base);

		self.cache.metrics().record_request();
		metrics::record_request(self.cache.prefix());

		self.transport.send(TransportRequest { method, url, options }).await
	}

	/// Remove both cached tokens, forcing the next request to re-authorize.
	pub async fn clear_tokens(&self) -> Result<bool> {
		let access = self.cache.delete(TokenSlot::Access.key()).await?;
		let refresh = self.cache.delete(TokenSlot::Refresh.key()).await?;

		tracing::debug!(prefix = self.cache.prefix(), "cleared cached tokens");

		Ok(access && refresh)
	}

	async fn cached_token(&self, slot: TokenSlot) -> Result<Option<Token>> {
		let Some(raw) = self.cache.get_value::<String>(slot.key()).await? else {
			return Ok(None);
		};

		match Token::parse(raw) {
			Ok(token) => Ok(Some(token)),
			Err(err) => {
				tracing::warn!(slot = slot.key(), error = %err, "ignoring unparseable cached token");

				Ok(None)
			},
		}
	}

	/// Obtain a fresh token pair and store it, returning the new access token.
	///
	/// Only a failed refresh exchange falls back to the password grant; an undecodable token
	/// response is returned as is.
	#[tracing::instrument(skip(self), fields(prefix = %self.cache.prefix()))]
	async fn authorize(&self) -> Result<Token> {
		let refresh = match self.cached_token(TokenSlot::Refresh).await? {
			Some(token) if !token.is_expired() => Some(token),
			_ => None,
		};
		let (grant, response) = match refresh {
			Some(refresh) => match self.send_grant(GrantRequest::RefreshToken(refresh.as_str())).await
			{
				Ok(response) => (Grant::RefreshToken, response),
				Err(err) => {
					tracing::warn!(error = %err, "refresh grant failed; falling back to password grant");

					self.cache.metrics().record_refresh_fallback();

					(Grant::Password, self.send_grant(self.password_grant()).await?)
				},
			},
			None => (Grant::Password, self.send_grant(self.password_grant()).await?),
		};
		let tokens = self.decode_grant(grant, &response)?;

		self.store(TokenSlot::Refresh, &tokens.refresh).await?;
		self.store(TokenSlot::Access, &tokens.access).await?;

		Ok(tokens.access)
	}

	fn password_grant(&self) -> GrantRequest<'_> {
		GrantRequest::Password {
			username: self.credentials.username(),
			password: self.credentials.password(),
		}
	}

	async fn send_grant(&self, request: GrantRequest<'_>) -> Result<TransportResponse> {
		let url = self.credentials.endpoint(TOKEN_ENDPOINT)?;
		let options = RequestOptions::new().with_body(Body::Form(request.form()));

		tracing::debug!(grant = request.grant().as_str(), "requesting tokens");

		let result =
			self.transport.send(TransportRequest { method: Method::POST, url, options }).await;

		if result.is_err() {
			self.observe_grant(request.grant(), false);
		}

		result
	}

	fn decode_grant(&self, grant: Grant, response: &TransportResponse) -> Result<ParsedTokens> {
		let result = TokenSet::from_slice(&response.body).and_then(|tokens| {
			Ok(ParsedTokens {
				access: Token::parse(tokens.access_token)?,
				refresh: Token::parse(tokens.refresh_token)?,
			})
		});

		self.observe_grant(grant, result.is_ok());

		result
	}

	async fn store(&self, slot: TokenSlot, token: &Token) -> Result<()> {
		let ttl = self.cache.ttl(slot.key(), Some(slot.default_ttl()));

		self.cache.set(slot.key(), token.as_str(), ttl).await?;

		Ok(())
	}

	fn observe_grant(&self, grant: Grant, success: bool) {
		if success {
			self.cache.metrics().record_grant(grant);
		}

		metrics::record_token_grant(self.cache.prefix(), grant, success);
	}
}

struct ParsedTokens {
	access: Token,
	refresh: Token,
}
