//! Token acquisition: cache lookup, single-flight login, and credential tests.
//!
//! The login endpoint answers with the raw token as its body. Tokens are cached under the
//! credential's [`IdentityKey`] for the broker's validity window and are never refreshed
//! early; an expired entry is simply replaced by the next login.

// crates.io
use http::HeaderValue;
// self
use crate::{
	_prelude::*,
	auth::{ApiCredentials, CachedToken, TokenSecret},
	broker::Broker,
	error::{AuthenticationError, ConfigError},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	request::join_url,
	transport::{ApiHttpClient, HttpRequest},
};

/// Path of the login endpoint, relative to the credential's API URL.
pub const LOGIN_PATH: &str = "/api/v1/authentication/login";

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Returns a valid bearer token for `credentials`, logging in only when the cache has none.
	///
	/// Concurrent calls for the same identity wait on one another; the first performs the
	/// login and the rest reuse its token. Failed logins leave the cache untouched.
	pub async fn get_token(&self, credentials: &ApiCredentials) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::Login;

		let key = credentials.identity_key();
		let span = FlowSpan::new(KIND, "get_token", &key);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let guard = self.login_guard(&key);
				let _singleflight = guard.lock().await;
				let now = OffsetDateTime::now_utc();

				if let Some(cached) =
					self.store.get(&key).await?.filter(|cached| cached.is_valid_at(now))
				{
					obs::record_token_lookup(true);
					self.login_metrics.record_cache_hit();

					return Ok(cached.token);
				}

				obs::record_token_lookup(false);

				let token = self.login(credentials).await?;
				let cached = CachedToken::issued_at(
					token.clone(),
					OffsetDateTime::now_utc(),
					self.token_validity,
				);

				self.store.put(key.clone(), cached).await?;

				Ok(token)
			})
			.await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	/// Performs one login without reading or writing the cache.
	pub async fn test_credentials(&self, credentials: &ApiCredentials) -> Result<()> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "test_credentials", &credentials.identity_key());

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(async { self.login(credentials).await.map(|_| ()) }).await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	async fn login(&self, credentials: &ApiCredentials) -> Result<TokenSecret> {
		self.login_metrics.record_login();

		let result = self.request_token(credentials).await;

		if result.is_err() {
			self.login_metrics.record_failure();
		}

		result
	}

	async fn request_token(&self, credentials: &ApiCredentials) -> Result<TokenSecret> {
		let request = login_request(credentials)?;
		let response =
			self.http_client.execute(request).await.map_err(AuthenticationError::network)?;
		let status = response.status();

		if !status.is_success() {
			return Err(AuthenticationError::rejected(status.as_u16(), response.body()).into());
		}

		Ok(parse_token(response.body())?)
	}
}

fn login_request(credentials: &ApiCredentials) -> Result<HttpRequest, ConfigError> {
	let url = join_url(&credentials.api_url, LOGIN_PATH);
	let client_id = HeaderValue::from_str(&credentials.client_id)
		.map_err(|source| ConfigError::InvalidHeader { name: "x-client-id", source })?;
	let api_key = credentials
		.api_key
		.to_header_value(None)
		.map_err(|source| ConfigError::InvalidHeader { name: "x-api-key", source })?;

	Ok(http::Request::builder()
		.method(http::Method::POST)
		.uri(url)
		.header("x-client-id", client_id)
		.header("x-api-key", api_key)
		.body(Vec::new())?)
}

fn parse_token(body: &[u8]) -> Result<TokenSecret, AuthenticationError> {
	let text = std::str::from_utf8(body)
		.map_err(|_| AuthenticationError::MalformedToken { reason: "login response is not UTF-8" })?;
	let token = text.trim();

	if token.is_empty() {
		return Err(AuthenticationError::MalformedToken { reason: "login response is empty" });
	}
	if !token.bytes().all(|byte| byte.is_ascii_graphic()) {
		return Err(AuthenticationError::MalformedToken {
			reason: "login response is not a printable token",
		});
	}

	Ok(TokenSecret::new(token))
}
