//! QAction API credentials as supplied by the host, plus validation.

// self
use crate::{
	_prelude::*,
	auth::{identity::IdentityKey, token::secret::TokenSecret},
	error::ConfigError,
};

/// API URL used when the host leaves `apiUrl` unset.
pub const DEFAULT_API_URL: &str = "https://api.qaction.com";

/// Validated credentials for one QAction API account.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
	/// Base URL of the QAction environment.
	pub api_url: Url,
	/// Client identifier sent as `X-Client-Id`.
	pub client_id: String,
	/// API key sent as `X-API-Key`.
	pub api_key: TokenSecret,
	/// Opaque identifier of the stored credential instance, when the host has one.
	pub id: Option<String>,
}
impl ApiCredentials {
	/// Returns a builder for the given client identifier and API key.
	pub fn builder(
		client_id: impl Into<String>,
		api_key: impl Into<String>,
	) -> ApiCredentialsBuilder {
		ApiCredentialsBuilder::new(client_id, api_key)
	}

	/// Decodes and validates host credential JSON (`apiUrl`, `clientId`, `apiKey`, `id`).
	pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
		let raw: RawCredentials = serde_path_to_error::deserialize(value)
			.map_err(|source| ConfigError::Decode { what: "credentials", source })?;

		raw.validate()
	}

	/// Decodes and validates host credential JSON from raw bytes.
	pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_slice(bytes);
		let raw: RawCredentials = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::Decode { what: "credentials", source })?;

		raw.validate()
	}

	/// Cache slot for these credentials.
	pub fn identity_key(&self) -> IdentityKey {
		IdentityKey::new(self.id.as_deref(), self.api_url.as_str(), &self.client_id)
	}
}
impl Debug for ApiCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiCredentials")
			.field("api_url", &self.api_url.as_str())
			.field("client_id", &self.client_id)
			.field("api_key", &"<redacted>")
			.field("id", &self.id)
			.finish()
	}
}

/// Builder for [`ApiCredentials`].
#[derive(Clone, Debug)]
pub struct ApiCredentialsBuilder {
	api_url: String,
	client_id: String,
	api_key: TokenSecret,
	id: Option<String>,
}
impl ApiCredentialsBuilder {
	fn new(client_id: impl Into<String>, api_key: impl Into<String>) -> Self {
		Self {
			api_url: DEFAULT_API_URL.into(),
			client_id: client_id.into(),
			api_key: TokenSecret::new(api_key),
			id: None,
		}
	}

	/// Overrides the API URL (defaults to [`DEFAULT_API_URL`]).
	pub fn api_url(mut self, url: impl Into<String>) -> Self {
		self.api_url = url.into();

		self
	}

	/// Sets the stored credential identifier.
	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());

		self
	}

	/// Consumes the builder and validates the resulting credentials.
	pub fn build(self) -> Result<ApiCredentials, ConfigError> {
		RawCredentials {
			api_url: self.api_url,
			client_id: self.client_id,
			api_key: self.api_key,
			id: self.id.map(CredentialId::Text),
		}
		.validate()
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredentials {
	#[serde(default = "default_api_url")]
	api_url: String,
	client_id: String,
	api_key: TokenSecret,
	#[serde(default)]
	id: Option<CredentialId>,
}
impl RawCredentials {
	fn validate(self) -> Result<ApiCredentials, ConfigError> {
		let raw_url = self.api_url.trim();
		let api_url = Url::parse(raw_url)
			.map_err(|source| ConfigError::InvalidApiUrl { url: raw_url.to_owned(), source })?;

		if api_url.scheme() != "https" {
			return Err(ConfigError::InsecureApiUrl { url: api_url.to_string() });
		}
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingField { field: "clientId" });
		}
		if self.api_key.expose().trim().is_empty() {
			return Err(ConfigError::MissingField { field: "apiKey" });
		}

		let id = self.id.map(CredentialId::into_string).filter(|id| !id.is_empty());

		Ok(ApiCredentials { api_url, client_id: self.client_id, api_key: self.api_key, id })
	}
}

// Hosts hand out either string or numeric credential ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialId {
	Text(String),
	Number(u64),
}
impl CredentialId {
	fn into_string(self) -> String {
		match self {
			Self::Text(text) => text,
			Self::Number(number) => number.to_string(),
		}
	}
}

fn default_api_url() -> String {
	DEFAULT_API_URL.into()
}
