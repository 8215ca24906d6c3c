//! Host credential lookup.

// self
use crate::{_prelude::*, auth::ApiCredentials};

/// Name under which hosts register QAction API credentials.
pub const CREDENTIAL_NAME: &str = "qActionApi";

/// Boxed future returned by [`CredentialSource::credentials`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Option<ApiCredentials>>> + 'a + Send>>;

/// Host capability that resolves a credential name to stored credentials.
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Looks up the credentials registered under `name`; `None` when nothing is stored.
	fn credentials<'a>(&'a self, name: &'a str) -> CredentialFuture<'a>;
}

/// Fixed in-process credential table.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials(HashMap<String, ApiCredentials>);
impl StaticCredentials {
	/// Registers `credentials` under `name`, replacing any previous entry.
	pub fn with(mut self, name: impl Into<String>, credentials: ApiCredentials) -> Self {
		self.0.insert(name.into(), credentials);

		self
	}

	/// Table holding a single entry under [`CREDENTIAL_NAME`].
	pub fn single(credentials: ApiCredentials) -> Self {
		Self::default().with(CREDENTIAL_NAME, credentials)
	}
}
impl CredentialSource for StaticCredentials {
	fn credentials<'a>(&'a self, name: &'a str) -> CredentialFuture<'a> {
		Box::pin(async move { Ok(self.0.get(name).cloned()) })
	}
}
