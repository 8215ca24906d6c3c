//! The broker facade: token acquisition, authorized dispatch, and operation execution.
//!
//! A [`Broker`] owns the transport, the token cache, and the binary packager. Every clone
//! shares the same cache and the same per-identity login guards, so concurrent callers
//! with the same credentials trigger at most one login.

mod authenticate;
mod dispatch;
mod metrics;

pub use authenticate::LOGIN_PATH;
pub use metrics::LoginMetrics;

// self
use crate::{
	_prelude::*,
	auth::{DEFAULT_TOKEN_VALIDITY, IdentityKey},
	binary::{BinaryPackager, InlineBinaryPackager},
	store::TokenStore,
	transport::ApiHttpClient,
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport.
pub type ReqwestBroker = Broker<ReqwestHttpClient>;

/// Coordinates logins, the token cache, and API calls for any number of credentials.
pub struct Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client used for logins and API calls.
	pub http_client: Arc<C>,
	/// Token cache keyed by credential identity.
	pub store: Arc<dyn TokenStore>,
	/// Host packager for downloaded payloads.
	pub packager: Arc<dyn BinaryPackager>,
	/// How long a freshly issued token is trusted.
	pub token_validity: Duration,
	/// Shared login counters.
	pub login_metrics: Arc<LoginMetrics>,
	login_guards: Arc<Mutex<HashMap<IdentityKey, Arc<AsyncMutex<()>>>>>,
}
impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a broker around a caller-provided transport.
	pub fn with_http_client(store: Arc<dyn TokenStore>, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			packager: Arc::new(InlineBinaryPackager),
			token_validity: DEFAULT_TOKEN_VALIDITY,
			login_metrics: Default::default(),
			login_guards: Default::default(),
		}
	}

	/// Replaces the binary packager (defaults to [`InlineBinaryPackager`]).
	pub fn with_packager(mut self, packager: Arc<dyn BinaryPackager>) -> Self {
		self.packager = packager;

		self
	}

	/// Overrides how long new tokens are trusted (defaults to 55 minutes).
	///
	/// Negative values are clamped to zero, which disables reuse.
	pub fn with_token_validity(mut self, validity: Duration) -> Self {
		self.token_validity = if validity.is_negative() { Duration::ZERO } else { validity };

		self
	}

	/// Returns (and creates on demand) the single-flight guard for an identity.
	fn login_guard(&self, key: &IdentityKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.login_guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient> {
	/// Creates a broker with its own reqwest transport.
	pub fn new(store: Arc<dyn TokenStore>) -> Self {
		Self::with_http_client(store, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			packager: self.packager.clone(),
			token_validity: self.token_validity,
			login_metrics: self.login_metrics.clone(),
			login_guards: self.login_guards.clone(),
		}
	}
}
impl<C> Debug for Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("token_validity", &self.token_validity)
			.field("login_metrics", &self.login_metrics)
			.finish()
	}
}
