//! Storage contracts and the built-in in-memory token cache.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, IdentityKey},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Token cache contract shared by every broker call site.
///
/// Stores never evict and never inspect expiry; callers decide whether an entry is still
/// usable. A `put` replaces the whole entry for its key.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Fetches the entry cached for `key`, if present.
	fn get<'a>(&'a self, key: &'a IdentityKey) -> StoreFuture<'a, Option<CachedToken>>;

	/// Stores or replaces the entry for `key`.
	fn put(&self, key: IdentityKey, token: CachedToken) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
