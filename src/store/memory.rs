//! Thread-safe in-memory [`TokenStore`] kept for the lifetime of the process.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, IdentityKey},
	store::{StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<IdentityKey, CachedToken>>>;

/// Process-wide token cache.
///
/// Build one per service instance and share it by `Arc`; clones observe the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of cached identities, expired or not.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if nothing has been cached yet.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn get_now(map: StoreMap, key: IdentityKey) -> Option<CachedToken> {
		map.read().get(&key).cloned()
	}

	fn put_now(map: StoreMap, key: IdentityKey, token: CachedToken) {
		map.write().insert(key, token);
	}
}
impl TokenStore for MemoryStore {
	fn get<'a>(&'a self, key: &'a IdentityKey) -> StoreFuture<'a, Option<CachedToken>> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::get_now(map, key)) })
	}

	fn put(&self, key: IdentityKey, token: CachedToken) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::put_now(map, key, token);

			Ok(())
		})
	}
}
