//! Cache identities derived from API credentials.

// std
use std::borrow::Borrow;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Key that selects the token cache slot for one configured API account.
///
/// A stored credential's opaque `id` is used when the host provides one; otherwise the key
/// collapses to `apiUrl:clientId`. Equal credentials always yield equal keys.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);
impl IdentityKey {
	/// Builds the key for a credential set.
	pub fn new(id: Option<&str>, api_url: &str, client_id: &str) -> Self {
		match id {
			Some(id) => Self(id.to_owned()),
			None => Self(format!("{api_url}:{client_id}")),
		}
	}

	/// Returns the raw key.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Stable digest of the key, safe to attach to spans and metrics.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());

		STANDARD_NO_PAD.encode(digest)
	}
}
impl AsRef<str> for IdentityKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for IdentityKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for IdentityKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "IdentityKey({})", self.0)
	}
}
impl Display for IdentityKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
