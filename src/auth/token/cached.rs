//! Cached bearer token entries and their validity checks.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Conservative lifetime assumed for tokens minted by the login endpoint.
///
/// The server is believed to issue 60-minute tokens; five minutes are held back so a token
/// is never presented right at its edge.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::minutes(55);

/// Bearer token plus the instant after which it is no longer trusted.
///
/// Entries are replaced as a whole; neither field is ever updated on its own.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Bearer token issued by the login endpoint.
	pub token: TokenSecret,
	/// Expiry instant computed when the token was stored.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Creates an entry with an absolute expiry.
	pub fn new(token: TokenSecret, expires_at: OffsetDateTime) -> Self {
		Self { token, expires_at }
	}

	/// Creates an entry that stays valid for `validity` after `issued_at`.
	pub fn issued_at(token: TokenSecret, issued_at: OffsetDateTime, validity: Duration) -> Self {
		Self::new(token, issued_at + validity)
	}

	/// Returns `true` if the token may still be presented at `instant`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at > instant
	}

	/// Returns `true` if the token may still be presented now.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
