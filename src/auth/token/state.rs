//! Cached access token state and its freshness rules.

// self
use crate::{
	_prelude::*,
	auth::token::{response::TokenResponse, secret::TokenSecret},
	error::FetchError,
};

/// Freshness of the cached token at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// No token has been fetched, or the last exchange failed.
	Absent,
	/// Token is usable; the refresh margin has not been reached.
	Fresh,
	/// Token is inside the refresh margin; it still works downstream but will not be handed out.
	Stale,
	/// Token exceeded its expiry instant.
	Expired,
}

/// Access token and expiry shared by every caller of one
/// [`TokenCache`](crate::cache::TokenCache).
///
/// The token and its expiry always travel together; readers take both under one lock so they
/// never pair a new token with an old expiry.
#[derive(Clone)]
pub struct TokenState {
	access_token: Option<TokenSecret>,
	expires_at: OffsetDateTime,
	generation: u64,
	last_failure: Option<Arc<FetchError>>,
}
impl TokenState {
	/// Expiry sentinel used while no token is cached.
	pub const NEVER_FETCHED: OffsetDateTime = time::PrimitiveDateTime::MIN.assume_utc();

	/// Cached access token, if any.
	pub fn access_token(&self) -> Option<&TokenSecret> {
		self.access_token.as_ref()
	}

	/// Instant after which the token must not be used.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Number of completed exchange attempts folded into this state.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Cause of the most recent exchange, if it failed.
	pub fn last_failure(&self) -> Option<&Arc<FetchError>> {
		self.last_failure.as_ref()
	}

	/// Returns the token only if it may be handed out at `now`.
	///
	/// A token is usable while `now < expires_at - margin`; a deadline that cannot be
	/// represented counts as stale.
	pub fn usable_token_at(&self, now: OffsetDateTime, margin: Duration) -> Option<&TokenSecret> {
		let token = self.access_token.as_ref()?;
		let deadline = self.expires_at.checked_sub(margin)?;

		(now < deadline).then_some(token)
	}

	/// Computes the freshness status at `now`.
	pub fn status_at(&self, now: OffsetDateTime, margin: Duration) -> TokenStatus {
		if self.access_token.is_none() {
			return TokenStatus::Absent;
		}
		if now >= self.expires_at {
			return TokenStatus::Expired;
		}
		if self.usable_token_at(now, margin).is_some() {
			return TokenStatus::Fresh;
		}

		TokenStatus::Stale
	}

	/// Folds a successful response into the state and returns the new token.
	///
	/// The expiry is `received_at + expires_in - skew`, clamped so it never precedes
	/// `received_at`.
	pub(crate) fn store(
		&mut self,
		response: TokenResponse,
		received_at: OffsetDateTime,
		skew: Duration,
	) -> TokenSecret {
		let lifetime = (response.lifetime() - skew).max(Duration::ZERO);

		self.expires_at = received_at
			.checked_add(lifetime)
			.unwrap_or(time::PrimitiveDateTime::MAX.assume_utc());
		self.access_token = Some(response.access_token.clone());
		self.generation = self.generation.wrapping_add(1);
		self.last_failure = None;

		response.access_token
	}

	/// Clears the token after a failed exchange and remembers the cause.
	pub(crate) fn fail(&mut self, cause: Arc<FetchError>) {
		self.clear();
		self.generation = self.generation.wrapping_add(1);
		self.last_failure = Some(cause);
	}

	/// Drops the cached token without recording an exchange.
	pub(crate) fn clear(&mut self) {
		self.access_token = None;
		self.expires_at = Self::NEVER_FETCHED;
	}
}
impl Default for TokenState {
	fn default() -> Self {
		Self {
			access_token: None,
			expires_at: Self::NEVER_FETCHED,
			generation: 0,
			last_failure: None,
		}
	}
}
impl Debug for TokenState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenState")
			.field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at)
			.field("generation", &self.generation)
			.field("last_failure", &self.last_failure)
			.finish()
	}
}
