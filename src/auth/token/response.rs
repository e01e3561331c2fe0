//! Token endpoint response shape.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Successful token-endpoint payload: `{"access_token": "...", "expires_in": 3600}`.
///
/// Unknown fields are ignored; `token_type` is kept only for diagnostics because every token
/// is presented as a bearer credential.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
	/// Issued access token.
	pub access_token: TokenSecret,
	/// Advertised lifetime in seconds.
	pub expires_in: u64,
	/// Token type echoed by the endpoint, usually `Bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
}
impl TokenResponse {
	/// Advertised lifetime as a [`Duration`], saturating at `i64::MAX` seconds.
	pub fn lifetime(&self) -> Duration {
		Duration::seconds(i64::try_from(self.expires_in).unwrap_or(i64::MAX))
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("token_type", &self.token_type)
			.finish()
	}
}
