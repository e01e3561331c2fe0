//! Refresh timings applied by the token cache.

// self
use crate::_prelude::*;

/// Timing knobs applied by a [`TokenCache`](crate::cache::TokenCache).
///
/// Negative durations are clamped to zero by every setter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
	refresh_margin: Duration,
	skew_buffer: Duration,
	exchange_timeout: Duration,
}
impl RefreshPolicy {
	/// Default window before expiry in which a token is no longer handed out.
	pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::seconds(60);
	/// Default amount subtracted from the issuer's `expires_in` to absorb clock drift.
	pub const DEFAULT_SKEW_BUFFER: Duration = Duration::seconds(10);
	/// Default upper bound for a single token-endpoint exchange.
	pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::seconds(30);

	/// Window before `expires_at` in which the cache refreshes instead of serving the token.
	pub fn refresh_margin(&self) -> Duration {
		self.refresh_margin
	}

	/// Amount subtracted from `expires_in` when computing `expires_at`.
	pub fn skew_buffer(&self) -> Duration {
		self.skew_buffer
	}

	/// Upper bound for one exchange, request and response body included.
	pub fn exchange_timeout(&self) -> Duration {
		self.exchange_timeout
	}

	/// Overrides the refresh margin (defaults to 60 seconds).
	pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
		self.refresh_margin = non_negative(margin);

		self
	}

	/// Overrides the skew buffer (defaults to 10 seconds).
	pub fn with_skew_buffer(mut self, skew: Duration) -> Self {
		self.skew_buffer = non_negative(skew);

		self
	}

	/// Overrides the exchange timeout (defaults to 30 seconds).
	pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
		self.exchange_timeout = non_negative(timeout);

		self
	}
}
impl Default for RefreshPolicy {
	fn default() -> Self {
		Self {
			refresh_margin: Self::DEFAULT_REFRESH_MARGIN,
			skew_buffer: Self::DEFAULT_SKEW_BUFFER,
			exchange_timeout: Self::DEFAULT_EXCHANGE_TIMEOUT,
		}
	}
}

fn non_negative(value: Duration) -> Duration {
	if value.is_negative() { Duration::ZERO } else { value }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_gateway_timings() {
		let policy = RefreshPolicy::default();

		assert_eq!(policy.refresh_margin(), Duration::seconds(60));
		assert_eq!(policy.skew_buffer(), Duration::seconds(10));
		assert_eq!(policy.exchange_timeout(), Duration::seconds(30));
	}

	#[test]
	fn negative_overrides_clamp_to_zero() {
		let policy = RefreshPolicy::default()
			.with_refresh_margin(Duration::seconds(-5))
			.with_skew_buffer(Duration::seconds(-1))
			.with_exchange_timeout(Duration::milliseconds(250));

		assert_eq!(policy.refresh_margin(), Duration::ZERO);
		assert_eq!(policy.skew_buffer(), Duration::ZERO);
		assert_eq!(policy.exchange_timeout(), Duration::milliseconds(250));
	}
}
