//! Process-wide access token cache with proactive, single-flight refresh.
//!
//! [`TokenCache::valid_token`] serves the cached token from a shared read lock while it is
//! outside the refresh margin. Otherwise callers queue on one async guard; the first performs
//! the `client_credentials` exchange and everyone queued behind it reuses that outcome, whether
//! it produced a token or an error, instead of stampeding the token endpoint.

pub mod metrics;
pub mod policy;

pub use metrics::*;
pub use policy::*;

// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, TokenState, TokenStatus},
	clock::{Clock, SystemClock},
	error::FetchError,
	http::TokenHttpClient,
	oauth,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ClientCredentials,
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Cache specialized for the crate's default reqwest transport.
pub type ReqwestTokenCache = TokenCache<ReqwestHttpClient>;

/// Owns the access token for one set of client credentials.
///
/// Share it behind an `Arc`; every clone of the [`BearerInterceptor`](crate::intercept::BearerInterceptor)
/// that wraps it sees the same token.
pub struct TokenCache<C>
where
	C: ?Sized + TokenHttpClient,
{
	http_client: Arc<C>,
	credentials: ClientCredentials,
	policy: RefreshPolicy,
	clock: Arc<dyn Clock>,
	metrics: Arc<ExchangeMetrics>,
	state: RwLock<TokenState>,
	refresh_guard: AsyncMutex<()>,
}
impl<C> TokenCache<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates an empty cache that exchanges through the caller-provided transport.
	pub fn with_http_client(credentials: ClientCredentials, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			credentials,
			policy: RefreshPolicy::default(),
			clock: Arc::new(SystemClock),
			metrics: Default::default(),
			state: Default::default(),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Replaces the refresh policy.
	pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Replaces the time source used for freshness decisions and expiry computation.
	pub fn with_clock<K>(mut self, clock: K) -> Self
	where
		K: 'static + Clock,
	{
		self.clock = Arc::new(clock);

		self
	}

	/// Credentials this cache exchanges.
	pub fn credentials(&self) -> &ClientCredentials {
		&self.credentials
	}

	/// Refresh policy in effect.
	pub fn policy(&self) -> RefreshPolicy {
		self.policy
	}

	/// Counters describing how callers were served.
	pub fn metrics(&self) -> Arc<ExchangeMetrics> {
		self.metrics.clone()
	}

	/// Returns a token usable as a bearer credential, refreshing it first when it is missing,
	/// expired, or inside the refresh margin.
	///
	/// At most one exchange runs at a time. A caller that waited while another caller
	/// exchanged gets that exchange's outcome: the fresh token, or
	/// [`Error::TokenUnavailable`] carrying the same shared [`FetchError`].
	pub async fn valid_token(&self) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::TokenLookup;

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let observed_generation = {
			let state = self.state.read();

			if let Some(token) = state.usable_token_at(self.clock.now(), self.policy.refresh_margin())
			{
				self.metrics.record_cache_hit();
				obs::record_flow_outcome(KIND, FlowOutcome::CacheHit);

				return Ok(token.clone());
			}

			state.generation()
		};
		let span = FlowSpan::new(KIND, "valid_token");
		let result = span.instrument(self.refresh_after(observed_generation)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Returns the cached token if it may be handed out now, without any I/O.
	pub fn cached_token(&self) -> Option<TokenSecret> {
		self.state.read().usable_token_at(self.clock.now(), self.policy.refresh_margin()).cloned()
	}

	/// Freshness of the cached token at the current instant.
	pub fn status(&self) -> TokenStatus {
		self.state.read().status_at(self.clock.now(), self.policy.refresh_margin())
	}

	/// Copy of the current state (token redacted in `Debug`).
	pub fn snapshot(&self) -> TokenState {
		self.state.read().clone()
	}

	/// Drops the cached token so the next caller exchanges again.
	///
	/// Intended for downstream `401` responses that reject a token the cache still considers
	/// fresh.
	pub fn invalidate(&self) {
		self.state.write().clear();
	}

	async fn refresh_after(&self, observed_generation: u64) -> Result<TokenSecret> {
		let _singleflight = self.refresh_guard.lock().await;

		{
			let state = self.state.read();

			if let Some(token) = state.usable_token_at(self.clock.now(), self.policy.refresh_margin())
			{
				self.metrics.record_shared();
				obs::record_flow_outcome(FlowKind::TokenLookup, FlowOutcome::Shared);

				return Ok(token.clone());
			}
			// A newer generation means the exchange we queued behind has finished; its outcome is
			// ours even when the token it stored is already inside the refresh margin.
			if state.generation() != observed_generation {
				let shared = match (state.access_token(), state.last_failure()) {
					(Some(token), _) => Some(Ok(token.clone())),
					(None, Some(cause)) => Some(Err(Error::token_unavailable(cause.clone()))),
					(None, None) => None,
				};

				if let Some(outcome) = shared {
					self.metrics.record_shared();
					obs::record_flow_outcome(FlowKind::TokenLookup, FlowOutcome::Shared);

					return outcome;
				}
			}
		}

		self.exchange().await
	}

	/// Runs one exchange and folds its outcome into the state. Callers must hold the guard.
	async fn exchange(&self) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::TokenExchange;

		let timeout = self.policy.exchange_timeout();

		self.metrics.record_attempt();
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		obs::exchange_started(&self.credentials.token_endpoint, self.state.read().generation());

		let outcome = match tokio::time::timeout(
			timeout.unsigned_abs(),
			oauth::exchange_client_credentials(
				self.http_client.as_ref(),
				&self.credentials,
				self.clock.as_ref(),
			),
		)
		.await
		{
			Ok(result) => result,
			Err(_) => Err(FetchError::Timeout { after: timeout }),
		};

		match outcome {
			Ok(response) => {
				let received_at = self.clock.now();
				let expires_in = response.expires_in;
				let (token, expires_at) = {
					let mut state = self.state.write();
					let token = state.store(response, received_at, self.policy.skew_buffer());

					(token, state.expires_at())
				};

				self.metrics.record_success();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				obs::exchange_succeeded(expires_at, expires_in);

				Ok(token)
			},
			Err(e) => {
				let cause = Arc::new(e);

				self.state.write().fail(cause.clone());
				self.metrics.record_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				obs::exchange_failed(&cause);

				Err(Error::token_unavailable(cause))
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl TokenCache<ReqwestHttpClient> {
	/// Creates an empty cache backed by a reqwest transport that does not follow redirects.
	pub fn new(credentials: ClientCredentials) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(credentials, ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for TokenCache<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("credentials", &self.credentials)
			.field("policy", &self.policy)
			.field("state", &*self.state.read())
			.finish()
	}
}
