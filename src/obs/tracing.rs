// self
use crate::{_prelude::*, error::FetchError, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by the cache and the interceptor.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("gateway_bearer.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs the start of an exchange.
pub(crate) fn exchange_started(token_endpoint: &Url, generation: u64) {
	#[cfg(feature = "tracing")]
	tracing::debug!(%token_endpoint, generation, "requesting access token");
	#[cfg(not(feature = "tracing"))]
	let _ = (token_endpoint, generation);
}

/// Logs a stored token. The token value itself is never logged.
pub(crate) fn exchange_succeeded(expires_at: OffsetDateTime, expires_in: u64) {
	#[cfg(feature = "tracing")]
	tracing::info!(%expires_at, expires_in, "access token refreshed");
	#[cfg(not(feature = "tracing"))]
	let _ = (expires_at, expires_in);
}

/// Logs a failed exchange; the cached token has already been cleared.
pub(crate) fn exchange_failed(error: &FetchError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %error, status = ?error.status(), "access token exchange failed");
	#[cfg(not(feature = "tracing"))]
	let _ = error;
}

/// Logs an outbound request that was dropped for lack of a token.
pub(crate) fn request_blocked(error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %error, "outbound request not sent without an access token");
	#[cfg(not(feature = "tracing"))]
	let _ = error;
}
