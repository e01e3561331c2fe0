//! Optional observability helpers for token lookups, exchanges, and outbound interception.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `gateway_bearer.flow` with the `flow` and `stage`
//!   fields, plus debug/info/warn events around every exchange.
//! - Enable `metrics` to increment the `gateway_bearer_flow_total` counter, labeled by `flow` +
//!   `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// A caller asked the cache for a valid token.
	TokenLookup,
	/// A `client_credentials` exchange against the token endpoint.
	TokenExchange,
	/// An outbound request passed through the bearer interceptor.
	Intercept,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::TokenLookup => "token_lookup",
			FlowKind::TokenExchange => "token_exchange",
			FlowKind::Intercept => "intercept",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to the flow.
	Attempt,
	/// Served from the cache without contacting the token endpoint.
	CacheHit,
	/// Served by an exchange another caller performed while this one waited.
	Shared,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::CacheHit => "cache_hit",
			FlowOutcome::Shared => "shared",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
