//! Transport primitives for token-endpoint exchanges.
//!
//! [`TokenHttpClient`] is the cache's only dependency on an HTTP stack. Requests and responses
//! are plain [`http`](::http) values with buffered bodies, so custom transports (and test
//! doubles) never depend on reqwest types.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::{header::HeaderMap, redirect::Policy};
use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Buffered request sent to the token endpoint.
pub type HttpRequest = ::http::Request<Vec<u8>>;
/// Buffered response received from the token endpoint.
pub type HttpResponse = ::http::Response<Vec<u8>>;
/// Boxed future returned by [`TokenHttpClient::execute`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing token exchanges.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by a
/// [`TokenCache`](crate::cache::TokenCache) behind an `Arc`. A non-2xx status is a response,
/// not a transport error; only failures that prevented a response belong in
/// [`TransportError`](Self::TransportError).
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and buffers the full response.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects: token endpoints return results directly, and a
/// redirect would replay Basic credentials to another origin. [`ReqwestHttpClient::new`]
/// configures that; clients supplied through [`ReqwestHttpClient::with_client`] should too.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with redirects disabled.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let headers: HeaderMap = response.headers().to_owned();
			let mut buffered = HttpResponse::new(response.bytes().await?.to_vec());

			*buffered.status_mut() = status;
			*buffered.headers_mut() = headers;

			Ok::<_, ReqwestError>(buffered)
		})
	}
}

/// Parses a `Retry-After` header given either as delay seconds or as an HTTP date.
pub(crate) fn parse_retry_after(headers: &::http::HeaderMap, now: OffsetDateTime) -> Option<Duration> {
	let value = headers.get(::http::header::RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - now;

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use ::http::{HeaderMap, HeaderValue, header::RETRY_AFTER};
	use time::macros;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds_and_dates() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let mut headers = HeaderMap::new();

		assert_eq!(parse_retry_after(&headers, now), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));

		assert_eq!(parse_retry_after(&headers, now), Some(Duration::minutes(2)));

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 01 Jan 2025 00:00:30 +0000"));

		assert_eq!(parse_retry_after(&headers, now), Some(Duration::seconds(30)));

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Tue, 31 Dec 2024 23:00:00 +0000"));

		assert_eq!(parse_retry_after(&headers, now), None);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn reqwest_client_builds_without_redirects() {
		ReqwestHttpClient::new().expect("Default reqwest transport should build.");
	}
}
