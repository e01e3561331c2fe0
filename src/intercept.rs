//! Outbound bearer injection: ask the cache for a token, attach it, then hand the request to
//! the real transport.
//!
//! [`BearerInterceptor::intercept`] is transport-agnostic; any request type implementing
//! [`BearerSigner`] can pass through it. With the `reqwest` feature the interceptor is also a
//! [`reqwest_middleware::Middleware`], and [`downstream_client`] builds the shared outbound
//! client with it installed.

// crates.io
use ::http::{
	HeaderMap,
	header::{AUTHORIZATION, HeaderValue, InvalidHeaderValue},
};
#[cfg(feature = "reqwest")]
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	cache::TokenCache,
	error::InterceptError,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Request types that can carry an `Authorization: Bearer` header.
pub trait BearerSigner {
	/// Header map the bearer credential is written into.
	fn authorization_headers(&mut self) -> &mut HeaderMap;

	/// Sets `Authorization: Bearer <token>`, replacing any existing `Authorization` value.
	fn attach_bearer(&mut self, token: &TokenSecret) -> Result<(), InvalidHeaderValue> {
		let value = bearer_header_value(token)?;

		self.authorization_headers().insert(AUTHORIZATION, value);

		Ok(())
	}
}
impl<B> BearerSigner for ::http::Request<B> {
	fn authorization_headers(&mut self) -> &mut HeaderMap {
		self.headers_mut()
	}
}
#[cfg(feature = "reqwest")]
impl BearerSigner for reqwest::Request {
	fn authorization_headers(&mut self) -> &mut HeaderMap {
		self.headers_mut()
	}
}

/// Formats a token as a sensitive `Bearer` header value.
pub fn bearer_header_value(token: &TokenSecret) -> Result<HeaderValue, InvalidHeaderValue> {
	let mut value = HeaderValue::try_from(format!("Bearer {}", token.expose()))?;

	value.set_sensitive(true);

	Ok(value)
}

/// Attaches the cache's token to every outbound request.
///
/// Cloning is cheap; clones share the same [`TokenCache`].
pub struct BearerInterceptor<C>
where
	C: ?Sized + TokenHttpClient,
{
	cache: Arc<TokenCache<C>>,
}
impl<C> BearerInterceptor<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Wraps a shared cache.
	pub fn new(cache: Arc<TokenCache<C>>) -> Self {
		Self { cache }
	}

	/// Cache this interceptor draws tokens from.
	pub fn cache(&self) -> &Arc<TokenCache<C>> {
		&self.cache
	}

	/// Signs `request` and forwards it to `next`.
	///
	/// `next` is only invoked once the bearer header is in place; without a token the request
	/// is dropped and [`InterceptError::Unauthenticated`] is returned. The downstream result is
	/// passed through unchanged.
	pub async fn intercept<R, F, Fut, T, E>(
		&self,
		mut request: R,
		next: F,
	) -> Result<T, InterceptError<E>>
	where
		R: BearerSigner,
		F: FnOnce(R) -> Fut,
		Fut: Future<Output = Result<T, E>>,
	{
		const KIND: FlowKind = FlowKind::Intercept;

		let span = FlowSpan::new(KIND, "intercept");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.cache.valid_token().await.map_err(|e| {
					obs::request_blocked(&e);

					InterceptError::Unauthenticated(e)
				})?;

				request.attach_bearer(&token).map_err(InterceptError::InvalidHeader)?;

				next(request).await.map_err(InterceptError::Downstream)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
impl<C> Clone for BearerInterceptor<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self { cache: self.cache.clone() }
	}
}
impl<C> Debug for BearerInterceptor<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerInterceptor").field("cache", &self.cache).finish()
	}
}
#[cfg(feature = "reqwest")]
#[async_trait::async_trait]
impl<C> Middleware for BearerInterceptor<C>
where
	C: ?Sized + TokenHttpClient,
{
	async fn handle(
		&self,
		req: reqwest::Request,
		extensions: &mut ::http::Extensions,
		next: Next<'_>,
	) -> reqwest_middleware::Result<reqwest::Response> {
		self.intercept(req, move |req| next.run(req, extensions)).await.map_err(|e| match e {
			InterceptError::Downstream(e) => e,
			unsent => reqwest_middleware::Error::middleware(unsent),
		})
	}
}

/// Builds the shared outbound client with `interceptor` installed.
#[cfg(feature = "reqwest")]
pub fn downstream_client<C>(
	client: ReqwestClient,
	interceptor: BearerInterceptor<C>,
) -> ClientWithMiddleware
where
	C: ?Sized + TokenHttpClient,
{
	ClientBuilder::new(client).with(interceptor).build()
}
