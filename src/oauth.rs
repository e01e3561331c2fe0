//! Token-endpoint wire format for the `client_credentials` grant.
//!
//! The request carries `Authorization: Basic base64(client_id:client_secret)` and the form body
//! `grant_type=client_credentials&scope=<scope>`; the response is decoded into a
//! [`TokenResponse`] or classified into a [`FetchError`].

// crates.io
use ::http::{
	Method, StatusCode,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, TokenResponse},
	clock::Clock,
	error::{FetchError, TransportError},
	http::{HttpRequest, HttpResponse, TokenHttpClient, parse_retry_after},
	provider::ClientCredentials,
};

/// Grant type sent with every exchange.
pub const GRANT_TYPE: &str = "client_credentials";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// RFC 6749 §5.2 error body; every field is optional because issuers are inconsistent.
#[derive(Debug, Default, Deserialize)]
struct OAuthErrorBody {
	error: Option<String>,
	error_description: Option<String>,
}

/// Performs one `client_credentials` exchange and validates the response.
///
/// `clock` is read once the response arrives; it anchors HTTP-date `Retry-After` hints.
pub async fn exchange_client_credentials<C>(
	http_client: &C,
	credentials: &ClientCredentials,
	clock: &dyn Clock,
) -> Result<TokenResponse, FetchError>
where
	C: ?Sized + TokenHttpClient,
{
	let request = build_token_request(credentials)?;
	let response = http_client.execute(request).await.map_err(TransportError::network)?;

	parse_token_response(response, clock.now())
}

/// Assembles the token request without sending it.
pub fn build_token_request(credentials: &ClientCredentials) -> Result<HttpRequest, FetchError> {
	let mut authorization =
		HeaderValue::try_from(basic_authorization(&credentials.client_id, &credentials.client_secret))
			.map_err(::http::Error::from)?;

	authorization.set_sensitive(true);

	let body = form_urlencoded::Serializer::new(String::new())
		.append_pair("grant_type", GRANT_TYPE)
		.append_pair("scope", &credentials.scope.normalized())
		.finish();
	let request = ::http::Request::builder()
		.method(Method::POST)
		.uri(credentials.token_endpoint.as_str())
		.header(AUTHORIZATION, authorization)
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(ACCEPT, JSON_CONTENT_TYPE)
		.body(body.into_bytes())?;

	Ok(request)
}

/// Formats the `Authorization` value for HTTP Basic client authentication.
pub fn basic_authorization(client_id: &ClientId, client_secret: &ClientSecret) -> String {
	let pair = format!("{client_id}:{}", client_secret.expose());

	format!("Basic {}", STANDARD.encode(pair))
}

/// Classifies a buffered token-endpoint response.
pub fn parse_token_response(
	response: HttpResponse,
	now: OffsetDateTime,
) -> Result<TokenResponse, FetchError> {
	let status = response.status();

	if !status.is_success() {
		return Err(status_error(status, &response, now));
	}

	let mut de = serde_json::Deserializer::from_slice(response.body());
	let token: TokenResponse = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| FetchError::Parse { source, status: status.as_u16() })?;

	if token.access_token.is_empty() {
		return Err(FetchError::EmptyAccessToken);
	}

	Ok(token)
}

fn status_error(status: StatusCode, response: &HttpResponse, now: OffsetDateTime) -> FetchError {
	let body = serde_json::from_slice::<OAuthErrorBody>(response.body()).unwrap_or_default();

	FetchError::Status {
		status: status.as_u16(),
		oauth_error: body.error,
		description: body.error_description,
		retry_after: parse_retry_after(response.headers(), now),
	}
}
