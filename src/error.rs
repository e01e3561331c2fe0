//! Error types shared by configuration, the token cache, and the outbound interceptor.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ScopeValidationError},
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected at startup.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No valid access token could be produced for the caller.
	#[error("No valid access token is available.")]
	TokenUnavailable {
		/// Failure of the exchange this caller observed; shared by every caller that waited on
		/// the same exchange.
		#[source]
		source: Arc<FetchError>,
	},
}
impl Error {
	/// Wraps a shared fetch failure as [`Error::TokenUnavailable`].
	pub fn token_unavailable(source: Arc<FetchError>) -> Self {
		Self::TokenUnavailable { source }
	}

	/// Returns the token-endpoint failure behind this error, if any.
	pub fn fetch_error(&self) -> Option<&FetchError> {
		match self {
			Self::TokenUnavailable { source } => Some(source.as_ref()),
			Self::Config(_) => None,
		}
	}
}

/// Configuration and validation failures raised before any traffic is served.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting was not provided.
	#[error("Required setting `{field}` is missing.")]
	MissingField {
		/// Name of the missing setting.
		field: &'static str,
	},
	/// Client identifier failed validation.
	#[error("Client identifier is invalid.")]
	InvalidClientId(#[from] IdentifierError),
	/// Requested scope failed validation.
	#[error("Requested scope is invalid.")]
	InvalidScope(#[from] ScopeValidationError),
	/// Token endpoint cannot be parsed as a URL.
	#[error("Token endpoint is not a valid URL.")]
	InvalidTokenEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token endpoint does not use HTTPS and is not a loopback address.
	#[error("The token endpoint must use HTTPS: {url}.")]
	InsecureTokenEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token-endpoint exchange failures. Every variant clears the cached token.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// The token request could not be assembled.
	#[error("Token request could not be constructed.")]
	Request(#[from] ::http::Error),
	/// Network or I/O failure while talking to the token endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The exchange did not finish within the configured timeout.
	#[error("Token endpoint did not respond within {after}.")]
	Timeout {
		/// Timeout that elapsed.
		after: Duration,
	},
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}{}.", describe_oauth_error(.oauth_error, .description))]
	Status {
		/// HTTP status code.
		status: u16,
		/// RFC 6749 `error` field, when the body carried one.
		oauth_error: Option<String>,
		/// RFC 6749 `error_description` field, when the body carried one.
		description: Option<String>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Token endpoint returned an empty `access_token`.
	#[error("Token endpoint returned an empty access token.")]
	EmptyAccessToken,
}
impl FetchError {
	/// HTTP status code of the failing response, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } | Self::Parse { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures surfaced by [`BearerInterceptor::intercept`](crate::intercept::BearerInterceptor::intercept).
#[derive(Debug, ThisError)]
pub enum InterceptError<E> {
	/// The request was not sent because no access token is available.
	#[error("Outbound request was not sent because no access token is available.")]
	Unauthenticated(#[source] Error),
	/// The access token cannot be carried in an `Authorization` header.
	#[error("Access token cannot be encoded as an Authorization header.")]
	InvalidHeader(#[source] ::http::header::InvalidHeaderValue),
	/// The downstream call itself failed after the token was attached.
	#[error("Downstream call failed.")]
	Downstream(#[source] E),
}
impl<E> InterceptError<E> {
	/// Returns `true` when the request never reached the downstream transport.
	pub fn is_unsent(&self) -> bool {
		!matches!(self, Self::Downstream(_))
	}
}

fn describe_oauth_error(oauth_error: &Option<String>, description: &Option<String>) -> String {
	match (oauth_error, description) {
		(Some(error), Some(description)) => format!(" ({error}: {description})"),
		(Some(error), None) => format!(" ({error})"),
		(None, Some(description)) => format!(" ({description})"),
		(None, None) => String::new(),
	}
}
