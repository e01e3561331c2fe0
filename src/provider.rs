//! Client-credentials configuration for the single token issuer this process talks to.
//!
//! [`ClientCredentials`] is validated once, at startup, through
//! [`ClientCredentialsBuilder`]; every loading path (builder, serde, environment) funnels
//! through the same checks so an invalid setup is a [`ConfigError`] before any traffic flows.

pub mod builder;
pub mod env;

pub use builder::*;
pub use env::*;

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, ScopeSet},
	error::ConfigError,
};

/// Immutable client-credentials configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClientCredentials")]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: ClientId,
	/// Client secret presented through HTTP Basic authentication.
	#[serde(skip_serializing)]
	pub client_secret: ClientSecret,
	/// Token endpoint receiving the `client_credentials` grant.
	#[serde(rename = "token_uri")]
	pub token_endpoint: Url,
	/// Scope requested with every exchange.
	pub scope: ScopeSet,
}
impl ClientCredentials {
	/// Creates a new builder.
	pub fn builder() -> ClientCredentialsBuilder {
		ClientCredentialsBuilder::default()
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("scope", &self.scope)
			.finish()
	}
}
impl TryFrom<RawClientCredentials> for ClientCredentials {
	type Error = ConfigError;

	fn try_from(raw: RawClientCredentials) -> Result<Self, Self::Error> {
		let mut builder = Self::builder();

		if let Some(client_id) = raw.client_id {
			builder = builder.client_id(client_id);
		}
		if let Some(client_secret) = raw.client_secret {
			builder = builder.client_secret(client_secret);
		}
		if let Some(token_uri) = raw.token_uri {
			builder = builder.token_uri(token_uri);
		}
		if let Some(scope) = raw.scope {
			builder = builder.scopes(scope);
		}

		builder.build()
	}
}

/// Unvalidated mirror of [`ClientCredentials`] used by serde.
#[derive(Deserialize)]
struct RawClientCredentials {
	client_id: Option<String>,
	client_secret: Option<String>,
	#[serde(alias = "token_endpoint")]
	token_uri: Option<String>,
	scope: Option<ScopeSet>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn deserializes_through_builder_validation() {
		let credentials: ClientCredentials = serde_json::from_str(
			r#"{
				"client_id": "zuul-gateway",
				"client_secret": "s3cret",
				"token_uri": "https://issuer.example.com/oauth2/token",
				"scope": "students.read students.write"
			}"#,
		)
		.expect("Complete configuration should deserialize.");

		assert_eq!(credentials.client_id.as_ref(), "zuul-gateway");
		assert_eq!(credentials.client_secret.expose(), "s3cret");
		assert_eq!(credentials.scope.normalized(), "students.read students.write");

		let err = serde_json::from_str::<ClientCredentials>(
			r#"{"client_id": "zuul-gateway", "token_uri": "https://issuer.example.com/token", "scope": "a"}"#,
		)
		.expect_err("Missing secret should fail deserialization.");

		assert!(err.to_string().contains("client_secret"));
	}

	#[test]
	fn deserializes_scope_lists() {
		let credentials: ClientCredentials = serde_json::from_str(
			r#"{
				"client_id": "zuul-gateway",
				"client_secret": "s3cret",
				"token_endpoint": "https://issuer.example.com/oauth2/token",
				"scope": ["students.write", "students.read", "students.read"]
			}"#,
		)
		.expect("List scope should deserialize.");

		assert_eq!(credentials.scope.normalized(), "students.read students.write");
	}

	#[test]
	fn debug_and_serialize_hide_secret() {
		let credentials = ClientCredentials::builder()
			.client_id("zuul-gateway")
			.client_secret("s3cret")
			.token_uri("https://issuer.example.com/oauth2/token")
			.scope("students.read")
			.build()
			.expect("Builder fixture should be valid.");

		assert!(!format!("{credentials:?}").contains("s3cret"));
		assert!(
			!serde_json::to_string(&credentials)
				.expect("Credentials should serialize.")
				.contains("s3cret")
		);
	}
}
