//! Validating builder for client-credentials configuration.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, ScopeSet},
	error::ConfigError,
	provider::ClientCredentials,
};

/// Builder for [`ClientCredentials`] values.
#[derive(Clone, Default)]
pub struct ClientCredentialsBuilder {
	client_id: Option<String>,
	client_secret: Option<String>,
	token_uri: Option<TokenUri>,
	scope: Option<RawScope>,
}
impl ClientCredentialsBuilder {
	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Sets the token endpoint from its string form; parsed during [`build`](Self::build).
	pub fn token_uri(mut self, token_uri: impl Into<String>) -> Self {
		self.token_uri = Some(TokenUri::Raw(token_uri.into()));

		self
	}

	/// Sets an already parsed token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_uri = Some(TokenUri::Parsed(url));

		self
	}

	/// Sets the requested scope from its space-delimited form.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(RawScope::Delimited(scope.into()));

		self
	}

	/// Sets an already normalized scope set.
	pub fn scopes(mut self, scopes: ScopeSet) -> Self {
		self.scope = Some(RawScope::Set(scopes));

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientCredentials, ConfigError> {
		let client_id = ClientId::new(required("client_id", self.client_id)?)?;
		let client_secret = ClientSecret::new(required("client_secret", self.client_secret)?);
		let token_endpoint = match self.token_uri {
			Some(TokenUri::Parsed(url)) => url,
			Some(TokenUri::Raw(raw)) if !raw.trim().is_empty() => Url::parse(raw.trim())
				.map_err(|source| ConfigError::InvalidTokenEndpoint { source })?,
			_ => return Err(ConfigError::MissingField { field: "token_uri" }),
		};
		let scope = match self.scope {
			Some(RawScope::Delimited(raw)) => raw.parse::<ScopeSet>()?,
			Some(RawScope::Set(set)) => set,
			None => return Err(ConfigError::MissingField { field: "scope" }),
		};

		validate_token_endpoint(&token_endpoint)?;

		if scope.is_empty() {
			return Err(ConfigError::MissingField { field: "scope" });
		}

		Ok(ClientCredentials { client_id, client_secret, token_endpoint, scope })
	}
}
impl Debug for ClientCredentialsBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsBuilder")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("token_uri", &self.token_uri)
			.field("scope", &self.scope)
			.finish()
	}
}

#[derive(Clone, Debug)]
enum TokenUri {
	Raw(String),
	Parsed(Url),
}

#[derive(Clone, Debug)]
enum RawScope {
	Delimited(String),
	Set(ScopeSet),
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	value.filter(|value| !value.is_empty()).ok_or(ConfigError::MissingField { field })
}

fn validate_token_endpoint(url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigError::InsecureTokenEndpoint { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}
