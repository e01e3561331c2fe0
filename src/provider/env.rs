//! Environment-based loading for [`ClientCredentials`].
//!
//! Keys are `<PREFIX>_CLIENT_ID`, `<PREFIX>_CLIENT_SECRET`, `<PREFIX>_TOKEN_URI`, and
//! `<PREFIX>_SCOPE`, with [`DEFAULT_ENV_PREFIX`] unless another prefix is supplied.

// self
use crate::{error::ConfigError, provider::ClientCredentials};

/// Prefix used by [`ClientCredentials::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "GATEWAY_OAUTH2";

impl ClientCredentials {
	/// Loads credentials from the process environment using [`DEFAULT_ENV_PREFIX`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
	}

	/// Loads credentials from the process environment using a custom prefix.
	pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
		Self::from_lookup(prefix, |key| std::env::var(key).ok())
	}

	/// Loads credentials through an arbitrary key lookup (property files, secret stores, tests).
	pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |suffix: &str| lookup(&format!("{prefix}_{suffix}"));
		let mut builder = Self::builder();

		if let Some(value) = read("CLIENT_ID") {
			builder = builder.client_id(value);
		}
		if let Some(value) = read("CLIENT_SECRET") {
			builder = builder.client_secret(value);
		}
		if let Some(value) = read("TOKEN_URI") {
			builder = builder.token_uri(value);
		}
		if let Some(value) = read("SCOPE") {
			builder = builder.scope(value);
		}

		builder.build()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn lookup_reads_prefixed_keys() {
		let vars = HashMap::from([
			("STUDENTS_CLIENT_ID", "zuul-gateway"),
			("STUDENTS_CLIENT_SECRET", "s3cret"),
			("STUDENTS_TOKEN_URI", "https://issuer.example.com/oauth2/token"),
			("STUDENTS_SCOPE", "students.read"),
		]);
		let credentials =
			ClientCredentials::from_lookup("STUDENTS", |key| vars.get(key).map(|v| v.to_string()))
				.expect("Prefixed lookup should build credentials.");

		assert_eq!(credentials.client_id.as_ref(), "zuul-gateway");
		assert_eq!(credentials.scope.normalized(), "students.read");
	}

	#[test]
	fn lookup_reports_first_missing_key() {
		let err = ClientCredentials::from_lookup(DEFAULT_ENV_PREFIX, |_| None)
			.expect_err("Empty environment should be a configuration error.");

		assert!(matches!(err, ConfigError::MissingField { field: "client_id" }));
	}
}
