//! Fixtures shared by the integration suites.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use httpmock::MockServer;
// self
use gateway_bearer::{
	cache::TokenCache,
	clock::ManualClock,
	http::{HttpRequest, HttpResponse, ReqwestHttpClient, TokenHttpClient, TransportFuture},
	provider::ClientCredentials,
	reqwest::{Client, redirect::Policy},
};

pub const CLIENT_ID: &str = "zuul-gateway";
pub const CLIENT_SECRET: &str = "s3cret";
pub const SCOPE: &str = "students.read students.write";
/// `base64("zuul-gateway:s3cret")`.
pub const BASIC_AUTHORIZATION: &str = "Basic enV1bC1nYXRld2F5OnMzY3JldA==";
pub const TOKEN_FORM: &str = "grant_type=client_credentials&scope=students.read+students.write";

pub fn credentials(token_uri: &str) -> ClientCredentials {
	ClientCredentials::builder()
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.token_uri(token_uri)
		.scope(SCOPE)
		.build()
		.expect("Test credentials should be valid.")
}

pub fn mock_credentials(server: &MockServer) -> ClientCredentials {
	credentials(&server.url("/oauth2/token"))
}

/// Builds a reqwest client that accepts the self-signed certificates served by `httpmock`.
pub fn insecure_reqwest_client() -> Client {
	Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(Policy::none())
		.build()
		.expect("Failed to build insecure reqwest client for tests.")
}

/// Cache exchanging against the `httpmock` token endpoint.
pub fn mock_cache(server: &MockServer) -> TokenCache<ReqwestHttpClient> {
	TokenCache::with_http_client(
		mock_credentials(server),
		ReqwestHttpClient::with_client(insecure_reqwest_client()),
	)
}

pub fn start_clock() -> ManualClock {
	ManualClock::new(time::macros::datetime!(2025-01-01 00:00 UTC))
}

/// One canned token-endpoint reply.
#[derive(Clone, Debug)]
pub struct Reply {
	pub status: u16,
	pub body: String,
	pub delay: StdDuration,
}
impl Reply {
	pub fn token(call: usize, expires_in: u64) -> Self {
		Self {
			status: 200,
			body: format!("{{\"access_token\":\"token-{call}\",\"expires_in\":{expires_in}}}"),
			delay: StdDuration::ZERO,
		}
	}

	pub fn status(status: u16) -> Self {
		Self { status, body: "{\"error\":\"server_error\"}".into(), delay: StdDuration::ZERO }
	}

	pub fn after(mut self, delay: StdDuration) -> Self {
		self.delay = delay;

		self
	}
}

/// In-process token endpoint that replays a script and counts exchanges.
///
/// The last reply repeats once the script runs out.
#[derive(Clone, Debug)]
pub struct ScriptedIssuer {
	calls: Arc<AtomicUsize>,
	script: Arc<Vec<Reply>>,
}
impl ScriptedIssuer {
	pub fn new(script: impl IntoIterator<Item = Reply>) -> Self {
		let script = script.into_iter().collect::<Vec<_>>();

		assert!(!script.is_empty(), "Scripted issuer needs at least one reply.");

		Self { calls: Default::default(), script: Arc::new(script) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn cache(&self, clock: ManualClock) -> TokenCache<ScriptedIssuer> {
		TokenCache::with_http_client(credentials("https://issuer.example.com/oauth2/token"), self.clone())
			.with_clock(clock)
	}
}
impl TokenHttpClient for ScriptedIssuer {
	type TransportError = std::io::Error;

	fn execute(&self, _request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let index = self.calls.fetch_add(1, Ordering::SeqCst);
		let reply = self.script[index.min(self.script.len() - 1)].clone();

		Box::pin(async move {
			if !reply.delay.is_zero() {
				tokio::time::sleep(reply.delay).await;
			}

			let mut response = HttpResponse::new(reply.body.into_bytes());

			*response.status_mut() =
				http::StatusCode::from_u16(reply.status).expect("Scripted status should be valid.");

			Ok(response)
		})
	}
}
