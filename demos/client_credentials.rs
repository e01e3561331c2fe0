//! Demonstrates a gateway wiring: one shared token cache, a downstream client with the bearer
//! interceptor installed, and a mock issuer plus student service standing in for real hosts.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use gateway_bearer::{
	cache::{RefreshPolicy, TokenCache},
	http::ReqwestHttpClient,
	intercept::{self, BearerInterceptor},
	provider::ClientCredentials,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let students_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/students").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body("[\"ada\",\"grace\"]");
		})
		.await;
	let credentials = ClientCredentials::builder()
		.client_id("demo-gateway")
		.client_secret("super-secret")
		.token_uri(server.url("/oauth2/token"))
		.scope("students.read")
		.build()?;
	// The mock server presents a self-signed certificate.
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()?;
	let cache = Arc::new(
		TokenCache::with_http_client(credentials, ReqwestHttpClient::with_client(client.clone()))
			.with_policy(RefreshPolicy::default()),
	);
	let client = intercept::downstream_client(client, BearerInterceptor::new(cache.clone()));

	for _ in 0..3 {
		let body = client.get(server.url("/api/students")).send().await?.text().await?;

		println!("Students: {body}.");
	}

	println!("Token status: {:?}; exchanges: {}.", cache.status(), cache.metrics().attempts());

	token_mock.assert_async().await;
	students_mock.assert_calls_async(3).await;

	Ok(())
}
