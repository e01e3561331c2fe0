mod common;

// std
use std::{convert::Infallible, sync::Arc};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use gateway_bearer::{
	error::{FetchError, InterceptError},
	intercept::{self, BearerInterceptor},
};

async fn token_endpoint<'a>(
	server: &'a MockServer,
	status: u16,
	body: &'static str,
) -> httpmock::Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn downstream_client_signs_every_request() {
	let server = MockServer::start_async().await;
	let issuer =
		token_endpoint(&server, 200, "{\"access_token\":\"abc123\",\"expires_in\":3600}").await;
	let students = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/students")
				.header("authorization", "Bearer abc123")
				.header("x-request-id", "42");
			then.status(200).body("[]");
		})
		.await;
	let cache = Arc::new(mock_cache(&server));
	let client = intercept::downstream_client(insecure_reqwest_client(), BearerInterceptor::new(cache));

	for _ in 0..3 {
		let response = client
			.get(server.url("/api/students"))
			.header("x-request-id", "42")
			.send()
			.await
			.expect("Signed request should reach the downstream service.");

		assert_eq!(response.status(), 200);
	}

	issuer.assert_calls_async(1).await;
	students.assert_calls_async(3).await;
}

#[tokio::test]
async fn downstream_client_overrides_caller_authorization() {
	let server = MockServer::start_async().await;

	token_endpoint(&server, 200, "{\"access_token\":\"abc123\",\"expires_in\":3600}").await;

	let students = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/students").header("authorization", "Bearer abc123");
			then.status(204);
		})
		.await;
	let cache = Arc::new(mock_cache(&server));
	let client = intercept::downstream_client(insecure_reqwest_client(), BearerInterceptor::new(cache));
	let response = client
		.get(server.url("/api/students"))
		.header("authorization", "Bearer forged")
		.send()
		.await
		.expect("Request should be sent with the cached token.");

	assert_eq!(response.status(), 204);

	students.assert_calls_async(1).await;
}

#[tokio::test]
async fn downstream_client_does_not_send_without_a_token() {
	let server = MockServer::start_async().await;
	let issuer = token_endpoint(&server, 500, "{\"error\":\"server_error\"}").await;
	let students = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/students");
			then.status(200);
		})
		.await;
	let cache = Arc::new(mock_cache(&server));
	let client = intercept::downstream_client(insecure_reqwest_client(), BearerInterceptor::new(cache));
	let err = client
		.get(server.url("/api/students"))
		.send()
		.await
		.expect_err("Missing token must abort the call.");

	assert!(matches!(err, gateway_bearer::reqwest_middleware::Error::Middleware(_)));

	issuer.assert_calls_async(1).await;
	students.assert_calls_async(0).await;
}

#[tokio::test]
async fn interceptor_wraps_plain_http_requests() {
	let issuer = ScriptedIssuer::new([Reply::token(1, 3600)]);
	let interceptor = BearerInterceptor::new(Arc::new(issuer.cache(start_clock())));
	let copy = interceptor.clone();
	let request = http::Request::builder()
		.method("POST")
		.uri("https://students.internal/api/students")
		.header("content-type", "application/json")
		.body("{\"name\":\"Ada\"}".to_owned())
		.expect("Request fixture should build.");
	let (parts, body) = interceptor
		.intercept(request, |request| async move { Ok::<_, Infallible>(request.into_parts()) })
		.await
		.expect("Interceptor should forward the request.");

	assert_eq!(parts.headers["authorization"], "Bearer token-1");
	assert_eq!(parts.headers["content-type"], "application/json");
	assert_eq!(body, "{\"name\":\"Ada\"}");

	// Clones share one cache.
	copy.intercept(http::Request::new(()), |_| async { Ok::<_, Infallible>(()) })
		.await
		.expect("Clone should reuse the cached token.");

	assert_eq!(issuer.calls(), 1);
}

#[tokio::test]
async fn interceptor_reports_the_fetch_cause() {
	let issuer = ScriptedIssuer::new([Reply::status(400)]);
	let interceptor = BearerInterceptor::new(Arc::new(issuer.cache(start_clock())));
	let err = interceptor
		.intercept(http::Request::new(()), |_| async { Ok::<_, Infallible>(()) })
		.await
		.expect_err("Rejected exchange must block the request.");

	match err {
		InterceptError::Unauthenticated(inner) => {
			assert!(matches!(inner.fetch_error(), Some(FetchError::Status { status: 400, .. })));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
