// crates.io
use httpmock::prelude::*;
// self
use calorie_session::{
	_preludet::*,
	http::ApiRequest,
	store::{AUTH_KEY, MemoryStorage},
};

const RECORDS_PATH: &str = "/records/2025-01-01";

fn signed_in(server: &MockServer) -> TestHarness {
	build_test_harness_with(
		&server.base_url(),
		MemoryStorage::with_entries([(AUTH_KEY, "{\"user\":\"alice\",\"accessToken\":\"tok1\"}")]),
	)
}

async fn mock_refresh<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	let body = format!("{{\"accessToken\":\"{token}\",\"roles\":[\"user\"]}}");

	server
		.mock_async(|when, then| {
			when.method(GET).path("/refresh");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn unauthorized_request_refreshes_once_and_retries_with_new_token() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let stale = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH).header("authorization", "Bearer tok1");
			then.status(401);
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH).header("authorization", "Bearer tok2");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let refresh = mock_refresh(&server, "tok2").await;
	let response = harness
		.client
		.send_private(&ApiRequest::get(RECORDS_PATH))
		.await
		.expect("Private request should resolve.");

	assert_eq!(response.status(), StatusCode::OK);

	stale.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
	fresh.assert_calls_async(1).await;

	assert_eq!(
		harness.session.access_token().map(|token| token.expose().to_owned()).as_deref(),
		Some("tok2")
	);
}

#[tokio::test]
async fn second_unauthorized_is_returned_unmodified() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let records = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH);
			then.status(401).body("{\"detail\":\"Could not validate credentials\"}");
		})
		.await;
	let refresh = mock_refresh(&server, "tok2").await;
	let response = harness
		.client
		.send_private(&ApiRequest::get(RECORDS_PATH))
		.await
		.expect("A second 401 is a response, not an error.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(
		response.text().await.expect("Body should be readable."),
		"{\"detail\":\"Could not validate credentials\"}"
	);

	records.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn successful_request_never_refreshes() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let records = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH).header("authorization", "Bearer tok1");
			then.status(200).body("[]");
		})
		.await;
	let refresh = mock_refresh(&server, "tok2").await;
	let response = harness
		.client
		.send_private(&ApiRequest::get(RECORDS_PATH))
		.await
		.expect("Private request should resolve.");

	assert_eq!(response.status(), StatusCode::OK);

	records.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;
}

#[tokio::test]
async fn failed_refresh_surfaces_session_expired() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let records = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH);
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/refresh");
			then.status(403);
		})
		.await;
	let err = harness
		.client
		.send_private(&ApiRequest::get(RECORDS_PATH))
		.await
		.expect_err("A rejected refresh must end the session.");

	assert!(err.is_session_expired());
	assert_eq!(harness.session.auth(), None);
	assert_eq!(harness.storage.raw(AUTH_KEY), None);

	records.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn token_is_read_at_call_time() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let rotated = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH).header("authorization", "Bearer tok9");
			then.status(200).body("[]");
		})
		.await;

	harness
		.session
		.set_auth(calorie_session::auth::AuthRecord::new("alice", "tok9"))
		.expect("Rotating the token should succeed.");

	let response = harness
		.client
		.send_private(&ApiRequest::get(RECORDS_PATH))
		.await
		.expect("Private request should resolve.");

	assert_eq!(response.status(), StatusCode::OK);

	rotated.assert_calls_async(1).await;
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let stale = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH).header("authorization", "Bearer tok1");
			then.status(401).delay(std::time::Duration::from_millis(50));
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH).header("authorization", "Bearer tok2");
			then.status(200).body("[]");
		})
		.await;
	let refresh = mock_refresh(&server, "tok2").await;
	let request = ApiRequest::get(RECORDS_PATH);
	let (first, second) = tokio::join!(
		harness.client.send_private(&request),
		harness.client.send_private(&request),
	);

	assert_eq!(first.expect("First request should resolve.").status(), StatusCode::OK);
	assert_eq!(second.expect("Second request should resolve.").status(), StatusCode::OK);

	stale.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;
	fresh.assert_calls_async(2).await;
}

#[tokio::test]
async fn current_user_flows_through_the_private_path() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/read_current_user").header("authorization", "Bearer tok1");
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":1,\"username\":\"alice\",\"email\":\"alice@example.com\",\"height\":170,\"weight\":72.25,\"target_weight\":70.0,\"time_frame\":6}",
			);
		})
		.await;
	let user = harness.client.current_user().await.expect("Profile lookup should succeed.");

	profile.assert_async().await;

	assert_eq!(user.username, "alice");
	assert_eq!(user.bmi_display().as_deref(), Some("25.00"));
	assert_eq!(user.daily_calorie_goal().round(), 2500.0);
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_rejected_refresh() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let records = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH);
			then.status(401).delay(std::time::Duration::from_millis(50));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/refresh");
			then.status(401);
		})
		.await;
	let request = ApiRequest::get(RECORDS_PATH);
	let (first, second) = tokio::join!(
		harness.client.send_private(&request),
		harness.client.send_private(&request),
	);

	for result in [first, second] {
		let err = result.expect_err("A rejected refresh must end both requests.");

		assert!(matches!(err, Error::SessionExpired { status: Some(401) }));
	}

	records.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;

	assert_eq!(harness.session.auth(), None);
	assert_eq!(harness.client.refresh_metrics.attempts(), 1);
}

#[tokio::test]
async fn later_request_may_refresh_again_after_a_rejection() {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let records = server
		.mock_async(|when, then| {
			when.method(GET).path(RECORDS_PATH);
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/refresh");
			then.status(401);
		})
		.await;
	let request = ApiRequest::get(RECORDS_PATH);

	for _ in 0..2 {
		let err = harness
			.client
			.send_private(&request)
			.await
			.expect_err("A rejected refresh must surface an error.");

		assert!(err.is_session_expired());
	}

	records.assert_calls_async(2).await;
	refresh.assert_calls_async(2).await;
}
