// crates.io
use httpmock::prelude::*;
// self
use calorie_session::{_preludet::*, auth::Registration};

fn registration() -> Registration {
	Registration {
		username: "alice".into(),
		email: "alice@example.com".into(),
		password: "correct".into(),
		confirm_password: "correct".into(),
		weight: 80.5,
		height: 170,
		target_weight: 70.0,
		time_frame: 6,
	}
}

#[tokio::test]
async fn register_posts_json_without_confirmation() {
	let server = MockServer::start_async().await;
	let harness = build_test_harness(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/register").json_body(serde_json::json!({
				"username": "alice",
				"email": "alice@example.com",
				"password": "correct",
				"weight": 80.5,
				"height": 170,
				"target_weight": 70.0,
				"time_frame": 6,
			}));
			then.status(201).body("{\"id\":1,\"username\":\"alice\"}");
		})
		.await;

	harness.client.register(&registration()).await.expect("Registration should succeed.");

	mock.assert_async().await;

	assert_eq!(harness.session.auth(), None, "Registration must not sign the user in.");
}

#[tokio::test]
async fn taken_username_is_a_conflict() {
	let server = MockServer::start_async().await;
	let harness = build_test_harness(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/register");
			then.status(409);
		})
		.await;

	let err = harness
		.client
		.register(&registration())
		.await
		.expect_err("A 409 must be reported.");

	assert!(matches!(err, Error::Conflict));
	assert_eq!(err.inline_message(), "Username or Email already exists");
}

#[tokio::test]
async fn mismatched_confirmation_issues_no_request() {
	let server = MockServer::start_async().await;
	let harness = build_test_harness(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/register");
			then.status(201);
		})
		.await;
	let form = Registration { confirm_password: "different".into(), ..registration() };
	let err = harness
		.client
		.register(&form)
		.await
		.expect_err("Mismatched confirmation must fail locally.");

	assert_eq!(err.inline_message(), "Passwords do not match.");

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn other_failures_read_registration_failed() {
	let server = MockServer::start_async().await;
	let harness = build_test_harness(&server.base_url());

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/register");
			then.status(400).body("{\"detail\":\"Email already registered\"}");
		})
		.await;

	let err = harness
		.client
		.register(&registration())
		.await
		.expect_err("A 400 must be reported.");

	assert_eq!(err.inline_message(), "Registration Failed");
}
