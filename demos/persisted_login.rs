//! Logs in against a mocked backend, persists the session to a JSON file, then bootstraps a
//! second client from that file the way an application restart would.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use calorie_session::{
	auth::Credentials,
	config::ClientConfig,
	flows::Client,
	guard::RouteGuard,
	http::ApiRequest,
	session::Session,
	store::{FileStorage, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/token");
			then.status(200)
				.header("content-type", "application/json")
				.header("set-cookie", "refresh_token=demo-refresh; HttpOnly; Path=/")
				.body("{\"access_token\":\"demo-access\",\"token_type\":\"bearer\"}");
		})
		.await;
	let records_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/records/2025-01-01").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let path = env::temp_dir().join("calorie_session_demo.json");
	let config = ClientConfig::from_base_url(&server.base_url())?;
	let session = Arc::new(Session::hydrate(TokenStore::new(Arc::new(FileStorage::open(&path)?))));
	let client = Client::new(config.clone(), session.clone())?;

	session.set_persist(true)?;

	let record = client.login(&Credentials::new("alice", "correct horse")).await?;

	println!("Signed in as {}.", record.user);

	let response = client.send_private(&ApiRequest::get("records/2025-01-01")).await?;

	println!("Records request answered with {}.", response.status());

	let restarted =
		Arc::new(Session::hydrate(TokenStore::new(Arc::new(FileStorage::open(&path)?))));
	let client = Client::new(config, restarted.clone())?;
	let decision = client.bootstrap().await;
	let guard = RouteGuard::default();

	println!("Bootstrap finished with {decision:?}.");
	println!("Guard says {:?} for /create-record.", guard.check(&restarted, "/create-record"));

	client.logout()?;

	println!("Guard says {:?} after logout.", guard.check(&restarted, "/create-record"));

	token_mock.assert_async().await;
	records_mock.assert_async().await;

	std::fs::remove_file(&path)?;

	Ok(())
}
