//! Session persistence, silent token refresh, and route gating for the calorie-tracker REST API.
//!
//! The crate models the client side of the service's authentication protocol: a durable
//! [`store::TokenStore`], a dependency-injected [`session::Session`], a [`flows::Client`] whose
//! private requests retry once after a silent refresh, the [`bootstrap::Bootstrap`] state
//! machine that runs on start, and a synchronous [`guard::RouteGuard`].

#![deny(clippy::all, missing_docs)]

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod flows;
pub mod guard;
pub mod http;
pub mod obs;
pub mod session;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ClientConfig,
		flows::Client,
		http::ReqwestHttpClient,
		session::Session,
		store::{MemoryStorage, TokenStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestHttpClient>;

	/// Everything a test needs to poke at one client session.
	pub struct TestHarness {
		/// Client under test.
		pub client: ReqwestTestClient,
		/// Session shared with the client.
		pub session: Arc<Session>,
		/// Raw storage backing the session's token store.
		pub storage: Arc<MemoryStorage>,
	}

	/// Builds a [`TestHarness`] pointed at `base_url` over a pre-seeded in-memory storage.
	pub fn build_test_harness_with(base_url: &str, storage: MemoryStorage) -> TestHarness {
		let config =
			ClientConfig::from_base_url(base_url).expect("Test base URL should be a valid URL.");
		let storage = Arc::new(storage);
		let session = Arc::new(Session::hydrate(TokenStore::new(storage.clone())));
		let http_client = ReqwestHttpClient::from_config(&config)
			.expect("Failed to build Reqwest client for tests.");
		let client = Client::with_http_client(config, session.clone(), http_client);

		TestHarness { client, session, storage }
	}

	/// Builds a [`TestHarness`] with empty storage.
	pub fn build_test_harness(base_url: &str) -> TestHarness {
		build_test_harness_with(base_url, MemoryStorage::default())
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{
		Client as ReqwestClient, Error as ReqwestError, Method, Response, StatusCode,
	};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
