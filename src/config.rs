//! Backend endpoint layout and transport options.

// self
use crate::{_prelude::*, error::ConfigError};

/// Relative endpoint paths consumed by the auth flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// Username/password exchange (form-encoded).
	pub token: String,
	/// Account registration (JSON).
	pub register: String,
	/// Cookie-authenticated access-token refresh.
	pub refresh: String,
	/// Bearer-authenticated profile lookup.
	pub current_user: String,
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			token: "auth/token".into(),
			register: "auth/register".into(),
			refresh: "refresh".into(),
			current_user: "auth/read_current_user".into(),
		}
	}
}

/// Validated client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL every endpoint path is resolved against; always ends with `/`.
	pub base_url: Url,
	/// Endpoint paths relative to [`ClientConfig::base_url`].
	pub endpoints: Endpoints,
	/// Per-request timeout. `None` leaves the transport default in place.
	pub request_timeout: Option<Duration>,
	/// Optional `User-Agent` header for the default transport.
	pub user_agent: Option<String>,
}
impl ClientConfig {
	/// Returns a builder seeded with `base_url` and the default endpoint layout.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Parses `base_url` and builds a configuration with defaults for everything else.
	pub fn from_base_url(base_url: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Self::builder(url).build()
	}

	/// Resolves a relative endpoint path against the base URL.
	///
	/// Leading slashes are ignored so `"/refresh"` and `"refresh"` resolve identically and the
	/// base URL's own path prefix is kept.
	pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
		let relative = path.trim_start_matches('/');

		self.base_url
			.join(relative)
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.to_owned(), source })
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	base_url: Url,
	endpoints: Endpoints,
	request_timeout: Option<Duration>,
	user_agent: Option<String>,
}
impl ClientConfigBuilder {
	fn new(base_url: Url) -> Self {
		Self { base_url, endpoints: Endpoints::default(), request_timeout: None, user_agent: None }
	}

	/// Overrides the token endpoint path.
	pub fn token_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.token = path.into();

		self
	}

	/// Overrides the registration endpoint path.
	pub fn register_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.register = path.into();

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.refresh = path.into();

		self
	}

	/// Overrides the current-user endpoint path.
	pub fn current_user_path(mut self, path: impl Into<String>) -> Self {
		self.endpoints.current_user = path.into();

		self
	}

	/// Applies a per-request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Sets the `User-Agent` header used by the default transport.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let mut base_url = self.base_url;

		if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
			return Err(ConfigError::UnsupportedBaseUrl { url: base_url.to_string() });
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		base_url.set_query(None);
		base_url.set_fragment(None);

		let config = ClientConfig {
			base_url,
			endpoints: self.endpoints,
			request_timeout: self.request_timeout,
			user_agent: self.user_agent,
		};

		for path in [
			&config.endpoints.token,
			&config.endpoints.register,
			&config.endpoints.refresh,
			&config.endpoints.current_user,
		] {
			config.endpoint_url(path)?;
		}

		Ok(config)
	}
}
