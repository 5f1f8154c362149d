//! Session flows (login, registration, refresh, private requests) powered by the client facade.

pub mod refresh;

mod login;
mod private;
mod profile;
mod register;

pub use refresh::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::ConfigError,
	http::{ApiRequest, HttpTransport, ReqwestHttpClient},
	flows::refresh::RefreshGate,
	session::Session,
};

/// Talks to the calorie-tracker backend on behalf of one [`Session`].
///
/// The client owns the transport, the shared session, and the refresh gate that keeps a burst of
/// 401s down to one refresh call, whether that refresh succeeds or is rejected. Cloning is cheap
/// and every clone shares the same session, gate, and metrics.
pub struct Client<C = ReqwestHttpClient>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Auth state read at call time and updated by login/refresh.
	pub session: Arc<Session>,
	/// Endpoint layout and transport options.
	pub config: ClientConfig,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_gate: Arc<RefreshGate>,
}
impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client over a caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		session: Arc<Session>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			session,
			config,
			refresh_metrics: Default::default(),
			refresh_gate: Default::default(),
		}
	}

	/// Sends `request` without credentials.
	pub async fn send_public(&self, request: &ApiRequest) -> Result<Response> {
		let request = request.build(&self.config, None)?;

		Ok(self.http_client.execute(request).await?)
	}

	/// Ends the session locally. The persist flag survives.
	pub fn logout(&self) -> Result<()> {
		self.session.reset()
	}
}
impl Client<ReqwestHttpClient> {
	/// Creates a client with its own cookie-aware reqwest transport.
	pub fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self::with_http_client(config, session, http_client))
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			session: self.session.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_gate: self.refresh_gate.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.config.base_url.as_str())
			.field("authenticated", &self.session.is_authenticated())
			.finish()
	}
}
