//! Silent access-token refresh using the out-of-band refresh cookie.
//!
//! [`Client::refresh`] calls the refresh endpoint without an `Authorization` header; the
//! transport's cookie store supplies the credential. A success merges the new token into the
//! session (the username is kept) and the store. Any failure empties the session before the
//! error is returned, so callers observe either a fully refreshed session or no session at all.
//! Refreshes never retry on their own: requests that queued behind a rejected refresh share its
//! failure instead of presenting the same cookie again.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::{
	io,
	sync::atomic::{AtomicU64, Ordering},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::TransportError,
	flows::Client,
	http::{self, ApiRequest, HttpTransport},
	obs::{self, FlowKind},
};

/// Serializes refreshes and remembers how the latest one ended.
///
/// `generation` counts finished refreshes. A request samples it before dispatch; if it moved by
/// the time the request holds the lock, a refresh finished in between and its outcome applies.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
	generation: AtomicU64,
	last: AsyncMutex<LastRefresh>,
}
impl RefreshGate {
	pub(crate) fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}
}

#[derive(Clone, Copy, Debug, Default)]
enum LastRefresh {
	#[default]
	Idle,
	Succeeded,
	Rejected {
		status: Option<u16>,
	},
	Unreachable,
}
impl LastRefresh {
	fn from_result(result: &Result<TokenSecret>) -> Self {
		match result {
			Ok(_) => Self::Succeeded,
			Err(Error::SessionExpired { status }) => Self::Rejected { status: *status },
			Err(Error::NetworkUnreachable(_)) => Self::Unreachable,
			Err(_) => Self::Rejected { status: None },
		}
	}

	fn replay(self) -> Option<Error> {
		match self {
			Self::Idle | Self::Succeeded => None,
			Self::Rejected { status } => Some(Error::SessionExpired { status }),
			Self::Unreachable => Some(Error::NetworkUnreachable(TransportError::Io(io::Error::new(
				io::ErrorKind::NotConnected,
				"the shared refresh did not reach the backend",
			)))),
		}
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
	access_token: TokenSecret,
	#[serde(default)]
	roles: Option<Vec<String>>,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Mints a new access token from the refresh cookie and stores it in the session.
	pub async fn refresh(&self) -> Result<TokenSecret> {
		let mut last = self.refresh_gate.last.lock().await;

		self.refresh_recorded(&mut last).await
	}

	/// Refreshes after `stale` was rejected, unless a refresh that finished after `generation`
	/// was sampled already settled the outcome.
	///
	/// A newer token in the session is returned as is. A newer failed refresh is replayed
	/// without calling the backend again.
	pub(crate) async fn refresh_after_rejection(
		&self,
		stale: Option<&TokenSecret>,
		generation: u64,
	) -> Result<TokenSecret> {
		let mut last = self.refresh_gate.last.lock().await;

		let current = self.session.access_token();

		if let Some(current) = current.filter(|current| Some(current) != stale) {
			return Ok(current);
		}

		let settled =
			if self.refresh_gate.generation() != generation { last.replay() } else { None };

		if let Some(err) = settled {
			return Err(err);
		}

		self.refresh_recorded(&mut last).await
	}

	/// Samples the refresh generation; pair with [`Client::refresh_after_rejection`].
	pub(crate) fn refresh_generation(&self) -> u64 {
		self.refresh_gate.generation()
	}

	async fn refresh_recorded(&self, last: &mut LastRefresh) -> Result<TokenSecret> {
		let result = self.refresh_locked().await;

		*last = LastRefresh::from_result(&result);
		self.refresh_gate.generation.fetch_add(1, Ordering::AcqRel);

		result
	}

	async fn refresh_locked(&self) -> Result<TokenSecret> {
		obs::observe(FlowKind::Refresh, "refresh", async move {
			self.refresh_metrics.record_attempt();

			let result = match self.request_refresh().await {
				Ok(body) => self
					.session
					.merge_refresh(body.access_token, body.roles)
					.map(|record| record.access_token),
				Err(err) => Err(err),
			};

			match result {
				Ok(token) => {
					self.refresh_metrics.record_success();

					Ok(token)
				},
				Err(err) => {
					self.refresh_metrics.record_failure();
					self.expire_session(&err);

					Err(err)
				},
			}
		})
		.await
	}

	async fn request_refresh(&self) -> Result<RefreshResponse> {
		let request = ApiRequest::get(&self.config.endpoints.refresh);
		let response = self.send_public(&request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(Error::SessionExpired { status: Some(status.as_u16()) });
		}

		let body = http::read_json::<RefreshResponse>(FlowKind::Refresh, response)
			.await
			.map_err(|err| match err {
				Error::ResponseParse { .. } => Error::SessionExpired { status: Some(status.as_u16()) },
				other => other,
			})?;

		if body.access_token.is_empty() {
			return Err(Error::SessionExpired { status: Some(status.as_u16()) });
		}

		Ok(body)
	}

	fn expire_session(&self, cause: &Error) {
		obs::log_recovered(FlowKind::Refresh, cause);

		if let Err(err) = self.session.reset() {
			obs::log_recovered(FlowKind::Refresh, &err);
		}
	}
}
