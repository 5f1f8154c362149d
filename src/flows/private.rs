//! Bearer-authenticated requests with a single silent refresh-and-retry.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	flows::Client,
	http::{ApiRequest, HttpTransport},
	obs::{self, FlowKind},
};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Sends `request` with the session's current bearer token.
	///
	/// The token is read when the call starts, not when the client was built. A 401 triggers one
	/// refresh and one retry carrying the refreshed token; the retry's response is returned as
	/// is, even if it is another 401. If the refresh itself fails the session is already empty
	/// and [`Error::SessionExpired`] (or the transport error) is returned; requests that were in
	/// flight alongside it get the same error without a second refresh call.
	pub async fn send_private(&self, request: &ApiRequest) -> Result<Response> {
		obs::observe(FlowKind::PrivateRequest, "send_private", async move {
			let generation = self.refresh_generation();
			let token = self.session.access_token();
			let response = self.dispatch_private(request, token.as_ref()).await?;

			if response.status() != StatusCode::UNAUTHORIZED {
				return Ok(response);
			}

			let refreshed = self.refresh_after_rejection(token.as_ref(), generation).await?;

			self.dispatch_private(request, Some(&refreshed)).await
		})
		.await
	}

	async fn dispatch_private(
		&self,
		request: &ApiRequest,
		token: Option<&TokenSecret>,
	) -> Result<Response> {
		let request = request.build(&self.config, token)?;

		Ok(self.http_client.execute(request).await?)
	}
}
