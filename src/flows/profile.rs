//! Current-user profile lookup.

// self
use crate::{
	_prelude::*,
	auth::UserProfile,
	flows::Client,
	http::{self, ApiRequest, HttpTransport},
	obs::{self, FlowKind},
};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Fetches the signed-in user's profile through the private request path.
	pub async fn current_user(&self) -> Result<UserProfile> {
		obs::observe(FlowKind::CurrentUser, "current_user", async move {
			let request = ApiRequest::get(&self.config.endpoints.current_user);
			let response = self.send_private(&request).await?;
			let status = response.status();

			if !status.is_success() {
				return Err(Error::UnexpectedStatus {
					flow: FlowKind::CurrentUser,
					status: status.as_u16(),
				});
			}

			http::read_json(FlowKind::CurrentUser, response).await
		})
		.await
	}
}
