//! Username/password exchange at the token endpoint.

// self
use crate::{
	_prelude::*,
	auth::{AuthRecord, Credentials, TokenSecret},
	error::CredentialProblem,
	flows::Client,
	http::{self, ApiRequest, HttpTransport},
	obs::{self, FlowKind},
};

#[derive(Deserialize)]
struct TokenResponse {
	access_token: TokenSecret,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Signs in and replaces the session record with `{ user, accessToken }`.
	///
	/// Blank fields are rejected before any request. The backend also sets the refresh cookie
	/// as a side effect, which the transport's cookie store keeps for [`Client::refresh`].
	pub async fn login(&self, credentials: &Credentials) -> Result<AuthRecord> {
		obs::observe(FlowKind::Login, "login", async move {
			credentials.validate()?;

			let request =
				ApiRequest::post(&self.config.endpoints.token).form(credentials.form_fields());
			let response = self.send_public(&request).await?;
			let status = response.status();

			if !status.is_success() {
				return Err(match CredentialProblem::from_status(status) {
					Some(problem) => Error::BadCredentials { problem },
					None =>
						Error::UnexpectedStatus { flow: FlowKind::Login, status: status.as_u16() },
				});
			}

			let body = http::read_json::<TokenResponse>(FlowKind::Login, response).await?;
			let record = AuthRecord::new(credentials.username.clone(), body.access_token);

			self.session.set_auth(record.clone())?;

			Ok(record)
		})
		.await
	}
}
