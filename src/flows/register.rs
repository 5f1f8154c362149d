//! Account registration.

// self
use crate::{
	_prelude::*,
	auth::Registration,
	flows::Client,
	http::{ApiRequest, HttpTransport},
	obs::{self, FlowKind},
};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an account. The session is left untouched; the user signs in afterwards.
	///
	/// A mismatched password confirmation fails locally without any request.
	pub async fn register(&self, registration: &Registration) -> Result<()> {
		obs::observe(FlowKind::Register, "register", async move {
			registration.validate()?;

			let request = ApiRequest::post(&self.config.endpoints.register)
				.json(&registration.payload())?;
			let response = self.send_public(&request).await?;
			let status = response.status();

			if status.is_success() {
				return Ok(());
			}
			if status == StatusCode::CONFLICT {
				return Err(Error::Conflict);
			}

			Err(Error::UnexpectedStatus { flow: FlowKind::Register, status: status.as_u16() })
		})
		.await
	}
}
