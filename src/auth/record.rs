//! The persisted identity + bearer credential pair.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Current authenticated identity and short-lived bearer credential.
///
/// The JSON layout is `{ "user", "accessToken", "roles"? }`. Records are replaced wholesale;
/// [`AuthRecord::refreshed`] is the only field-level merge.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRecord {
	/// Username the session belongs to.
	pub user: String,
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Roles granted by the refresh endpoint, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub roles: Option<Vec<String>>,
}
impl AuthRecord {
	/// Builds the record produced by a successful login.
	pub fn new(user: impl Into<String>, access_token: impl Into<TokenSecret>) -> Self {
		Self { user: user.into(), access_token: access_token.into(), roles: None }
	}

	/// Attaches a role list.
	pub fn with_roles<I, S>(mut self, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.roles = Some(roles.into_iter().map(Into::into).collect());

		self
	}

	/// Derives the record that follows a refresh: `user` is kept, token and roles are replaced.
	///
	/// Without a prior record the user is unknown and left empty.
	pub fn refreshed(
		prior: Option<&AuthRecord>,
		access_token: TokenSecret,
		roles: Option<Vec<String>>,
	) -> Self {
		let user = prior.map(|record| record.user.clone()).unwrap_or_default();

		Self { user, access_token, roles }
	}

	/// Returns `true` if the record carries a usable access token.
	pub fn has_token(&self) -> bool {
		!self.access_token.is_empty()
	}

	/// Returns `true` if the record lists `role`.
	pub fn has_role(&self, role: &str) -> bool {
		self.roles.as_deref().is_some_and(|roles| roles.iter().any(|r| r == role))
	}
}
impl Debug for AuthRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthRecord")
			.field("user", &self.user)
			.field("access_token", &"<redacted>")
			.field("roles", &self.roles)
			.finish()
	}
}
