//! Login and registration form payloads with their local validation rules.

// self
use crate::{_prelude::*, error::ValidationError};

/// Username/password pair submitted to the token endpoint.
#[derive(Clone)]
pub struct Credentials {
	/// Account username.
	pub username: String,
	/// Account password.
	pub password: String,
}
impl Credentials {
	/// Creates a credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: password.into() }
	}

	/// Rejects blank fields before any request is made.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.username.trim().is_empty() {
			return Err(ValidationError::MissingField { field: "username" });
		}
		if self.password.is_empty() {
			return Err(ValidationError::MissingField { field: "password" });
		}

		Ok(())
	}

	pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
		vec![
			("username".into(), self.username.clone()),
			("password".into(), self.password.clone()),
		]
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Sign-up form, including the confirmation field that never leaves the client.
#[derive(Clone)]
pub struct Registration {
	/// Desired username.
	pub username: String,
	/// Contact email.
	pub email: String,
	/// Chosen password.
	pub password: String,
	/// Password typed a second time.
	pub confirm_password: String,
	/// Current weight in kilograms.
	pub weight: f64,
	/// Height in centimetres.
	pub height: u32,
	/// Target weight in kilograms.
	pub target_weight: f64,
	/// Days allotted to reach the target.
	pub time_frame: u32,
}
impl Registration {
	/// Runs the checks the form performs before submitting.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.password != self.confirm_password {
			return Err(ValidationError::PasswordMismatch);
		}

		for (field, value) in [
			("username", &self.username),
			("email", &self.email),
			("password", &self.password),
		] {
			if value.trim().is_empty() {
				return Err(ValidationError::MissingField { field });
			}
		}

		Ok(())
	}

	pub(crate) fn payload(&self) -> RegistrationPayload<'_> {
		RegistrationPayload {
			username: &self.username,
			email: &self.email,
			password: &self.password,
			weight: self.weight,
			height: self.height,
			target_weight: self.target_weight,
			time_frame: self.time_frame,
		}
	}
}
impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registration")
			.field("username", &self.username)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("weight", &self.weight)
			.field("height", &self.height)
			.field("target_weight", &self.target_weight)
			.field("time_frame", &self.time_frame)
			.finish()
	}
}

/// Wire body for `POST auth/register`.
#[derive(Debug, Serialize)]
pub(crate) struct RegistrationPayload<'a> {
	username: &'a str,
	email: &'a str,
	password: &'a str,
	weight: f64,
	height: u32,
	target_weight: f64,
	time_frame: u32,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn registration() -> Registration {
		Registration {
			username: "alice".into(),
			email: "alice@example.com".into(),
			password: "correct".into(),
			confirm_password: "correct".into(),
			weight: 80.5,
			height: 170,
			target_weight: 70.0,
			time_frame: 6,
		}
	}

	#[test]
	fn mismatched_confirmation_is_rejected() {
		let form = Registration { confirm_password: "different".into(), ..registration() };

		assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
	}

	#[test]
	fn payload_omits_confirmation() {
		let value = serde_json::to_value(registration().payload())
			.expect("Registration payload should serialize.");

		assert_eq!(value["username"], "alice");
		assert_eq!(value["target_weight"], 70.0);
		assert_eq!(value["time_frame"], 6);
		assert!(value.get("confirm_password").is_none());
	}

	#[test]
	fn blank_login_fields_are_rejected() {
		assert_eq!(
			Credentials::new(" ", "pw").validate(),
			Err(ValidationError::MissingField { field: "username" })
		);
		assert_eq!(
			Credentials::new("alice", "").validate(),
			Err(ValidationError::MissingField { field: "password" })
		);
		assert!(Credentials::new("alice", "correct").validate().is_ok());
	}
}
