//! Synchronous admission checks for protected views.

// self
use crate::{_prelude::*, session::Session};

/// Default login view.
pub const LOGIN_PATH: &str = "/login";
/// Where users land after login when no origin was recorded.
pub const HOME_PATH: &str = "/";

/// Outcome of a navigation check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
	/// The navigation may proceed.
	Admit,
	/// The navigation must be replaced by a visit to `to`; `from` is kept for the post-login hop.
	Redirect {
		/// Login view path.
		to: String,
		/// Originally requested path.
		from: String,
	},
}
impl Admission {
	/// Returns `true` for [`Admission::Admit`].
	pub fn is_admitted(&self) -> bool {
		matches!(self, Self::Admit)
	}
}

/// Gates protected paths on the presence of an access token.
///
/// The guard only reads the [`Session`]; it never touches storage or the network. Run it after
/// the bootstrap reached `Ready` so a persisted session had the chance to refresh.
#[derive(Clone, Debug)]
pub struct RouteGuard {
	login_path: String,
	public_paths: Vec<String>,
}
impl RouteGuard {
	/// Guard redirecting to `login_path`, which is always public.
	pub fn new(login_path: impl Into<String>) -> Self {
		let login_path = login_path.into();

		Self { public_paths: vec![login_path.clone()], login_path }
	}

	/// Adds paths that never require a session.
	pub fn with_public_paths<I, S>(mut self, paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.public_paths.extend(paths.into_iter().map(Into::into));

		self
	}

	/// Login view path.
	pub fn login_path(&self) -> &str {
		&self.login_path
	}

	/// Returns `true` if `path` is reachable without a session.
	pub fn is_public(&self, path: &str) -> bool {
		let path = normalize(path);

		self.public_paths.iter().any(|public| normalize(public) == path)
	}

	/// Admits `path` if it is public or the session holds an access token.
	pub fn check(&self, session: &Session, path: &str) -> Admission {
		if self.is_public(path) || session.is_authenticated() {
			return Admission::Admit;
		}

		Admission::Redirect { to: self.login_path.clone(), from: path.to_owned() }
	}

	/// Destination after a successful login: the recorded origin, or `/`.
	pub fn post_login_target<'a>(&self, from: Option<&'a str>) -> &'a str {
		match from {
			Some(origin) if !origin.is_empty() && normalize(origin) != normalize(&self.login_path) =>
				origin,
			_ => HOME_PATH,
		}
	}
}
impl Default for RouteGuard {
	fn default() -> Self {
		Self::new(LOGIN_PATH).with_public_paths(["/register", "/unauthorized"])
	}
}

fn normalize(path: &str) -> &str {
	let path = path.split(['?', '#']).next().unwrap_or_default();
	let trimmed = path.trim_end_matches('/');

	if trimmed.is_empty() { "/" } else { trimmed }
}
