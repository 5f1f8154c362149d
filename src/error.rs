//! Client-level error types shared across flows, the session, and stores.

// self
use crate::{_prelude::*, obs::FlowKind};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Form input rejected before any request was issued.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// No response was received from the backend.
	#[error(transparent)]
	NetworkUnreachable(#[from] TransportError),

	/// Backend rejected the submitted credentials.
	#[error("Backend rejected the credentials: {problem}.")]
	BadCredentials {
		/// Which credential problem the backend reported.
		problem: CredentialProblem,
	},
	/// Username or email is already registered.
	#[error("Username or email already exists.")]
	Conflict,
	/// The refresh credential was rejected; the session has been cleared.
	#[error("Session expired; the refresh credential was rejected.")]
	SessionExpired {
		/// HTTP status of the rejected refresh call, when one was received.
		status: Option<u16>,
	},
	/// Backend answered with a status the flow does not handle.
	#[error("The {flow} call returned HTTP {status}.")]
	UnexpectedStatus {
		/// Flow that observed the status.
		flow: FlowKind,
		/// HTTP status code.
		status: u16,
	},
	/// Backend responded with JSON that does not match the expected shape.
	#[error("The {flow} response could not be parsed.")]
	ResponseParse {
		/// Flow that received the payload.
		flow: FlowKind,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the short message a form renders inline next to its inputs.
	pub fn inline_message(&self) -> &'static str {
		match self {
			Self::NetworkUnreachable(_) => "No Server Response",
			Self::BadCredentials { problem } => problem.inline_message(),
			Self::Conflict => "Username or Email already exists",
			Self::Validation(err) => err.inline_message(),
			Self::SessionExpired { .. } => "Session expired",
			Self::UnexpectedStatus { flow, .. } | Self::ResponseParse { flow, .. } =>
				flow.failure_message(),
			Self::Storage(_) | Self::Config(_) => "Something went wrong",
		}
	}

	/// Returns `true` when the caller should treat the outcome as "no session".
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::SessionExpired { .. })
	}

	pub(crate) fn parse(
		flow: FlowKind,
		source: serde_path_to_error::Error<serde_json::Error>,
	) -> Self {
		Self::ResponseParse { flow, source }
	}
}

/// Credential problems reported by the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialProblem {
	/// HTTP 400: a username or password was not supplied.
	MissingCredentials,
	/// HTTP 401: the username/password pair is wrong.
	Unauthorized,
}
impl CredentialProblem {
	/// Classifies a token endpoint status, returning `None` for statuses outside 400/401.
	pub fn from_status(status: StatusCode) -> Option<Self> {
		match status {
			StatusCode::BAD_REQUEST => Some(Self::MissingCredentials),
			StatusCode::UNAUTHORIZED => Some(Self::Unauthorized),
			_ => None,
		}
	}

	/// Inline message rendered by the login form.
	pub const fn inline_message(self) -> &'static str {
		match self {
			Self::MissingCredentials => "Missing Username or Password",
			Self::Unauthorized => "Unauthorized",
		}
	}
}
impl Display for CredentialProblem {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::MissingCredentials => f.write_str("missing username or password"),
			Self::Unauthorized => f.write_str("unauthorized"),
		}
	}
}

/// Local form validation failures. None of these ever reach the network.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required field was left blank.
	#[error("The {field} field is required.")]
	MissingField {
		/// Form field name.
		field: &'static str,
	},
	/// Password and confirmation differ.
	#[error("Passwords do not match.")]
	PasswordMismatch,
}
impl ValidationError {
	/// Inline message rendered next to the offending field.
	pub const fn inline_message(&self) -> &'static str {
		match self {
			Self::MissingField { .. } => "Missing Username or Password",
			Self::PasswordMismatch => "Passwords do not match.",
		}
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL could not be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http(s) or cannot carry paths.
	#[error("Base URL `{url}` must be an http(s) URL that can carry paths.")]
	UnsupportedBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// An endpoint path could not be joined onto the base URL.
	#[error("Endpoint path `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Offending relative path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[from] serde_json::Error),
	/// Header value contains characters that cannot be sent.
	#[error("Header value is invalid.")]
	InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("No response was received from the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
