//! Optional observability helpers for session flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `calorie_session.flow` with the `flow`,
//!   `stage` (call site), and `outcome` fields, plus `warn!` events for silently recovered
//!   failures.
//! - Enable `metrics` to increment the `calorie_session_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Session flow kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Username/password exchange at the token endpoint.
	Login,
	/// Account registration.
	Register,
	/// Silent access-token refresh.
	Refresh,
	/// Current user profile lookup.
	CurrentUser,
	/// Bearer-authenticated request issued through the retry-once interceptor.
	PrivateRequest,
	/// Start-up session bootstrap.
	Bootstrap,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Login => "login",
			FlowKind::Register => "register",
			FlowKind::Refresh => "refresh",
			FlowKind::CurrentUser => "current_user",
			FlowKind::PrivateRequest => "private_request",
			FlowKind::Bootstrap => "bootstrap",
		}
	}

	/// Generic inline message shown when the flow fails for an unclassified reason.
	pub const fn failure_message(self) -> &'static str {
		match self {
			FlowKind::Login => "Login Failed",
			FlowKind::Register => "Registration Failed",
			FlowKind::Refresh | FlowKind::Bootstrap => "Session expired",
			FlowKind::CurrentUser => "Failed to fetch user data. Please try again.",
			FlowKind::PrivateRequest => "Request Failed",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a flow span and records attempt/success/failure around it.
pub(crate) async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;
	let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

	span.record_outcome(outcome);
	record_flow_outcome(kind, outcome);

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::PrivateRequest.to_string(), "private_request");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
		assert_eq!(FlowKind::Register.failure_message(), "Registration Failed");
	}
}
