//! Start-up session bootstrap.
//!
//! Decides once, on start, whether a silent refresh has to happen before protected content may
//! render:
//!
//! | persist | token present | initial state | network |
//! |---------|---------------|---------------|---------|
//! | false   | any           | `Ready`       | none    |
//! | true    | yes           | `Ready`       | none    |
//! | true    | no            | `Checking`    | one refresh, then `Ready` |
//!
//! A failed refresh still ends in `Ready`; the route guard then redirects to the login view.
//! Dropping the future returned by [`Bootstrap::run`] before it resolves is harmless: the refresh
//! either committed atomically to the session or did not happen.

// self
use crate::{
	_prelude::*,
	flows::Client,
	http::HttpTransport,
	obs::{self, FlowKind, FlowSpan},
};

/// Render gate exposed to the view layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapState {
	/// A refresh is pending; show a loading indicator.
	Checking,
	/// Terminal: protected content may render (the route guard still applies).
	Ready,
}

/// Why the bootstrap reached [`BootstrapState::Ready`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapDecision {
	/// Persist flag is off; nothing was attempted.
	Skipped,
	/// A token was already in memory.
	AlreadyAuthenticated,
	/// The silent refresh produced a token.
	Refreshed,
	/// The silent refresh was rejected or unreachable; the session is empty.
	RefreshFailed,
}

/// One run of the start-up state machine.
#[derive(Debug)]
pub struct Bootstrap<'a, C>
where
	C: ?Sized + HttpTransport,
{
	client: &'a Client<C>,
	state: BootstrapState,
	decision: Option<BootstrapDecision>,
}
impl<'a, C> Bootstrap<'a, C>
where
	C: ?Sized + HttpTransport,
{
	/// Evaluates the initial state synchronously from the session.
	pub fn start(client: &'a Client<C>) -> Self {
		let decision = FlowSpan::new(FlowKind::Bootstrap, "start").in_scope(|| {
			if !client.session.persist() {
				Some(BootstrapDecision::Skipped)
			} else if client.session.is_authenticated() {
				Some(BootstrapDecision::AlreadyAuthenticated)
			} else {
				None
			}
		});
		let state = if decision.is_some() { BootstrapState::Ready } else { BootstrapState::Checking };

		Self { client, state, decision }
	}

	/// Current state.
	pub fn state(&self) -> BootstrapState {
		self.state
	}

	/// Outcome, once [`BootstrapState::Ready`] has been reached.
	pub fn decision(&self) -> Option<BootstrapDecision> {
		self.decision
	}

	/// Returns `true` once protected content may render.
	pub fn is_ready(&self) -> bool {
		self.state == BootstrapState::Ready
	}

	/// Drives the machine to [`BootstrapState::Ready`], refreshing at most once.
	///
	/// Calling `run` again after it finished returns the recorded decision without I/O.
	pub async fn run(&mut self) -> BootstrapDecision {
		if let Some(decision) = self.decision {
			return decision;
		}

		let span = FlowSpan::new(FlowKind::Bootstrap, "run");
		let decision = match span.instrument(self.client.refresh()).await {
			Ok(_) => BootstrapDecision::Refreshed,
			Err(err) => {
				obs::log_recovered(FlowKind::Bootstrap, &err);

				BootstrapDecision::RefreshFailed
			},
		};

		self.decision = Some(decision);
		self.state = BootstrapState::Ready;

		decision
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Runs the start-up bootstrap to completion.
	pub async fn bootstrap(&self) -> BootstrapDecision {
		Bootstrap::start(self).run().await
	}
}
