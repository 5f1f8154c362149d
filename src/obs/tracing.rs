// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// Span covering one flow invocation. A no-op unless the `tracing` feature is on.
///
/// The span is opened with an empty `outcome` field that [`FlowSpan::record_outcome`] fills once
/// the flow settles, so a single span line carries both the call site and its result.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `kind` at call site `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"calorie_session.flow",
					flow = kind.as_str(),
					stage,
					outcome = tracing::field::Empty,
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to `fut`; it is entered on every poll and never held across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> impl Future<Output = Fut::Output>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Fills the span's `outcome` field.
	pub fn record_outcome(&self, outcome: FlowOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = outcome;
		}
	}
}

/// Logs that a stored value was unreadable and a default was used instead.
pub fn log_storage_fallback(key: &str, reason: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(key, %reason, "stored value is unreadable; falling back to default");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, reason);
	}
}

/// Logs an error that was recovered without surfacing it to the user.
pub fn log_recovered(kind: FlowKind, err: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(flow = kind.as_str(), error = %err, "recovered flow failure");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, err);
	}
}
