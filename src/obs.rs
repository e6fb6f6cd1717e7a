//! Optional observability helpers for agent flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `login_agent.flow` with the `flow` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `login_agent_flow_total` counter for every
//!   attempt/success/failure/abandonment, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Agent flow kinds observed by the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Popup-coordinated provider login.
	PopupLogin,
	/// Cookie/bearer session refresh.
	Refresh,
	/// Logout teardown.
	Logout,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::PopupLogin => "popup_login",
			FlowKind::Refresh => "refresh",
			FlowKind::Logout => "logout",
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
	/// Entry to an agent flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Popup login abandoned without a signal (closed or timed out).
	Abandoned,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Abandoned => "abandoned",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
