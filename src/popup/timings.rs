//! Validated timer configuration for popup login attempts.

// std
use std::time::Duration;
// self
use crate::_prelude::*;

/// Timer configuration for a popup login attempt.
///
/// The defaults match the production protocol: a 500 ms poll for the fallback slots and
/// popup liveness, a 3 s grace period after the popup closes without a signal, and a
/// 5 min absolute ceiling on the whole attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopupTimings {
	/// Interval for the fallback-slot and popup-liveness polls.
	pub poll_interval: Duration,
	/// Grace period after a close without a signal, tolerating a message posted just
	/// before the popup went away.
	pub close_grace: Duration,
	/// Absolute ceiling on the attempt.
	pub hard_timeout: Duration,
}
impl PopupTimings {
	/// Validates and stores a custom timing set.
	///
	/// The relative ordering `poll < grace < timeout` is required; tuned values may scale
	/// the protocol but must not invert it.
	pub fn new(
		poll_interval: Duration,
		close_grace: Duration,
		hard_timeout: Duration,
	) -> Result<Self, TimingsError> {
		if poll_interval.is_zero() {
			return Err(TimingsError::ZeroPollInterval);
		}
		if poll_interval >= close_grace || close_grace >= hard_timeout {
			return Err(TimingsError::InvertedOrdering {
				poll_interval,
				close_grace,
				hard_timeout,
			});
		}

		Ok(Self { poll_interval, close_grace, hard_timeout })
	}
}
impl Default for PopupTimings {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_millis(500),
			close_grace: Duration::from_secs(3),
			hard_timeout: Duration::from_secs(300),
		}
	}
}

/// Errors raised while validating popup timings.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TimingsError {
	/// The poll interval cannot be zero.
	#[error("Popup poll interval cannot be zero.")]
	ZeroPollInterval,
	/// The required `poll < grace < timeout` ordering does not hold.
	#[error(
		"Popup timings must satisfy poll < grace < timeout, got {poll_interval:?} / {close_grace:?} / {hard_timeout:?}."
	)]
	InvertedOrdering {
		/// Supplied poll interval.
		poll_interval: Duration,
		/// Supplied close-grace period.
		close_grace: Duration,
		/// Supplied hard timeout.
		hard_timeout: Duration,
	},
}
