// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the session-refresh probe.
///
/// An attempt is one `/api/auth/refresh` round trip; it is confirmed when the probe came
/// back with a live session and denied otherwise (a non-2xx answer and an unreachable
/// auth service count the same). These are always on, independent of the `metrics`
/// feature, so the single-refresh contract stays observable from tests and demos.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	confirmed: AtomicU64,
	denied: AtomicU64,
}
impl RefreshMetrics {
	/// Refresh round trips started.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Attempts that confirmed a live session.
	pub fn successes(&self) -> u64 {
		self.confirmed.load(Ordering::Relaxed)
	}

	/// Attempts that did not.
	pub fn failures(&self) -> u64 {
		self.denied.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_settled(&self, refreshed: bool) {
		if refreshed {
			self.confirmed.fetch_add(1, Ordering::Relaxed);
		} else {
			self.denied.fetch_add(1, Ordering::Relaxed);
		}
	}
}
