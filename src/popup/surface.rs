//! The shell-facing seam for opening and watching popup windows.

// self
use crate::_prelude::*;

/// Handle to one opened popup window.
pub trait PopupHandle
where
	Self: Send + Sync,
{
	/// Whether the window has been closed (by the user or by a callback page).
	fn is_closed(&self) -> bool;

	/// Closes the window; best-effort, a failure is swallowed by callers.
	fn close(&self);
}

/// Abstraction over the embedding shell's window manager.
///
/// The coordinator never talks to a windowing system directly; the shell implements this
/// trait over whatever it embeds (a webview, a system browser, a test double).
pub trait PopupSurface
where
	Self: Send + Sync,
{
	/// Opens `url` in a named popup with the provider's feature string.
	///
	/// Returns `None` when the popup was blocked, which surfaces to the caller as
	/// [`Error::PopupBlocked`](crate::error::Error::PopupBlocked).
	fn open(&self, url: &Url, name: &str, features: &str) -> Option<Arc<dyn PopupHandle>>;
}
