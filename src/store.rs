//! Durable keyed slot storage shared by the client and the popup coordinator.
//!
//! Slots are the agent's analog of a browser's `localStorage`: small string values under
//! well-known keys that must survive a shell relaunch (state nonces, the saved return path,
//! the callback fallback channel, and the optional bearer token). Implementations only need
//! `get`/`set`/`remove`; `remove` returns the previous value so read-once-and-clear slots
//! stay atomic at the call site.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, provider::ProviderId};

/// Boxed future type returned by [`SlotStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for durable string slots.
pub trait SlotStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `slot`, if any.
	fn get<'a>(&'a self, slot: &'a str) -> StoreFuture<'a, Option<String>>;

	/// Stores or replaces the value under `slot`.
	fn set<'a>(&'a self, slot: &'a str, value: &'a str) -> StoreFuture<'a, ()>;

	/// Removes the value under `slot`, returning the previous value when present.
	fn remove<'a>(&'a self, slot: &'a str) -> StoreFuture<'a, Option<String>>;
}

/// Error type produced by [`SlotStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Well-known slot keys shared between the agent and the callback pages.
pub mod slots {
	// self
	use super::*;

	/// Pointer slot a callback page writes when `postMessage` delivery is unreliable; its
	/// value names a second slot holding the JSON signal payload.
	pub const CALLBACK_EVENT: &str = "oauth_callback_event";
	/// Path to navigate to after a successful login; read once and cleared on use.
	pub const RETURN_PATH: &str = "oauth_redirect";
	/// Bearer token slot used by [`CredentialMode::BearerFromStore`].
	///
	/// [`CredentialMode::BearerFromStore`]: crate::client::CredentialMode::BearerFromStore
	pub const ACCESS_TOKEN: &str = "access_token";

	/// Per-provider slot holding the state nonce for a pending authorization.
	pub fn state_nonce(provider: &ProviderId) -> String {
		format!("{provider}_state")
	}
}
