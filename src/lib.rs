//! Client-side login agent for webview shells: popup-coordinated OAuth logins, cookie-session
//! HTTP with single-shot refresh retry, and an injectable session store.
//!
//! The crate covers the three pieces a shell needs to keep a backend session alive:
//!
//! - [`client::ServiceClient`] — an authenticated HTTP client that carries credentials on every
//!   request, detects HTTP 401, performs exactly one session refresh, and retries the original
//!   request exactly once.
//! - [`popup::PopupCoordinator`] — the popup-login handshake: it opens a provider authorize
//!   window, races a cross-window message channel against a durable-storage fallback poll, and
//!   releases every timer and listener on success, error, close, or timeout.
//! - [`session::SessionHandle`] — the shared session-state container both of the above mutate
//!   through named operations.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod popup;
pub mod provider;
pub mod session;
pub mod store;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
