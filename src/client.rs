//! Authenticated service client with single-shot refresh retry.
//!
//! [`ServiceClient`] issues every request with credentials attached, watches for
//! HTTP 401, refreshes the session through the auth service exactly once, and replays
//! the original request exactly once. Session flows (resolve, complete-login, profile
//! load, logout) live here too so the popup coordinator and the embedding shell share
//! one post-login path.

pub mod endpoints;

mod dispatch;
mod metrics;
mod session_flow;

pub use dispatch::{ApiBody, ApiCall};
pub use endpoints::{EndpointsError, Service, ServiceEndpoints};
pub use metrics::RefreshMetrics;

// std
use std::sync::atomic::AtomicU64;
// self
use crate::{_prelude::*, http::ApiTransport, session::SessionHandle, store::SlotStore};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Service client specialized for the crate's default reqwest transport.
pub type ReqwestServiceClient = ServiceClient<ReqwestTransport>;

/// How credentials ride on outbound requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CredentialMode {
	/// The session rides on a server-set cookie; the transport's cookie store carries it
	/// and no auth header is attached.
	#[default]
	CookieSession,
	/// A bearer token read from the `access_token` slot is attached as an `Authorization`
	/// header; successful refreshes rotate the stored token.
	BearerFromStore,
}

/// Coordinates authenticated requests against the auth, member, and cook services.
///
/// The client owns the transport, endpoint set, session handle, and slot store so the
/// dispatch and session-flow implementations can focus on retry and state semantics.
#[derive(Clone)]
pub struct ServiceClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// HTTP transport used for every outbound request.
	pub transport: Arc<C>,
	/// Validated service base URLs.
	pub endpoints: ServiceEndpoints,
	/// Shared session-state container this client mutates.
	pub session: SessionHandle,
	/// Durable slot store (bearer token, nonces, fallback channel).
	pub store: Arc<dyn SlotStore>,
	/// Credential mode applied to every request.
	pub credential_mode: CredentialMode,
	/// Shared metrics recorder for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	pub(crate) refresh_gate: Arc<AsyncMutex<()>>,
	pub(crate) refresh_epoch: Arc<AtomicU64>,
}
impl<C> ServiceClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		transport: impl Into<Arc<C>>,
		endpoints: ServiceEndpoints,
		session: SessionHandle,
		store: Arc<dyn SlotStore>,
		credential_mode: CredentialMode,
	) -> Self {
		Self {
			transport: transport.into(),
			endpoints,
			session,
			store,
			credential_mode,
			refresh_metrics: Default::default(),
			refresh_gate: Default::default(),
			refresh_epoch: Default::default(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl ServiceClient<ReqwestTransport> {
	/// Creates a client with the default cookie-carrying reqwest transport.
	pub fn new(
		endpoints: ServiceEndpoints,
		session: SessionHandle,
		store: Arc<dyn SlotStore>,
		credential_mode: CredentialMode,
	) -> Result<Self, ConfigError> {
		Ok(Self::with_transport(
			ReqwestTransport::try_default()?,
			endpoints,
			session,
			store,
			credential_mode,
		))
	}
}
impl<C> Debug for ServiceClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceClient")
			.field("endpoints", &self.endpoints)
			.field("credential_mode", &self.credential_mode)
			.finish()
	}
}
