//! Session flows: refresh, first resolution, post-login completion, profile load, logout.
//!
//! [`ServiceClient::resolve_session`] is the shell's startup gate (run it before the
//! first guarded route renders), and [`ServiceClient::complete_login`] is the single
//! post-login path shared with the popup coordinator so the session is always brought
//! up the same way.

// self
use crate::{
	_prelude::*,
	client::{ApiCall, CredentialMode, Service, ServiceClient},
	http::ApiTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::Profile,
	store::slots,
};

/// Refresh endpoint response body; only present (and only read) in bearer mode.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RefreshGrant {
	access_token: Option<String>,
}

impl<C> ServiceClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Asks the auth service to refresh the session cookie (or bearer token).
	///
	/// Returns whether a live session now exists. A non-2xx answer (401 for "not logged
	/// in" included) and a transport failure both come back as `false`; this call never
	/// errors, matching its role as a probe.
	pub async fn refresh_session(&self) -> bool {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_session");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let refreshed = span
			.instrument(async {
				let response =
					match self.issue(&ApiCall::post(Service::Auth, "/api/auth/refresh")).await {
						Ok(response) => response,
						Err(e) => {
							obs::note_swallowed("refresh_transport", &e.to_string());

							return false;
						},
					};

				if !response.is_success() {
					return false;
				}
				if self.credential_mode == CredentialMode::BearerFromStore {
					self.rotate_bearer(&response.body).await;
				}

				true
			})
			.await;

		self.refresh_metrics.record_settled(refreshed);

		if refreshed {
			obs::record_flow_outcome(KIND, FlowOutcome::Success);
		} else {
			obs::record_flow_outcome(KIND, FlowOutcome::Failure);
		}

		refreshed
	}

	/// Loads the member profile from the member service.
	pub async fn load_profile(&self) -> Result<Profile> {
		self.call_json(ApiCall::get(Service::Member, "/api/member/me")).await
	}

	/// Resolves the session once at startup: refresh, then load the profile on success.
	///
	/// Always marks the session initialized, so route guards waiting on the flag are
	/// released on every path. A profile-load failure is tolerated (the session stays
	/// authenticated without a profile). Returns whether a session exists.
	pub async fn resolve_session(&self) -> bool {
		let alive = self.refresh_session().await;

		if alive {
			self.session.mark_authenticated();
			self.reload_profile().await;
		} else {
			self.session.mark_logged_out();
		}

		self.session.mark_initialized();

		alive
	}

	/// Brings the session up after a confirmed login: authenticated flag plus a fresh
	/// profile. Shared by the popup coordinator's success branch and out-of-band logins.
	pub async fn complete_login(&self) {
		self.session.mark_authenticated();
		self.reload_profile().await;
	}

	/// Logs out: best-effort server call, then unconditional local teardown.
	pub async fn logout(&self) {
		const KIND: FlowKind = FlowKind::Logout;

		let span = FlowSpan::new(KIND, "logout");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		span.instrument(async {
			match self.issue(&ApiCall::post(Service::Auth, "/api/auth/logout")).await {
				Ok(response) if response.is_success() =>
					obs::record_flow_outcome(KIND, FlowOutcome::Success),
				Ok(response) => {
					obs::note_swallowed("logout_status", &response.status.to_string());
					obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				},
				Err(e) => {
					obs::note_swallowed("logout_transport", &e.to_string());
					obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				},
			}
		})
		.await;

		if self.credential_mode == CredentialMode::BearerFromStore
			&& let Err(e) = self.store.remove(slots::ACCESS_TOKEN).await
		{
			obs::note_swallowed("bearer_clear", &e.to_string());
		}

		self.session.mark_logged_out();
	}

	async fn reload_profile(&self) {
		match self.load_profile().await {
			Ok(profile) => self.session.set_profile(profile),
			Err(e) => {
				obs::note_swallowed("profile_load", &e.to_string());
				self.session.clear_profile();
			},
		}
	}

	async fn rotate_bearer(&self, body: &[u8]) {
		let grant: RefreshGrant = match serde_json::from_slice(body) {
			Ok(grant) => grant,
			Err(e) => {
				obs::note_swallowed("bearer_rotate", &e.to_string());

				return;
			},
		};

		if let Some(token) = grant.access_token
			&& let Err(e) = self.store.set(slots::ACCESS_TOKEN, &token).await
		{
			obs::note_swallowed("bearer_rotate", &e.to_string());
		}
	}
}
