//! Shared session-state container mutated by the client and the popup coordinator.
//!
//! The handle is explicitly owned and injected; nothing in the crate reaches for a global.
//! All mutation funnels through named operations so the invariants hold by construction:
//! a stored profile implies an authenticated session, and the initialization flag only
//! moves from `false` to `true` outside of an explicit [`reset`](SessionHandle::reset).

// self
use crate::_prelude::*;

/// Member profile as served by the member service's `/api/member/me` endpoint.
///
/// The wire shape is camelCase JSON; every field is optional because the service omits
/// what the member never filled in.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
	/// Member identifier.
	pub id: Option<u64>,
	/// Account email address.
	pub email: Option<String>,
	/// Legal or account name.
	pub name: Option<String>,
	/// Display nickname, preferred over `name` when present.
	pub nickname: Option<String>,
	/// Profile image URL.
	pub profile_image: Option<String>,
	/// Free-form biography.
	pub bio: Option<String>,
	/// Number of followers.
	pub follower_count: Option<u64>,
	/// Number of members this member follows.
	pub following_count: Option<u64>,
}
impl Profile {
	/// Name to display for this member: nickname when set, otherwise the account name.
	pub fn display_name(&self) -> Option<&str> {
		self.nickname.as_deref().filter(|n| !n.is_empty()).or(self.name.as_deref())
	}
}

/// Case-insensitive set of email addresses granted administrative access.
///
/// Admin status is always derived from this list at read time and never stored on the
/// session, so a stale flag cannot outlive an allowlist change.
#[derive(Clone, Debug, Default)]
pub struct AdminAllowlist(Vec<String>);
impl AdminAllowlist {
	/// Builds an allowlist from email addresses; entries are lowercased for comparison.
	pub fn new<I, S>(emails: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self(emails.into_iter().map(|e| e.as_ref().trim().to_lowercase()).collect())
	}

	/// Checks whether `email` belongs to the allowlist.
	pub fn contains(&self, email: &str) -> bool {
		let email = email.trim().to_lowercase();

		self.0.iter().any(|allowed| allowed == &email)
	}
}

/// Point-in-time copy of the session state for readers such as route guards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
	/// Whether the backend considers the session authenticated.
	pub authenticated: bool,
	/// Loaded member profile, if any.
	pub profile: Option<Profile>,
	/// Whether the first session resolution has completed.
	pub initialized: bool,
}

#[derive(Debug, Default)]
struct SessionState {
	authenticated: bool,
	profile: Option<Profile>,
	initialized: bool,
}

/// Cheaply cloneable handle to the shared session state.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
	state: Arc<RwLock<SessionState>>,
	admins: Arc<AdminAllowlist>,
}
impl SessionHandle {
	/// Creates a fresh, unauthenticated session with the provided admin allowlist.
	pub fn new(admins: AdminAllowlist) -> Self {
		Self { state: Arc::default(), admins: Arc::new(admins) }
	}

	/// Marks the session authenticated without touching the profile.
	///
	/// Used when the backend has confirmed the session (refresh or login) but the profile
	/// has not been fetched yet.
	pub fn mark_authenticated(&self) {
		self.state.write().authenticated = true;
	}

	/// Stores the profile and marks the session authenticated.
	///
	/// Setting a profile on an unauthenticated session would violate the container's
	/// invariant, so the flag is raised here rather than trusted to the caller.
	pub fn set_profile(&self, profile: Profile) {
		let mut state = self.state.write();

		state.profile = Some(profile);
		state.authenticated = true;
	}

	/// Drops the profile without touching the authenticated flag.
	pub fn clear_profile(&self) {
		self.state.write().profile = None;
	}

	/// Clears the profile and the authenticated flag together.
	pub fn mark_logged_out(&self) {
		let mut state = self.state.write();

		state.authenticated = false;
		state.profile = None;
	}

	/// Records that the first session resolution has completed.
	///
	/// Monotonic: once raised, only [`reset`](Self::reset) lowers it again.
	pub fn mark_initialized(&self) {
		self.state.write().initialized = true;
	}

	/// Restores the pristine state, initialization flag included.
	pub fn reset(&self) {
		let mut state = self.state.write();

		*state = SessionState::default();
	}

	/// Takes a consistent point-in-time copy of the session.
	pub fn snapshot(&self) -> SessionSnapshot {
		let state = self.state.read();

		SessionSnapshot {
			authenticated: state.authenticated,
			profile: state.profile.clone(),
			initialized: state.initialized,
		}
	}

	/// Whether the backend considers the session authenticated.
	pub fn is_authenticated(&self) -> bool {
		self.state.read().authenticated
	}

	/// Whether the first session resolution has completed.
	pub fn is_initialized(&self) -> bool {
		self.state.read().initialized
	}

	/// Whether the current profile's email belongs to the admin allowlist.
	pub fn is_admin(&self) -> bool {
		let state = self.state.read();

		state
			.profile
			.as_ref()
			.and_then(|profile| profile.email.as_deref())
			.is_some_and(|email| self.admins.contains(email))
	}

	/// Display name of the current member, if a profile is loaded.
	pub fn display_name(&self) -> Option<String> {
		self.state.read().profile.as_ref().and_then(|p| p.display_name().map(str::to_owned))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn profile_with_email(email: &str) -> Profile {
		Profile { email: Some(email.into()), name: Some("Fixture".into()), ..Default::default() }
	}

	#[test]
	fn set_profile_implies_authenticated() {
		let session = SessionHandle::default();

		assert!(!session.is_authenticated());

		session.set_profile(profile_with_email("member@example.com"));

		let snapshot = session.snapshot();

		assert!(snapshot.authenticated);
		assert!(snapshot.profile.is_some());
	}

	#[test]
	fn logged_out_clears_profile_and_flag_but_not_initialized() {
		let session = SessionHandle::default();

		session.set_profile(profile_with_email("member@example.com"));
		session.mark_initialized();
		session.mark_logged_out();

		let snapshot = session.snapshot();

		assert!(!snapshot.authenticated);
		assert!(snapshot.profile.is_none());
		assert!(snapshot.initialized, "Logout must not lower the initialization flag.");
	}

	#[test]
	fn reset_restores_pristine_state() {
		let session = SessionHandle::default();

		session.set_profile(profile_with_email("member@example.com"));
		session.mark_initialized();
		session.reset();

		assert_eq!(session.snapshot(), SessionSnapshot::default());
	}

	#[test]
	fn admin_is_derived_from_allowlist_case_insensitively() {
		let session = SessionHandle::new(AdminAllowlist::new(["Admin@Example.com"]));

		assert!(!session.is_admin(), "No profile means no admin access.");

		session.set_profile(profile_with_email("admin@example.com"));

		assert!(session.is_admin());

		session.set_profile(profile_with_email("member@example.com"));

		assert!(!session.is_admin());
	}

	#[test]
	fn display_name_prefers_nickname() {
		let profile = Profile {
			name: Some("Account Name".into()),
			nickname: Some("cook42".into()),
			..Default::default()
		};

		assert_eq!(profile.display_name(), Some("cook42"));

		let no_nickname = Profile { name: Some("Account Name".into()), ..Default::default() };

		assert_eq!(no_nickname.display_name(), Some("Account Name"));

		let empty_nickname = Profile {
			name: Some("Account Name".into()),
			nickname: Some(String::new()),
			..Default::default()
		};

		assert_eq!(empty_nickname.display_name(), Some("Account Name"));
	}

	#[test]
	fn profile_decodes_camel_case_payload() {
		let payload = r#"{
			"id": 7,
			"email": "member@example.com",
			"nickname": "cook42",
			"profileImage": "https://cdn.example.com/p/7.png",
			"followerCount": 12
		}"#;
		let profile: Profile =
			serde_json::from_str(payload).expect("Fixture payload should decode.");

		assert_eq!(profile.id, Some(7));
		assert_eq!(profile.profile_image.as_deref(), Some("https://cdn.example.com/p/7.png"));
		assert_eq!(profile.follower_count, Some(12));
		assert_eq!(profile.bio, None);
	}
}
