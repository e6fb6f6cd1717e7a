//! Login-provider descriptors consumed by the popup coordinator.
//!
//! A descriptor captures everything the coordinator needs to drive one provider's popup
//! hop: the authorize endpoint, the success/error signal tags its callback pages post
//! back, and the window parameters for the popup itself. Descriptors are validated at
//! construction so flows never have to re-check them.

pub mod builder;
pub mod well_known;

pub use builder::*;

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const PROVIDER_ID_MAX_LEN: usize = 64;

/// Identifier for a login provider (`naver`, `google`, `kakao`, ...).
///
/// Lowercase ASCII alphanumerics only; the identifier doubles as the prefix of the
/// provider's state-nonce slot and, uppercased, of its signal tags.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);
impl ProviderId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, LoginProviderError> {
		let view = value.as_ref();

		validate_id(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for ProviderId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProviderId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ProviderId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ProviderId> for String {
	fn from(value: ProviderId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderId {
	type Error = LoginProviderError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_id(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for ProviderId {
	type Err = LoginProviderError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Provider({})", self.0)
	}
}
impl Display for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_id(view: &str) -> Result<(), LoginProviderError> {
	if view.is_empty() {
		return Err(LoginProviderError::EmptyId);
	}
	if !view.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
		return Err(LoginProviderError::InvalidIdCharacters { id: view.to_owned() });
	}
	if view.len() > PROVIDER_ID_MAX_LEN {
		return Err(LoginProviderError::IdTooLong { max: PROVIDER_ID_MAX_LEN });
	}

	Ok(())
}

/// Errors raised while constructing or validating login providers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum LoginProviderError {
	/// The identifier was empty.
	#[error("Provider identifier cannot be empty.")]
	EmptyId,
	/// The identifier contains characters outside lowercase ASCII alphanumerics.
	#[error("Provider identifier `{id}` must be lowercase ASCII alphanumeric.")]
	InvalidIdCharacters {
		/// Offending identifier.
		id: String,
	},
	/// The identifier exceeded the allowed character count.
	#[error("Provider identifier exceeds {max} characters.")]
	IdTooLong {
		/// Maximum permitted character count.
		max: usize,
	},
	/// Authorize endpoint is required.
	#[error("Missing authorize endpoint.")]
	MissingAuthorizeEndpoint,
	/// Authorize endpoints must use HTTPS.
	#[error("The authorize endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Signal tags must be non-empty and distinct.
	#[error("The {which} signal tag is invalid.")]
	InvalidSignalTag {
		/// Which tag failed validation.
		which: &'static str,
	},
}

/// Immutable login-provider descriptor consumed by the popup coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginProvider {
	/// Provider identifier.
	pub id: ProviderId,
	/// Authorization endpoint the popup navigates to.
	pub authorize_endpoint: Url,
	/// Signal tag posted by callback pages on success.
	pub success_signal: String,
	/// Signal tag posted by callback pages on error.
	pub error_signal: String,
	/// Name the popup window is opened under.
	pub window_name: String,
	/// Window feature string passed to the surface.
	pub window_features: String,
}
impl LoginProvider {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> LoginProviderBuilder {
		LoginProviderBuilder::new(id)
	}

	/// Checks whether `tag` matches either of this provider's signal tags.
	pub fn recognizes_signal(&self, tag: &str) -> bool {
		tag == self.success_signal || tag == self.error_signal
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn id_validation_rejects_bad_shapes() {
		assert_eq!(ProviderId::new(""), Err(LoginProviderError::EmptyId));
		assert!(matches!(
			ProviderId::new("Naver"),
			Err(LoginProviderError::InvalidIdCharacters { .. })
		));
		assert!(matches!(
			ProviderId::new("na ver"),
			Err(LoginProviderError::InvalidIdCharacters { .. })
		));
		assert!(ProviderId::new("kakao").is_ok());
	}

	#[test]
	fn descriptor_round_trips_through_serde() {
		let provider = well_known::naver();
		let json = serde_json::to_string(&provider).expect("Descriptor should serialize.");
		let back: LoginProvider =
			serde_json::from_str(&json).expect("Descriptor should deserialize.");

		assert_eq!(back, provider);
	}

	#[test]
	fn id_round_trips_through_serde() {
		let id = ProviderId::new("google").expect("Provider fixture should be valid.");
		let json = serde_json::to_string(&id).expect("Provider id should serialize.");

		assert_eq!(json, "\"google\"");

		let back: ProviderId =
			serde_json::from_str(&json).expect("Provider id should deserialize.");

		assert_eq!(back, id);
		assert!(serde_json::from_str::<ProviderId>("\"BAD ID\"").is_err());
	}
}
