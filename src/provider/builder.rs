//! Validated construction of login-provider descriptors.

// self
use crate::{
	_prelude::*,
	provider::{LoginProvider, LoginProviderError, ProviderId},
};

const DEFAULT_WINDOW_FEATURES: &str = "width=500,height=600,scrollbars=yes,resizable=yes";

/// Builder for [`LoginProvider`] values.
#[derive(Debug)]
pub struct LoginProviderBuilder {
	/// Identifier for the provider being constructed.
	pub id: ProviderId,
	/// Authorize endpoint (required).
	pub authorize_endpoint: Option<Url>,
	/// Optional success signal tag override.
	pub success_signal: Option<String>,
	/// Optional error signal tag override.
	pub error_signal: Option<String>,
	/// Optional popup window name override.
	pub window_name: Option<String>,
	/// Window feature string passed to the surface.
	pub window_features: String,
}
impl LoginProviderBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			authorize_endpoint: None,
			success_signal: None,
			error_signal: None,
			window_name: None,
			window_features: DEFAULT_WINDOW_FEATURES.into(),
		}
	}

	/// Sets the authorize endpoint.
	pub fn authorize_endpoint(mut self, url: Url) -> Self {
		self.authorize_endpoint = Some(url);

		self
	}

	/// Overrides the success signal tag.
	pub fn success_signal(mut self, tag: impl Into<String>) -> Self {
		self.success_signal = Some(tag.into());

		self
	}

	/// Overrides the error signal tag.
	pub fn error_signal(mut self, tag: impl Into<String>) -> Self {
		self.error_signal = Some(tag.into());

		self
	}

	/// Overrides the popup window name.
	pub fn window_name(mut self, name: impl Into<String>) -> Self {
		self.window_name = Some(name.into());

		self
	}

	/// Overrides the window feature string.
	pub fn window_features(mut self, features: impl Into<String>) -> Self {
		self.window_features = features.into();

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	///
	/// Signal tags default to `{ID}_LOGIN_SUCCESS` / `{ID}_LOGIN_ERROR` with the
	/// identifier uppercased, and the window name defaults to `{id}Login`; both match the
	/// contract the backend's callback pages post.
	pub fn build(self) -> Result<LoginProvider, LoginProviderError> {
		let authorize_endpoint =
			self.authorize_endpoint.ok_or(LoginProviderError::MissingAuthorizeEndpoint)?;
		let upper = self.id.to_uppercase();
		let success_signal =
			self.success_signal.unwrap_or_else(|| format!("{upper}_LOGIN_SUCCESS"));
		let error_signal = self.error_signal.unwrap_or_else(|| format!("{upper}_LOGIN_ERROR"));
		let window_name = self.window_name.unwrap_or_else(|| format!("{}Login", &*self.id));
		let provider = LoginProvider {
			id: self.id,
			authorize_endpoint,
			success_signal,
			error_signal,
			window_name,
			window_features: self.window_features,
		};

		provider.validate()?;

		Ok(provider)
	}
}

impl LoginProvider {
	fn validate(&self) -> Result<(), LoginProviderError> {
		if self.authorize_endpoint.scheme() != "https" {
			return Err(LoginProviderError::InsecureEndpoint {
				url: self.authorize_endpoint.to_string(),
			});
		}
		if self.success_signal.is_empty() {
			return Err(LoginProviderError::InvalidSignalTag { which: "success" });
		}
		if self.error_signal.is_empty() || self.error_signal == self.success_signal {
			return Err(LoginProviderError::InvalidSignalTag { which: "error" });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn fixture_id() -> ProviderId {
		ProviderId::new("naver").expect("Provider fixture should be valid.")
	}

	#[test]
	fn signal_tags_default_from_the_identifier() {
		let provider = LoginProvider::builder(fixture_id())
			.authorize_endpoint(
				Url::parse("https://nid.naver.com/oauth2.0/authorize")
					.expect("Fixture URL should parse."),
			)
			.build()
			.expect("Builder should accept the fixture descriptor.");

		assert_eq!(provider.success_signal, "NAVER_LOGIN_SUCCESS");
		assert_eq!(provider.error_signal, "NAVER_LOGIN_ERROR");
		assert_eq!(provider.window_name, "naverLogin");
		assert!(provider.recognizes_signal("NAVER_LOGIN_ERROR"));
		assert!(!provider.recognizes_signal("KAKAO_LOGIN_SUCCESS"));
	}

	#[test]
	fn insecure_authorize_endpoint_is_rejected() {
		let result = LoginProvider::builder(fixture_id())
			.authorize_endpoint(
				Url::parse("http://nid.naver.com/oauth2.0/authorize")
					.expect("Fixture URL should parse."),
			)
			.build();

		assert!(matches!(result, Err(LoginProviderError::InsecureEndpoint { .. })));
	}

	#[test]
	fn missing_authorize_endpoint_is_rejected() {
		assert_eq!(
			LoginProvider::builder(fixture_id()).build(),
			Err(LoginProviderError::MissingAuthorizeEndpoint),
		);
	}

	#[test]
	fn identical_signal_tags_are_rejected() {
		let result = LoginProvider::builder(fixture_id())
			.authorize_endpoint(
				Url::parse("https://nid.naver.com/oauth2.0/authorize")
					.expect("Fixture URL should parse."),
			)
			.success_signal("SAME")
			.error_signal("SAME")
			.build();

		assert_eq!(result, Err(LoginProviderError::InvalidSignalTag { which: "error" }));
	}
}
