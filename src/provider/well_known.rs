//! Descriptors for the production login providers.

// self
use crate::{
	_prelude::*,
	provider::{LoginProvider, LoginProviderError, ProviderId},
};

fn descriptor(id: &str, authorize: &str) -> Result<LoginProvider, LoginProviderError> {
	let id = ProviderId::new(id)?;
	let authorize_endpoint = Url::parse(authorize)
		.map_err(|_| LoginProviderError::InsecureEndpoint { url: authorize.to_owned() })?;

	LoginProvider::builder(id).authorize_endpoint(authorize_endpoint).build()
}

/// Naver login descriptor.
pub fn naver() -> LoginProvider {
	descriptor("naver", "https://nid.naver.com/oauth2.0/authorize")
		.unwrap_or_else(|e| unreachable!("Static Naver descriptor must validate: {e}"))
}

/// Google login descriptor.
pub fn google() -> LoginProvider {
	descriptor("google", "https://accounts.google.com/o/oauth2/v2/auth")
		.unwrap_or_else(|e| unreachable!("Static Google descriptor must validate: {e}"))
}

/// Kakao login descriptor.
pub fn kakao() -> LoginProvider {
	descriptor("kakao", "https://kauth.kakao.com/oauth/authorize")
		.unwrap_or_else(|e| unreachable!("Static Kakao descriptor must validate: {e}"))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn production_descriptors_validate() {
		for (provider, tag) in
			[(naver(), "NAVER"), (google(), "GOOGLE"), (kakao(), "KAKAO")]
		{
			assert_eq!(provider.authorize_endpoint.scheme(), "https");
			assert_eq!(provider.success_signal, format!("{tag}_LOGIN_SUCCESS"));
			assert_eq!(provider.error_signal, format!("{tag}_LOGIN_ERROR"));
		}
	}
}
