//! Window-message screening and the signal payload contract.
//!
//! Callback pages report back with a JSON object tagged `type`; the tag carries the
//! provider's success or error signal (`NAVER_LOGIN_SUCCESS`, `NAVER_LOGIN_ERROR`, ...).
//! Error payloads add an `error` field with the provider-supplied message. Anything that
//! fails screening is ignored without side effects so a hostile or unrelated window
//! cannot disturb a pending attempt.

// self
use crate::{_prelude::*, provider::LoginProvider};

/// One message received from another window, as forwarded by the shell.
#[derive(Clone, Debug)]
pub struct WindowMessage {
	/// Origin of the posting window.
	pub origin: String,
	/// Raw message payload.
	pub payload: serde_json::Value,
}

/// A screened login signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginSignal {
	/// The callback page reported a completed login.
	Success,
	/// The callback page reported a provider error.
	Error {
		/// Provider-supplied error message.
		message: String,
	},
}

/// Whether `origin` is acceptable for `app_origin`.
///
/// Exact match, or both are localhost development origins; ports may differ in the
/// latter case because dev setups split the shell and the callback pages across ports.
pub(crate) fn origin_acceptable(app_origin: &str, origin: &str) -> bool {
	origin == app_origin || (origin.contains("localhost") && app_origin.contains("localhost"))
}

/// Screens one window message against the provider's signal contract.
///
/// Returns `None` for anything that must be ignored: foreign origins, non-object
/// payloads, missing or unrecognized tags.
pub(crate) fn screen_message(
	app_origin: &str,
	provider: &LoginProvider,
	message: &WindowMessage,
) -> Option<LoginSignal> {
	if !origin_acceptable(app_origin, &message.origin) {
		return None;
	}

	let object = message.payload.as_object()?;
	let tag = object.get("type")?.as_str()?;

	if tag == provider.success_signal {
		Some(LoginSignal::Success)
	} else if tag == provider.error_signal {
		let message =
			object.get("error").and_then(|e| e.as_str()).unwrap_or_default().to_owned();

		Some(LoginSignal::Error { message })
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::well_known;

	const APP_ORIGIN: &str = "https://recipe.example.com";

	fn message(origin: &str, payload: serde_json::Value) -> WindowMessage {
		WindowMessage { origin: origin.into(), payload }
	}

	#[test]
	fn foreign_origins_are_ignored() {
		let provider = well_known::naver();
		let msg =
			message("https://evil.example.com", serde_json::json!({ "type": "NAVER_LOGIN_SUCCESS" }));

		assert_eq!(screen_message(APP_ORIGIN, &provider, &msg), None);
	}

	#[test]
	fn localhost_origins_may_differ_in_port() {
		let provider = well_known::naver();
		let msg =
			message("http://localhost:8081", serde_json::json!({ "type": "NAVER_LOGIN_SUCCESS" }));

		assert_eq!(
			screen_message("http://localhost:5173", &provider, &msg),
			Some(LoginSignal::Success),
		);
		assert_eq!(screen_message(APP_ORIGIN, &provider, &msg), None);
	}

	#[test]
	fn non_object_and_untagged_payloads_are_ignored() {
		let provider = well_known::google();

		assert_eq!(
			screen_message(APP_ORIGIN, &provider, &message(APP_ORIGIN, serde_json::json!("hi"))),
			None,
		);
		assert_eq!(
			screen_message(
				APP_ORIGIN,
				&provider,
				&message(APP_ORIGIN, serde_json::json!({ "status": "ok" })),
			),
			None,
		);
		assert_eq!(
			screen_message(
				APP_ORIGIN,
				&provider,
				&message(APP_ORIGIN, serde_json::json!({ "type": "KAKAO_LOGIN_SUCCESS" })),
			),
			None,
			"Another provider's tag must not settle this attempt.",
		);
	}

	#[test]
	fn error_signals_carry_the_provider_message() {
		let provider = well_known::kakao();
		let msg = message(
			APP_ORIGIN,
			serde_json::json!({ "type": "KAKAO_LOGIN_ERROR", "error": "consent denied" }),
		);

		assert_eq!(
			screen_message(APP_ORIGIN, &provider, &msg),
			Some(LoginSignal::Error { message: "consent denied".into() }),
		);

		let bare = message(APP_ORIGIN, serde_json::json!({ "type": "KAKAO_LOGIN_ERROR" }));

		assert_eq!(
			screen_message(APP_ORIGIN, &provider, &bare),
			Some(LoginSignal::Error { message: String::new() }),
		);
	}
}
