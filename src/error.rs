//! Agent-level error types shared across the client, coordinator, and stores.

// self
use crate::_prelude::*;

/// Agent-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical agent error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Store(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); no response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Service returned a response with a non-success status.
	///
	/// The display form is `HTTP <status>: <body>`, which callers feed through
	/// [`extract_error_message`] to recover a user-facing message.
	#[error("HTTP {status}: {body}")]
	Http {
		/// HTTP status code outside the 2xx range.
		status: u16,
		/// Best-effort response body text (may be empty).
		body: String,
	},
	/// Response body declared JSON but did not match the expected shape.
	#[error("Response body did not match the expected shape.")]
	Decode {
		/// Structured parsing failure with the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Session could not be refreshed after an unauthenticated response.
	#[error("Session is no longer valid and could not be refreshed.")]
	AuthExpired,
	/// The login popup failed to open (blocked by the shell or browser).
	#[error("Login popup was blocked.")]
	PopupBlocked,
	/// The provider flow reported an explicit login error.
	#[error("Provider reported a login error: {message}.")]
	Provider {
		/// Provider-supplied error message.
		message: String,
	},
}

/// Configuration and validation failures raised by the agent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Service base URLs failed validation.
	#[error(transparent)]
	Endpoints(#[from] crate::client::EndpointsError),
	/// Login-provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::LoginProviderError),
	/// Popup timing configuration failed validation.
	#[error(transparent)]
	Timings(#[from] crate::popup::TimingsError),

	/// Provider login configuration is incomplete (missing client id or redirect).
	#[error("Login configuration for `{provider}` is incomplete.")]
	MissingClientConfig {
		/// Provider identifier string.
		provider: String,
	},
	/// A request path did not produce a valid URL against the service base.
	#[error("Request path `{path}` is invalid against the `{service}` base URL.")]
	InvalidPath {
		/// Service label the path was joined against.
		service: &'static str,
		/// Offending path.
		path: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Error body shape shared by the backend services.
///
/// Non-2xx responses carry a JSON body whose `message` field holds the user-facing
/// explanation; everything else about the body is service-specific and ignored here.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ApiErrorBody {
	/// Optional human-readable message supplied by the service.
	pub message: Option<String>,
}

/// Extracts a user-facing message from an [`Error`] with a fixed fallback order.
///
/// For [`Error::Http`] the body is tried as JSON first (`body.message`), then as raw text,
/// then `default`. [`Error::Provider`] yields the provider-supplied message. Every other
/// variant falls back to `default` — callers own the phrasing for transport-level failures.
pub fn extract_error_message(err: &Error, default: &str) -> String {
	match err {
		Error::Http { body, .. } => {
			if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body)
				&& let Some(message) = parsed.message
			{
				return message;
			}
			if body.is_empty() { default.to_owned() } else { body.clone() }
		},
		Error::Provider { message } if !message.is_empty() => message.clone(),
		_ => default.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn http_error_displays_wire_contract() {
		let err = Error::Http { status: 404, body: "{\"message\":\"not found\"}".into() };

		assert_eq!(err.to_string(), "HTTP 404: {\"message\":\"not found\"}");
	}

	#[test]
	fn extraction_prefers_json_message_field() {
		let err = Error::Http { status: 400, body: "{\"message\":\"bad input\"}".into() };

		assert_eq!(extract_error_message(&err, "fallback"), "bad input");
	}

	#[test]
	fn extraction_falls_back_to_raw_body_text() {
		let err = Error::Http { status: 500, body: "not json".into() };

		assert_eq!(extract_error_message(&err, "fallback"), "not json");

		let json_without_message = Error::Http { status: 500, body: "{\"code\":7}".into() };

		assert_eq!(extract_error_message(&json_without_message, "fallback"), "{\"code\":7}");
	}

	#[test]
	fn extraction_uses_default_when_nothing_usable() {
		let empty_body = Error::Http { status: 502, body: String::new() };

		assert_eq!(extract_error_message(&empty_body, "fallback"), "fallback");
		assert_eq!(extract_error_message(&Error::AuthExpired, "fallback"), "fallback");
		assert_eq!(extract_error_message(&Error::PopupBlocked, "fallback"), "fallback");
	}

	#[test]
	fn extraction_surfaces_provider_message() {
		let err = Error::Provider { message: "user cancelled consent".into() };

		assert_eq!(extract_error_message(&err, "fallback"), "user cancelled consent");
	}
}
