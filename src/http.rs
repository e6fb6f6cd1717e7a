//! Transport primitives for the authenticated service client.
//!
//! The module exposes [`ApiTransport`] alongside the request/response model so downstream
//! shells can integrate custom HTTP stacks. The trait is the crate's only dependency on an
//! HTTP implementation; the default [`ReqwestTransport`] (feature `reqwest`) carries a
//! cookie store so server-set session cookies ride along automatically, matching how a
//! browser sends `credentials: "include"` requests.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// HTTP method subset used by the backend services.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP PATCH.
	Patch,
	/// HTTP DELETE.
	Delete,
}
impl HttpMethod {
	/// Canonical method token.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<HttpMethod> for reqwest::Method {
	fn from(method: HttpMethod) -> Self {
		match method {
			HttpMethod::Get => Self::GET,
			HttpMethod::Post => Self::POST,
			HttpMethod::Put => Self::PUT,
			HttpMethod::Patch => Self::PATCH,
			HttpMethod::Delete => Self::DELETE,
		}
	}
}

/// One part of a multipart form submission.
#[derive(Clone, Debug)]
pub enum MultipartPart {
	/// Plain text field.
	Text {
		/// Field name.
		name: String,
		/// Field value.
		value: String,
	},
	/// Binary attachment (an uploaded image, for instance).
	Bytes {
		/// Field name.
		name: String,
		/// Attached file name.
		file_name: String,
		/// MIME type of the attachment.
		content_type: String,
		/// Raw attachment bytes.
		data: Vec<u8>,
	},
}

/// Transport-agnostic multipart form model.
///
/// The client never serializes this itself; transports encode it with their own boundary
/// handling, the same way a browser owns the boundary for a `FormData` submission.
#[derive(Clone, Debug, Default)]
pub struct MultipartForm(pub Vec<MultipartPart>);
impl MultipartForm {
	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.push(MultipartPart::Text { name: name.into(), value: value.into() });

		self
	}

	/// Appends a binary attachment.
	pub fn bytes(
		mut self,
		name: impl Into<String>,
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		data: Vec<u8>,
	) -> Self {
		self.0.push(MultipartPart::Bytes {
			name: name.into(),
			file_name: file_name.into(),
			content_type: content_type.into(),
			data,
		});

		self
	}
}

/// Request body forms accepted by the client.
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// JSON body; the client declares `application/json` for it.
	Json(serde_json::Value),
	/// Multipart form; no JSON content type is ever attached to it.
	Multipart(MultipartForm),
}
impl RequestBody {
	/// Whether this body is a multipart form.
	pub fn is_multipart(&self) -> bool {
		matches!(self, Self::Multipart(_))
	}
}

/// Fully resolved request handed to a transport.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute request URL.
	pub url: Url,
	/// Additional headers (credentials included per the client's mode).
	pub headers: Vec<(String, String)>,
	/// Request body.
	pub body: RequestBody,
}

/// Transport response handed back to the client for interpretation.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Declared `Content-Type` header value, if any.
	pub content_type: Option<String>,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Whether the declared content type is JSON.
	pub fn declares_json(&self) -> bool {
		self.content_type
			.as_deref()
			.is_some_and(|ct| ct.split(';').next().unwrap_or_default().trim() == "application/json")
	}

	/// Best-effort body text.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Boxed future type returned by [`ApiTransport::execute`].
pub type TransportFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing service requests.
///
/// Callers provide an implementation (typically behind `Arc<T>`) and the client issues
/// every request through it, so tests can substitute scripted transports without touching
/// the retry or parsing logic. Implementations must be `Send + Sync + 'static` and return
/// `Send` futures so the client's boxed flows inherit the same guarantee.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes one request, returning the raw response or a transport failure.
	///
	/// Implementations must return `Err` only when no HTTP response was received; a non-2xx
	/// status is a valid [`ApiResponse`], not a transport error.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default constructor enables the cookie store; the backend sets the session cookie
/// on login and refresh, and the store replays it on every subsequent request. Configure
/// any custom [`ReqwestClient`] the same way before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a cookie store enabled.
	pub fn try_default() -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().cookie_store(true).build()?))
	}

	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse, ReqwestError> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(request.method.into(), request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name, value);
			}

			builder = match request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(value) => builder.json(&value),
				RequestBody::Multipart(form) => builder.multipart(build_multipart(form)?),
			};

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let content_type = response
				.headers()
				.get(reqwest::header::CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, content_type, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn build_multipart(form: MultipartForm) -> Result<reqwest::multipart::Form, ReqwestError> {
	let mut built = reqwest::multipart::Form::new();

	for part in form.0 {
		built = match part {
			MultipartPart::Text { name, value } => built.text(name, value),
			MultipartPart::Bytes { name, file_name, content_type, data } => {
				let part = reqwest::multipart::Part::bytes(data)
					.file_name(file_name)
					.mime_str(&content_type)?;

				built.part(name, part)
			},
		};
	}

	Ok(built)
}
