//! Request dispatch: credential attachment, the 401 refresh-and-retry contract, and
//! response-body interpretation.

// std
use std::sync::atomic::Ordering;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::{CredentialMode, Service, ServiceClient},
	error::TransportError,
	http::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, MultipartForm, RequestBody},
	obs,
	store::slots,
};

/// One request against a backend service.
#[derive(Clone, Debug)]
pub struct ApiCall {
	/// Target service.
	pub service: Service,
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute request path (must start with `/`).
	pub path: String,
	/// Request body.
	pub body: RequestBody,
}
impl ApiCall {
	/// Creates a call with the given method and no body.
	pub fn new(service: Service, method: HttpMethod, path: impl Into<String>) -> Self {
		Self { service, method, path: path.into(), body: RequestBody::Empty }
	}

	/// Shorthand for a GET call.
	pub fn get(service: Service, path: impl Into<String>) -> Self {
		Self::new(service, HttpMethod::Get, path)
	}

	/// Shorthand for a POST call.
	pub fn post(service: Service, path: impl Into<String>) -> Self {
		Self::new(service, HttpMethod::Post, path)
	}

	/// Shorthand for a DELETE call.
	pub fn delete(service: Service, path: impl Into<String>) -> Self {
		Self::new(service, HttpMethod::Delete, path)
	}

	/// Attaches a JSON body.
	pub fn with_json(mut self, value: serde_json::Value) -> Self {
		self.body = RequestBody::Json(value);

		self
	}

	/// Attaches a multipart form body.
	pub fn with_multipart(mut self, form: MultipartForm) -> Self {
		self.body = RequestBody::Multipart(form);

		self
	}
}

/// Interpreted 2xx response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiBody {
	/// Empty response body.
	Empty,
	/// Body declared and parsed as JSON.
	Json(serde_json::Value),
	/// Plain (or unparseable declared-JSON) body text.
	Text(String),
}
impl ApiBody {
	/// The parsed JSON value, if this body is JSON.
	pub fn json(&self) -> Option<&serde_json::Value> {
		match self {
			Self::Json(value) => Some(value),
			_ => None,
		}
	}
}

impl<C> ServiceClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Issues a call with the full credential and retry contract applied.
	///
	/// On HTTP 401 the session is refreshed at most once and the original request is
	/// replayed at most once; the second response is final. Concurrent 401s coalesce into
	/// one upstream refresh through the client's gate.
	pub async fn call(&self, call: ApiCall) -> Result<ApiBody> {
		// Snapshotting the epoch before the request means a refresh that lands while this
		// request is in flight satisfies its 401 without another upstream refresh.
		let observed_epoch = self.refresh_epoch.load(Ordering::Acquire);
		let response = self.issue(&call).await?;

		if response.status != 401 {
			return interpret(response);
		}

		if self.refresh_once_coalesced(observed_epoch).await {
			// Refreshed; replay the original request. Whatever comes back is final, a
			// second 401 included.
			interpret(self.issue(&call).await?)
		} else {
			self.session.mark_logged_out();

			Err(Error::AuthExpired)
		}
	}

	/// Issues a call and decodes the JSON body into `T`, reporting the failing JSON path
	/// on a shape mismatch.
	pub async fn call_json<T>(&self, call: ApiCall) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let value = match self.call(call).await? {
			ApiBody::Json(value) => value,
			ApiBody::Text(text) => serde_json::Value::String(text),
			ApiBody::Empty => serde_json::Value::Null,
		};

		serde_path_to_error::deserialize(value).map_err(|source| Error::Decode { source })
	}

	/// Issues one request with credentials attached, without the 401 retry contract.
	///
	/// The refresh and logout flows use this directly so a 401 from the refresh endpoint
	/// can never recurse into another refresh.
	pub(crate) async fn issue(&self, call: &ApiCall) -> Result<ApiResponse> {
		let url = self.endpoints.join(call.service, &call.path)?;
		let mut headers = Vec::new();

		if self.credential_mode == CredentialMode::BearerFromStore
			&& let Some(token) = self.store.get(slots::ACCESS_TOKEN).await?
		{
			headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
		}

		let request =
			ApiRequest { method: call.method, url, headers, body: call.body.clone() };

		self.transport
			.execute(request)
			.await
			.map_err(|e| Error::from(TransportError::network(e)))
	}

	/// Serializes refreshes so N concurrent 401s produce one upstream refresh.
	///
	/// `observed` is the epoch the caller read before issuing its request. The epoch only
	/// advances on a successful refresh: a caller whose request predates an advance reuses
	/// that success, while a caller behind a failed refresh attempts its own.
	pub(crate) async fn refresh_once_coalesced(&self, observed: u64) -> bool {
		let _gate = self.refresh_gate.lock().await;

		if self.refresh_epoch.load(Ordering::Acquire) != observed {
			return true;
		}

		let refreshed = self.refresh_session().await;

		if refreshed {
			self.refresh_epoch.fetch_add(1, Ordering::AcqRel);
		}

		refreshed
	}
}

/// Interprets a final response: non-2xx becomes [`Error::Http`], 2xx bodies parse by
/// declared content type.
fn interpret(response: ApiResponse) -> Result<ApiBody> {
	if !response.is_success() {
		return Err(Error::Http { status: response.status, body: response.text() });
	}
	if response.body.is_empty() {
		return Ok(ApiBody::Empty);
	}
	if response.declares_json() {
		return match serde_json::from_slice(&response.body) {
			Ok(value) => Ok(ApiBody::Json(value)),
			Err(e) => {
				// A malformed declared-JSON body degrades to text instead of failing the
				// whole call.
				obs::note_swallowed("body_parse", &e.to_string());

				Ok(ApiBody::Text(response.text()))
			},
		};
	}

	Ok(ApiBody::Text(response.text()))
}
