//! Shared fixtures: a scripted transport and a scripted popup surface.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	io,
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, Ordering},
	},
};
// self
use login_agent::{
	client::{CredentialMode, ServiceClient, ServiceEndpoints},
	http::{ApiRequest, ApiResponse, ApiTransport, TransportFuture},
	popup::{PopupHandle, PopupSurface},
	session::SessionHandle,
	store::{MemoryStore, SlotStore},
	url::Url,
};

pub const APP_ORIGIN: &str = "https://recipe.example.com";

enum Step {
	Respond(ApiResponse),
	Fail,
}

/// Transport that replays a scripted response queue and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
	script: Mutex<VecDeque<Step>>,
	requests: Mutex<Vec<ApiRequest>>,
}
impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_response(&self, status: u16, content_type: Option<&str>, body: &str) {
		self.script.lock().expect("Script lock should not be poisoned.").push_back(
			Step::Respond(ApiResponse {
				status,
				content_type: content_type.map(str::to_owned),
				body: body.as_bytes().to_vec(),
			}),
		);
	}

	pub fn push_json(&self, status: u16, body: &str) {
		self.push_response(status, Some("application/json"), body);
	}

	pub fn push_failure(&self) {
		self.script.lock().expect("Script lock should not be poisoned.").push_back(Step::Fail);
	}

	pub fn requests(&self) -> Vec<ApiRequest> {
		self.requests.lock().expect("Request lock should not be poisoned.").clone()
	}

	pub fn request_count(&self) -> usize {
		self.requests.lock().expect("Request lock should not be poisoned.").len()
	}

	pub fn request_paths(&self) -> Vec<String> {
		self.requests().into_iter().map(|r| r.url.path().to_owned()).collect()
	}
}
impl ApiTransport for ScriptedTransport {
	type TransportError = io::Error;

	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse, io::Error> {
		self.requests.lock().expect("Request lock should not be poisoned.").push(request);

		let step = self
			.script
			.lock()
			.expect("Script lock should not be poisoned.")
			.pop_front()
			.expect("Scripted transport ran out of steps.");

		Box::pin(async move {
			match step {
				Step::Respond(response) => Ok(response),
				Step::Fail => Err(io::Error::other("Scripted transport failure.")),
			}
		})
	}
}

/// Builds a client over a scripted transport with a fresh session and memory store.
pub fn scripted_client(
	transport: Arc<ScriptedTransport>,
	credential_mode: CredentialMode,
) -> (ServiceClient<ScriptedTransport>, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn SlotStore> = store_backend.clone();
	let endpoints = ServiceEndpoints::single_host(APP_ORIGIN)
		.expect("Fixture endpoints should validate.");
	let client = ServiceClient::with_transport(
		transport,
		endpoints,
		SessionHandle::default(),
		store,
		credential_mode,
	);

	(client, store_backend)
}

/// Popup handle whose closed state tests flip directly.
#[derive(Debug, Default)]
pub struct ScriptedHandle {
	closed: AtomicBool,
}
impl ScriptedHandle {
	/// Simulates the user closing the popup.
	pub fn close_externally(&self) {
		self.closed.store(true, Ordering::SeqCst);
	}
}
impl PopupHandle for ScriptedHandle {
	fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	fn close(&self) {
		self.closed.store(true, Ordering::SeqCst);
	}
}

/// Surface that records every open and hands out one scripted handle.
pub struct ScriptedSurface {
	pub handle: Arc<ScriptedHandle>,
	pub blocked: bool,
	opened: Mutex<Vec<(Url, String)>>,
}
impl ScriptedSurface {
	pub fn new() -> Self {
		Self { handle: Arc::new(ScriptedHandle::default()), blocked: false, opened: Mutex::new(Vec::new()) }
	}

	pub fn blocked() -> Self {
		Self { blocked: true, ..Self::new() }
	}

	pub fn opened(&self) -> Vec<(Url, String)> {
		self.opened.lock().expect("Open lock should not be poisoned.").clone()
	}
}
impl Default for ScriptedSurface {
	fn default() -> Self {
		Self::new()
	}
}
impl PopupSurface for ScriptedSurface {
	fn open(&self, url: &Url, name: &str, _features: &str) -> Option<Arc<dyn PopupHandle>> {
		self.opened
			.lock()
			.expect("Open lock should not be poisoned.")
			.push((url.clone(), name.to_owned()));

		if self.blocked { None } else { Some(self.handle.clone()) }
	}
}
