//! Walks through a popup login end to end: arming the attempt, forwarding the callback
//! page's message, and reading the settled session.

// std
use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};
// crates.io
use color_eyre::Result;
// self
use login_agent::{
	client::{CredentialMode, ServiceClient, ServiceEndpoints},
	popup::{PopupCoordinator, PopupHandle, PopupSurface, WindowMessage},
	provider::well_known,
	session::SessionHandle,
	store::{MemoryStore, SlotStore, slots},
	url::Url,
};

const APP_ORIGIN: &str = "https://recipe.example.com";

#[derive(Debug, Default)]
struct ConsoleHandle(AtomicBool);
impl PopupHandle for ConsoleHandle {
	fn is_closed(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}

	fn close(&self) {
		println!("[surface] closing the popup window");
		self.0.store(true, Ordering::SeqCst);
	}
}

/// Surface that prints what a real shell would hand to its window manager.
#[derive(Debug, Default)]
struct ConsoleSurface;
impl PopupSurface for ConsoleSurface {
	fn open(&self, url: &Url, name: &str, features: &str) -> Option<Arc<dyn PopupHandle>> {
		println!("[surface] opening `{name}` ({features})");
		println!("[surface] authorize URL: {url}");

		Some(Arc::new(ConsoleHandle::default()))
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn SlotStore> = store_backend.clone();
	let endpoints = ServiceEndpoints::single_host(APP_ORIGIN)?;
	let client = Arc::new(ServiceClient::new(
		endpoints,
		SessionHandle::default(),
		store.clone(),
		CredentialMode::CookieSession,
	)?);
	let coordinator =
		PopupCoordinator::new(client.clone(), Arc::new(ConsoleSurface), store, APP_ORIGIN);

	// The page the user was on before being sent to log in.
	store_backend.set(slots::RETURN_PATH, "/recipes/42").await?;

	let attempt = coordinator
		.begin_login(
			well_known::naver(),
			"demo-client-id",
			"https://recipe.example.com/auth/callback/naver",
			&[],
		)
		.await?;
	let nonce = store_backend.get("naver_state").await?.unwrap_or_default();

	println!("Persisted state nonce: {nonce}");

	// A real shell forwards window messages here; we simulate the callback page posting
	// its success signal. (The profile fetch will fail against the placeholder host and
	// is tolerated; the session still comes up authenticated.)
	let sink = attempt.message_sink();

	sink.send(WindowMessage {
		origin: APP_ORIGIN.into(),
		payload: serde_json::json!({ "type": "NAVER_LOGIN_SUCCESS" }),
	});

	let outcome = attempt.resolve().await?;

	println!("Login outcome: {outcome:?}");
	println!("Session snapshot: {:?}", client.session.snapshot());

	Ok(())
}
