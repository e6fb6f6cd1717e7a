//! Resolves the session once at startup the way a shell's route guard would, then tears
//! it down again.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use login_agent::{
	client::{ApiCall, CredentialMode, Service, ServiceClient, ServiceEndpoints},
	error::extract_error_message,
	session::{AdminAllowlist, SessionHandle},
	store::{MemoryStore, SlotStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	// Point this at a running gateway to see the full flow; against a dead host the
	// resolution degrades to "no session" instead of erroring.
	let endpoints = ServiceEndpoints::single_host("http://localhost:8080")?;
	let store: Arc<dyn SlotStore> = Arc::new(MemoryStore::default());
	let session = SessionHandle::new(AdminAllowlist::new(["admin@recipe.example.com"]));
	let client =
		ServiceClient::new(endpoints, session, store, CredentialMode::CookieSession)?;
	let alive = client.resolve_session().await;

	println!("Live session: {alive}");
	println!("Snapshot: {:?}", client.session.snapshot());
	println!(
		"Refresh attempts so far: {} ({} confirmed)",
		client.refresh_metrics.attempts(),
		client.refresh_metrics.successes(),
	);

	if alive {
		println!("Display name: {:?}", client.session.display_name());
		println!("Admin: {}", client.session.is_admin());

		// A guarded call; a 401 here would refresh once and retry once behind the scenes.
		match client.call(ApiCall::get(Service::Cook, "/api/cook/recipes")).await {
			Ok(body) => println!("Recipes: {body:?}"),
			Err(e) => println!("Recipes failed: {}", extract_error_message(&e, "unknown error")),
		}

		client.logout().await;
		println!("After logout: {:?}", client.session.snapshot());
	}

	Ok(())
}
