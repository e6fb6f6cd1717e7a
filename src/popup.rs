//! Popup-coordinated provider login.
//!
//! [`PopupCoordinator::begin_login`] persists a state nonce, builds the authorize URL,
//! and opens the provider popup through the shell's [`PopupSurface`]. The returned
//! [`LoginAttempt`] then races two signal sources: window messages forwarded by the
//! shell through its [`MessageSink`], and a poll of the durable fallback slots that
//! callback pages write when message delivery is unreliable. The first screened signal
//! settles the attempt; everything after that is ignored.
//!
//! Watchdogs bound the wait. A liveness poll notices the popup closing and arms one
//! grace period for a message posted just before the close; a hard timeout caps the
//! whole attempt. Both paths end in [`LoginOutcome::Abandoned`] with no session
//! mutation and no user-facing error. Every timer and listener is owned by the
//! [`LoginAttempt::resolve`] future, so teardown is a drop and cannot leak or run twice.

pub mod signal;
pub mod surface;
pub mod timings;

pub use signal::{LoginSignal, WindowMessage};
pub use surface::{PopupHandle, PopupSurface};
pub use timings::{PopupTimings, TimingsError};

// crates.io
use rand::{Rng, distr::Alphanumeric};
use tokio::{
	sync::mpsc,
	time::{self, MissedTickBehavior},
};
// self
use crate::{
	_prelude::*,
	client::ServiceClient,
	error::ConfigError,
	http::ApiTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::LoginProvider,
	store::{SlotStore, slots},
};

const STATE_LEN: usize = 11;

/// Why an attempt ended without a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbandonReason {
	/// The popup closed and the grace period elapsed without a signal.
	PopupClosed,
	/// The hard timeout elapsed.
	TimedOut,
}

/// Terminal outcome of a login attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
	/// The login completed; the shell should navigate to `return_path`.
	Authenticated {
		/// Saved return path, consumed from its slot; `/` when none was saved.
		return_path: String,
	},
	/// The attempt ended silently with no session mutation.
	Abandoned(AbandonReason),
}

/// Drives popup logins against a shared client, surface, and slot store.
#[derive(Clone)]
pub struct PopupCoordinator<C>
where
	C: ?Sized + ApiTransport,
{
	/// Service client used for the post-login session bring-up.
	pub client: Arc<ServiceClient<C>>,
	/// Shell-provided window manager.
	pub surface: Arc<dyn PopupSurface>,
	/// Durable slot store shared with the callback pages.
	pub store: Arc<dyn SlotStore>,
	/// Origin of the embedding application, used to screen window messages.
	pub app_origin: String,
	/// Timer configuration.
	pub timings: PopupTimings,
}
impl<C> PopupCoordinator<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a coordinator with default timings.
	pub fn new(
		client: Arc<ServiceClient<C>>,
		surface: Arc<dyn PopupSurface>,
		store: Arc<dyn SlotStore>,
		app_origin: impl Into<String>,
	) -> Self {
		Self {
			client,
			surface,
			store,
			app_origin: app_origin.into(),
			timings: PopupTimings::default(),
		}
	}

	/// Replaces the timer configuration.
	pub fn with_timings(mut self, timings: PopupTimings) -> Self {
		self.timings = timings;

		self
	}

	/// Opens the provider popup and arms the attempt.
	///
	/// Persists a fresh state nonce under the provider's slot, builds the authorize URL
	/// (`response_type=code` plus the caller's extras), and opens it through the surface.
	/// An incomplete login configuration or a blocked popup errors out here; nothing has
	/// been armed yet on those paths.
	pub async fn begin_login(
		&self,
		provider: LoginProvider,
		client_id: &str,
		redirect_uri: &str,
		extra_params: &[(&str, &str)],
	) -> Result<LoginAttempt<C>> {
		if client_id.is_empty() || redirect_uri.is_empty() {
			return Err(
				ConfigError::MissingClientConfig { provider: provider.id.to_string() }.into()
			);
		}

		let state: String =
			rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect();

		self.store.set(&slots::state_nonce(&provider.id), &state).await?;

		let mut authorize_url = provider.authorize_endpoint.clone();

		{
			let mut pairs = authorize_url.query_pairs_mut();

			pairs
				.append_pair("response_type", "code")
				.append_pair("client_id", client_id)
				.append_pair("redirect_uri", redirect_uri)
				.append_pair("state", &state);

			for (name, value) in extra_params {
				pairs.append_pair(name, value);
			}
		}

		let popup = self
			.surface
			.open(&authorize_url, &provider.window_name, &provider.window_features)
			.ok_or(Error::PopupBlocked)?;
		let (sink, messages) = mpsc::unbounded_channel();

		obs::record_flow_outcome(FlowKind::PopupLogin, FlowOutcome::Attempt);

		Ok(LoginAttempt {
			client: self.client.clone(),
			store: self.store.clone(),
			app_origin: self.app_origin.clone(),
			timings: self.timings,
			provider,
			popup,
			messages,
			sink,
			authorize_url,
		})
	}
}
impl<C> Debug for PopupCoordinator<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PopupCoordinator")
			.field("app_origin", &self.app_origin)
			.field("timings", &self.timings)
			.finish()
	}
}

/// Sender half the shell uses to forward window messages into a pending attempt.
///
/// Cheap to clone; sending into a settled attempt is a no-op.
#[derive(Clone, Debug)]
pub struct MessageSink(mpsc::UnboundedSender<WindowMessage>);
impl MessageSink {
	/// Forwards one window message.
	pub fn send(&self, message: WindowMessage) {
		let _ = self.0.send(message);
	}
}

/// One armed login attempt; resolve it (usually from a spawned task) to drive the
/// handshake to completion.
pub struct LoginAttempt<C>
where
	C: ?Sized + ApiTransport,
{
	client: Arc<ServiceClient<C>>,
	store: Arc<dyn SlotStore>,
	app_origin: String,
	timings: PopupTimings,
	provider: LoginProvider,
	popup: Arc<dyn PopupHandle>,
	messages: mpsc::UnboundedReceiver<WindowMessage>,
	sink: mpsc::UnboundedSender<WindowMessage>,
	/// Authorize URL the popup was opened with.
	pub authorize_url: Url,
}
impl<C> LoginAttempt<C>
where
	C: ?Sized + ApiTransport,
{
	/// Returns a sink for forwarding window messages into this attempt.
	pub fn message_sink(&self) -> MessageSink {
		MessageSink(self.sink.clone())
	}

	/// Drives the attempt to its terminal outcome.
	///
	/// At most one signal settles the attempt; the future owns every timer and the
	/// message receiver, so dropping it is a complete, idempotent teardown.
	pub async fn resolve(self) -> Result<LoginOutcome> {
		const KIND: FlowKind = FlowKind::PopupLogin;

		let Self { client, store, app_origin, timings, provider, popup, mut messages, sink, .. } =
			self;
		// Keeping one sender alive means `recv` pends instead of closing when the shell
		// drops its sinks.
		let _sink = sink;
		let span = FlowSpan::new(KIND, "resolve");
		let result = span
			.instrument(async {
				let deadline = time::sleep(timings.hard_timeout);

				tokio::pin!(deadline);

				let mut poll =
					time::interval_at(time::Instant::now() + timings.poll_interval, timings.poll_interval);

				poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

				let signal = 'signal: {
					// Popup is open; wait for a signal or for the popup to go away.
					loop {
						tokio::select! {
							() = &mut deadline =>
								return Ok(LoginOutcome::Abandoned(AbandonReason::TimedOut)),
							maybe = messages.recv() => {
								if let Some(message) = maybe
									&& let Some(signal) =
										signal::screen_message(&app_origin, &provider, &message)
								{
									break 'signal signal;
								}
							},
							_ = poll.tick() => {
								if let Some(signal) =
									check_fallback(store.as_ref(), &app_origin, &provider).await
								{
									break 'signal signal;
								}
								if popup.is_closed() {
									break;
								}
							},
						}
					}

					// Closed without a signal; one grace window for a message posted just
					// before the close.
					let grace = time::sleep(timings.close_grace);

					tokio::pin!(grace);

					loop {
						tokio::select! {
							() = &mut grace =>
								return Ok(LoginOutcome::Abandoned(AbandonReason::PopupClosed)),
							() = &mut deadline =>
								return Ok(LoginOutcome::Abandoned(AbandonReason::TimedOut)),
							maybe = messages.recv() => {
								if let Some(message) = maybe
									&& let Some(signal) =
										signal::screen_message(&app_origin, &provider, &message)
								{
									break 'signal signal;
								}
							},
							_ = poll.tick() => {
								if let Some(signal) =
									check_fallback(store.as_ref(), &app_origin, &provider).await
								{
									break 'signal signal;
								}
							},
						}
					}
				};

				settle(client.as_ref(), store.as_ref(), popup.as_ref(), signal).await
			})
			.await;

		match &result {
			Ok(LoginOutcome::Authenticated { .. }) =>
				obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Ok(LoginOutcome::Abandoned(_)) =>
				obs::record_flow_outcome(KIND, FlowOutcome::Abandoned),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
impl<C> Debug for LoginAttempt<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginAttempt")
			.field("provider", &self.provider.id)
			.field("authorize_url", &self.authorize_url.as_str())
			.finish()
	}
}

/// Reads the fallback slots and screens their payload; read-only, consumption happens at
/// settlement.
async fn check_fallback(
	store: &dyn SlotStore,
	app_origin: &str,
	provider: &LoginProvider,
) -> Option<LoginSignal> {
	let pointer = match store.get(slots::CALLBACK_EVENT).await {
		Ok(pointer) => pointer?,
		Err(e) => {
			obs::note_swallowed("fallback_poll", &e.to_string());

			return None;
		},
	};
	let raw = match store.get(&pointer).await {
		Ok(raw) => raw?,
		Err(e) => {
			obs::note_swallowed("fallback_poll", &e.to_string());

			return None;
		},
	};
	let payload = serde_json::from_str(&raw).ok()?;

	// The slots are same-origin by construction, so screening sees the app origin.
	signal::screen_message(
		app_origin,
		provider,
		&WindowMessage { origin: app_origin.to_owned(), payload },
	)
}

async fn settle<C>(
	client: &ServiceClient<C>,
	store: &dyn SlotStore,
	popup: &dyn PopupHandle,
	signal: LoginSignal,
) -> Result<LoginOutcome>
where
	C: ?Sized + ApiTransport,
{
	if !popup.is_closed() {
		popup.close();
	}

	consume_fallback_slots(store).await;

	match signal {
		LoginSignal::Success => {
			client.complete_login().await;

			let return_path = match store.remove(slots::RETURN_PATH).await {
				Ok(Some(path)) if !path.is_empty() => path,
				Ok(_) => "/".to_owned(),
				Err(e) => {
					obs::note_swallowed("return_path", &e.to_string());

					"/".to_owned()
				},
			};

			Ok(LoginOutcome::Authenticated { return_path })
		},
		LoginSignal::Error { message } => {
			if let Err(e) = store.remove(slots::RETURN_PATH).await {
				obs::note_swallowed("return_path", &e.to_string());
			}

			Err(Error::Provider { message })
		},
	}
}

async fn consume_fallback_slots(store: &dyn SlotStore) {
	match store.remove(slots::CALLBACK_EVENT).await {
		Ok(Some(pointer)) =>
			if let Err(e) = store.remove(&pointer).await {
				obs::note_swallowed("fallback_consume", &e.to_string());
			},
		Ok(None) => (),
		Err(e) => obs::note_swallowed("fallback_consume", &e.to_string()),
	}
}
