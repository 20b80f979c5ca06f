//! Headless core of the mixstudio client: a view-state machine over a remote
//! playlist-generation service.
//!
//! The presentation layer embeds [`StudioController`], feeds user intents in
//! through its named methods, and renders the [`AppState`] snapshots it
//! publishes. All sequencing logic lives in the pure reducer; the controller
//! only executes the side effects the reducer asks for.

use std::{sync::Arc, time::Duration};

use storage::CredentialStore;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::info;

pub mod api;
pub mod config;
pub mod progress;
pub mod reducer;
pub mod state;

pub use api::{BackendClient, Outcome, PlaylistService, SessionResult, SetupError};
pub use config::{load_settings, Settings};
pub use reducer::{AuthOrigin, Command, Event};
pub use state::{AppState, Notification, PlaylistForm, Severity, View};

/// How long a notification stays visible unless replaced first.
const NOTIFICATION_TTL: Duration = Duration::from_millis(4000);

/// Owns the event queue and the driver task; the embedding application's
/// handle to the whole client core.
///
/// Must be created inside a tokio runtime. Dropping the controller aborts
/// the driver and every timer it scheduled.
pub struct StudioController {
    events: mpsc::UnboundedSender<Event>,
    state: watch::Receiver<AppState>,
    driver: JoinHandle<()>,
}

impl StudioController {
    /// Controller wired to the real backend and the platform credential
    /// store.
    pub fn new(settings: &Settings) -> Result<Self, SetupError> {
        let service = Arc::new(BackendClient::new(settings)?);
        Ok(Self::with_dependencies(service, CredentialStore::open_default()))
    }

    pub fn with_dependencies(service: Arc<dyn PlaylistService>, store: CredentialStore) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(AppState::default());
        let driver = Driver {
            service,
            store,
            events: event_tx.clone(),
            state: state_tx,
            progress_ticker: None,
            dismiss_timer: None,
        };
        let task = tokio::spawn(driver.run(event_rx));
        Self {
            events: event_tx,
            state: state_rx,
            driver: task,
        }
    }

    /// Watch channel carrying one [`AppState`] snapshot per processed event.
    pub fn state(&self) -> watch::Receiver<AppState> {
        self.state.clone()
    }

    pub fn current_state(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn dispatch(&self, event: Event) {
        let _ = self.events.send(event);
    }

    // User intents, 1:1 with the presentation-layer controls.

    pub fn edit_token(&self, value: impl Into<String>) {
        self.dispatch(Event::TokenEdited(value.into()));
    }

    pub fn submit_token(&self) {
        self.dispatch(Event::SubmitToken);
    }

    pub fn logout(&self) {
        self.dispatch(Event::Logout);
    }

    pub fn toggle_genre(&self, genre: impl Into<String>) {
        self.dispatch(Event::GenreToggled(genre.into()));
    }

    pub fn clear_selection(&self) {
        self.dispatch(Event::SelectionCleared);
    }

    pub fn refresh_genres(&self) {
        self.dispatch(Event::RefreshGenres);
    }

    pub fn edit_name(&self, value: impl Into<String>) {
        self.dispatch(Event::NameEdited(value.into()));
    }

    pub fn edit_description(&self, value: impl Into<String>) {
        self.dispatch(Event::DescriptionEdited(value.into()));
    }

    pub fn edit_track_count(&self, value: impl Into<String>) {
        self.dispatch(Event::TrackCountEdited(value.into()));
    }

    pub fn submit_generation(&self) {
        self.dispatch(Event::SubmitGeneration);
    }

    pub fn create_another(&self) {
        self.dispatch(Event::CreateAnother);
    }

    pub fn update_token(&self) {
        self.dispatch(Event::UpdateToken);
    }

    pub fn try_again(&self) {
        self.dispatch(Event::TryAgain);
    }
}

impl Drop for StudioController {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

/// Event pump: reduces each event against the current state, publishes the
/// result, then executes the requested side effects.
struct Driver {
    service: Arc<dyn PlaylistService>,
    store: CredentialStore,
    events: mpsc::UnboundedSender<Event>,
    state: watch::Sender<AppState>,
    progress_ticker: Option<JoinHandle<()>>,
    dismiss_timer: Option<JoinHandle<()>>,
}

impl Driver {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        // Load-time silent recovery: a saved credential is re-validated
        // before the user sees anything but the login view.
        if let Some(token) = self.store.load() {
            info!("saved credential found, attempting silent sign-in");
            let _ = self.events.send(Event::RecoverSession { token });
        }

        while let Some(event) = events.recv().await {
            let mut next = self.state.borrow().clone();
            let commands = reducer::reduce(&mut next, event);
            self.state.send_replace(next);
            for command in commands {
                self.execute(command);
            }
        }

        self.stop_progress_ticker();
        self.stop_dismiss_timer();
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Authenticate {
                request,
                token,
                origin,
            } => {
                let service = Arc::clone(&self.service);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = service.authenticate(&token).await;
                    let _ = events.send(Event::AuthResolved {
                        request,
                        origin,
                        outcome,
                    });
                });
            }

            Command::FetchCatalog { request } => {
                let service = Arc::clone(&self.service);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = service.fetch_genres().await;
                    let _ = events.send(Event::CatalogResolved { request, outcome });
                });
            }

            Command::ExecuteGeneration {
                request,
                token,
                payload,
            } => {
                let service = Arc::clone(&self.service);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = service.execute_generation(&token, &payload).await;
                    let _ = events.send(Event::GenerationResolved { request, outcome });
                });
            }

            Command::StartProgress { epoch } => {
                self.stop_progress_ticker();
                let events = self.events.clone();
                self.progress_ticker = Some(tokio::spawn(async move {
                    let mut ticker = time::interval(progress::TICK_INTERVAL);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    // The first tick of an interval completes immediately.
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        if events.send(Event::ProgressTicked { epoch }).is_err() {
                            break;
                        }
                    }
                }));
            }

            Command::StopProgress => self.stop_progress_ticker(),

            Command::ScheduleDismiss { id } => {
                self.stop_dismiss_timer();
                let events = self.events.clone();
                self.dismiss_timer = Some(tokio::spawn(async move {
                    time::sleep(NOTIFICATION_TTL).await;
                    let _ = events.send(Event::NotificationExpired { id });
                }));
            }

            Command::PersistToken(token) => self.store.save(&token),
            Command::DiscardToken => self.store.clear(),
        }
    }

    fn stop_progress_ticker(&mut self) {
        if let Some(task) = self.progress_ticker.take() {
            task.abort();
        }
    }

    fn stop_dismiss_timer(&mut self) {
        if let Some(task) = self.dismiss_timer.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
