use shared::{
    domain::{PlaylistRequest, ResultLink},
    error::ErrorContext,
};
use tracing::debug;

use crate::{
    api::{Outcome, SessionResult},
    progress,
    state::{AppState, Notification, Severity, View},
};

/// Which flow an authenticate call belongs to. Cold-start recovery fails
/// silently; an explicit login surfaces its failure to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOrigin {
    ColdStart,
    Login,
}

/// Everything that can happen to the application: user intents (1:1 with
/// presentation-layer controls), resolutions of remote calls, and timer
/// firings. Resolution and timer events carry the identity they were
/// scheduled under so stale arrivals can be discarded.
#[derive(Debug, Clone)]
pub enum Event {
    TokenEdited(String),
    NameEdited(String),
    DescriptionEdited(String),
    TrackCountEdited(String),

    SubmitToken,
    RecoverSession {
        token: String,
    },
    Logout,
    GenreToggled(String),
    SelectionCleared,
    RefreshGenres,
    SubmitGeneration,
    CreateAnother,
    UpdateToken,
    TryAgain,

    AuthResolved {
        request: u64,
        origin: AuthOrigin,
        outcome: Outcome<SessionResult>,
    },
    CatalogResolved {
        request: u64,
        outcome: Outcome<Vec<String>>,
    },
    GenerationResolved {
        request: u64,
        outcome: Outcome<Vec<ResultLink>>,
    },

    ProgressTicked {
        epoch: u64,
    },
    NotificationExpired {
        id: u64,
    },
}

/// Side effects requested by the reducer and executed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Authenticate {
        request: u64,
        token: String,
        origin: AuthOrigin,
    },
    FetchCatalog {
        request: u64,
    },
    ExecuteGeneration {
        request: u64,
        token: String,
        payload: PlaylistRequest,
    },
    StartProgress {
        epoch: u64,
    },
    StopProgress,
    ScheduleDismiss {
        id: u64,
    },
    PersistToken(String),
    DiscardToken,
}

/// The view-state machine. Pure: no I/O, no clocks; everything observable
/// is in the returned state and commands.
pub fn reduce(state: &mut AppState, event: Event) -> Vec<Command> {
    let mut commands = Vec::new();

    match event {
        Event::TokenEdited(value) => state.token_input = value,
        Event::NameEdited(value) => state.form.name = value,
        Event::DescriptionEdited(value) => state.form.description = value,
        Event::TrackCountEdited(value) => state.form.track_count = value,

        Event::SubmitToken => {
            if state.view != View::LoggedOut || state.auth_pending() {
                return commands;
            }
            let token = state.token_input.trim().to_string();
            if token.is_empty() {
                notify(
                    state,
                    &mut commands,
                    Severity::Error,
                    "Please paste your token first!",
                );
                return commands;
            }
            let request = state.fresh_id();
            state.auth_request = Some(request);
            commands.push(Command::Authenticate {
                request,
                token,
                origin: AuthOrigin::Login,
            });
        }

        Event::RecoverSession { token } => {
            if state.view != View::LoggedOut || state.auth_pending() {
                return commands;
            }
            state.view = View::Authenticating;
            state.token_input = token.clone();
            let request = state.fresh_id();
            state.auth_request = Some(request);
            commands.push(Command::Authenticate {
                request,
                token,
                origin: AuthOrigin::ColdStart,
            });
        }

        Event::AuthResolved {
            request,
            origin,
            outcome,
        } => {
            if state.auth_request != Some(request) {
                debug!(request, "discarding stale authenticate resolution");
                return commands;
            }
            state.auth_request = None;
            reduce_auth_outcome(state, &mut commands, origin, outcome);
        }

        Event::Logout => {
            if state.view != View::Dashboard {
                return commands;
            }
            state.session = None;
            state.catalog.clear();
            state.catalog_loading = false;
            state.catalog_request = None;
            state.view = View::LoggedOut;
            commands.push(Command::DiscardToken);
            notify(
                state,
                &mut commands,
                Severity::Info,
                "Logged out successfully.",
            );
        }

        Event::GenreToggled(genre) => {
            if let Some(pos) = state.selection.iter().position(|g| *g == genre) {
                state.selection.remove(pos);
            } else {
                state.selection.push(genre);
            }
        }

        Event::SelectionCleared => state.selection.clear(),

        Event::RefreshGenres => {
            if state.view != View::Dashboard || state.catalog_loading {
                return commands;
            }
            start_catalog_fetch(state, &mut commands);
        }

        Event::CatalogResolved { request, outcome } => {
            if state.catalog_request != Some(request) {
                debug!(request, "discarding stale catalog resolution");
                return commands;
            }
            state.catalog_request = None;
            state.catalog_loading = false;
            match outcome {
                Outcome::Success(genres) if genres.is_empty() => {
                    state.catalog = genres;
                    notify(
                        state,
                        &mut commands,
                        Severity::Warning,
                        "No genres loaded from server.",
                    );
                }
                Outcome::Success(genres) => state.catalog = genres,
                _ => notify(
                    state,
                    &mut commands,
                    Severity::Error,
                    "Failed to load genres.",
                ),
            }
        }

        Event::SubmitGeneration => {
            if state.view != View::Dashboard || state.generation_pending() {
                return commands;
            }
            let Some(track_count) = parse_track_count(&state.form.track_count) else {
                notify(
                    state,
                    &mut commands,
                    Severity::Error,
                    "Track count must be a positive number.",
                );
                return commands;
            };
            let Some(session) = &state.session else {
                return commands;
            };
            let payload = PlaylistRequest {
                name: state.form.name.clone(),
                description: state.form.description.clone(),
                track_count,
                genres: state.selection.clone(),
            };
            let token = session.token.clone();
            state.view = View::Processing;
            state.progress = 0;
            state.progress_epoch += 1;
            let request = state.fresh_id();
            state.generation_request = Some(request);
            commands.push(Command::StartProgress {
                epoch: state.progress_epoch,
            });
            commands.push(Command::ExecuteGeneration {
                request,
                token,
                payload,
            });
        }

        Event::GenerationResolved { request, outcome } => {
            if state.generation_request != Some(request) {
                debug!(request, "discarding stale generation resolution");
                return commands;
            }
            state.generation_request = None;
            state.progress = 0;
            commands.push(Command::StopProgress);
            match outcome {
                Outcome::Success(links) => {
                    state.links = links;
                    state.view = View::Success;
                    notify(
                        state,
                        &mut commands,
                        Severity::Success,
                        "Playlists created successfully.",
                    );
                }
                Outcome::RateLimited {
                    message,
                    retry_after_secs,
                } => {
                    state.error = Some(ErrorContext::rate_limited(message, retry_after_secs));
                    state.view = View::ErrorPaused;
                }
                Outcome::Forbidden { message } => {
                    state.view = View::Dashboard;
                    notify(state, &mut commands, Severity::Warning, message);
                }
                Outcome::AuthFailed { message }
                | Outcome::Generic { message }
                | Outcome::Transport { message } => {
                    state.view = View::Dashboard;
                    notify(state, &mut commands, Severity::Error, message);
                }
            }
        }

        Event::CreateAnother => {
            if state.view != View::Success {
                return commands;
            }
            state.links.clear();
            state.view = View::Dashboard;
        }

        Event::UpdateToken => {
            if state.view != View::ErrorPaused {
                return commands;
            }
            state.error = None;
            state.session = None;
            state.view = View::LoggedOut;
        }

        Event::TryAgain => {
            if state.view != View::ErrorPaused {
                return commands;
            }
            state.error = None;
            state.view = View::Dashboard;
        }

        Event::ProgressTicked { epoch } => {
            if state.view == View::Processing && epoch == state.progress_epoch {
                state.progress = progress::advance(state.progress);
            }
        }

        Event::NotificationExpired { id } => {
            if state.notification.as_ref().map(|n| n.id) == Some(id) {
                state.notification = None;
            }
        }
    }

    debug_assert!(state.is_consistent());
    commands
}

fn reduce_auth_outcome(
    state: &mut AppState,
    commands: &mut Vec<Command>,
    origin: AuthOrigin,
    outcome: Outcome<SessionResult>,
) {
    match (origin, outcome) {
        (_, Outcome::Success(result)) => {
            state.token_input = result.normalized_token.clone();
            let display_name = result
                .session
                .profile
                .as_ref()
                .and_then(|p| p.display_name.clone());
            state.session = Some(result.session);
            state.view = View::Dashboard;
            commands.push(Command::PersistToken(result.normalized_token));
            let name = display_name.unwrap_or_else(|| "there".to_string());
            let greeting = match origin {
                AuthOrigin::ColdStart => format!("Welcome back, {name}!"),
                AuthOrigin::Login => format!("Welcome, {name}!"),
            };
            notify(state, commands, Severity::Success, greeting);
            start_catalog_fetch(state, commands);
        }

        // A stale stored credential is discarded without ceremony; the user
        // simply sees the login view.
        (AuthOrigin::ColdStart, _) => {
            state.view = View::LoggedOut;
            commands.push(Command::DiscardToken);
        }

        (
            AuthOrigin::Login,
            Outcome::RateLimited {
                message,
                retry_after_secs,
            },
        ) => {
            state.error = Some(ErrorContext::rate_limited(
                message.clone(),
                retry_after_secs,
            ));
            state.view = View::ErrorPaused;
            notify(state, commands, Severity::Error, message);
        }
        (AuthOrigin::Login, Outcome::Forbidden { message }) => {
            notify(state, commands, Severity::Warning, message);
        }
        (
            AuthOrigin::Login,
            Outcome::AuthFailed { message }
            | Outcome::Generic { message }
            | Outcome::Transport { message },
        ) => {
            notify(state, commands, Severity::Error, message);
        }
    }
}

fn start_catalog_fetch(state: &mut AppState, commands: &mut Vec<Command>) {
    state.catalog_loading = true;
    let request = state.fresh_id();
    state.catalog_request = Some(request);
    commands.push(Command::FetchCatalog { request });
}

fn parse_track_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|count| *count > 0)
}

/// Replaces any live notification and schedules dismissal for the new one.
/// The stale dismissal timer is defused by id, not by a global flag.
fn notify(
    state: &mut AppState,
    commands: &mut Vec<Command>,
    severity: Severity,
    message: impl Into<String>,
) {
    let id = state.fresh_id();
    state.notification = Some(Notification {
        id,
        message: message.into(),
        severity,
    });
    commands.push(Command::ScheduleDismiss { id });
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
