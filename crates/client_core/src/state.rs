use shared::{
    domain::{ResultLink, Session},
    error::ErrorContext,
};

/// The view the presentation layer should currently render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    LoggedOut,
    Authenticating,
    Dashboard,
    Processing,
    Success,
    ErrorPaused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient user-visible message. At most one is live; the id ties the
/// dismissal timer to this specific instance so a replaced notification's
/// timer cannot clear its successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Editable playlist form. Track count is kept as the raw input string and
/// only parsed (and validated) at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistForm {
    pub name: String,
    pub description: String,
    pub track_count: String,
}

impl Default for PlaylistForm {
    fn default() -> Self {
        Self {
            name: "My Discovery Mix".into(),
            description: "Created with mixstudio".into(),
            track_count: "500".into(),
        }
    }
}

/// Complete application state as seen by the presentation layer. Produced
/// only by the reducer, one value per event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: View,
    pub token_input: String,
    pub session: Option<Session>,
    /// Fetched once per authenticated session, on entry into the dashboard
    /// from a successful authentication; re-entry from Success/ErrorPaused
    /// does not re-fetch. Manually refreshable.
    pub catalog: Vec<String>,
    pub catalog_loading: bool,
    /// Selected genre ids, unique, in insertion order.
    pub selection: Vec<String>,
    pub form: PlaylistForm,
    pub links: Vec<ResultLink>,
    pub error: Option<ErrorContext>,
    pub progress: u8,
    pub notification: Option<Notification>,
    /// Request id of the outstanding authenticate call, if any. Doubles as
    /// the "login control disabled" flag.
    pub auth_request: Option<u64>,
    pub catalog_request: Option<u64>,
    /// Request id of the outstanding generation call, if any.
    pub generation_request: Option<u64>,
    /// Epoch of the currently scheduled progress ticker; stale ticks are
    /// discarded by comparing against this.
    pub progress_epoch: u64,
    pub(crate) next_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::LoggedOut,
            token_input: String::new(),
            session: None,
            catalog: Vec::new(),
            catalog_loading: false,
            selection: vec!["pop".into(), "dance".into()],
            form: PlaylistForm::default(),
            links: Vec::new(),
            error: None,
            progress: 0,
            notification: None,
            auth_request: None,
            catalog_request: None,
            generation_request: None,
            progress_epoch: 0,
            next_id: 0,
        }
    }
}

impl AppState {
    pub fn auth_pending(&self) -> bool {
        self.auth_request.is_some()
    }

    pub fn generation_pending(&self) -> bool {
        self.generation_request.is_some()
    }

    /// View/payload consistency: the error payload exists exactly while the
    /// error view is active, result links exist only on the success view,
    /// and progress only moves inside the processing view.
    pub fn is_consistent(&self) -> bool {
        let error_ok = self.error.is_some() == (self.view == View::ErrorPaused);
        let links_ok = self.links.is_empty() || self.view == View::Success;
        let progress_ok = self.progress == 0 || self.view == View::Processing;
        error_ok && links_ok && progress_ok
    }

    pub(crate) fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}
