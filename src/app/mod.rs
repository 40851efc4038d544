//! Application state types and entry glue.
//!
//! Defines the state the TUI renders from, the modal dialogs, and the
//! requests a key press can turn into. The event loop lives in [`update`]
//! (re-exported as `run`).
//!
pub mod form;
pub mod keymap;
pub mod theme;
pub mod update;

pub use form::{FormField, Submission, UserForm};
pub use keymap::{KeyAction, Keymap};
pub use theme::Theme;

use crate::api::User;
use crate::search::apply_search;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// What we know about the backend's `/health` endpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackendStatus {
    Unknown,
    Up,
    Down,
}

/// Modal dialogs drawn over the main view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Form(UserForm),
    /// `selected`: 0 = Confirm, 1 = Cancel.
    DeleteConfirm { target: User, selected: usize },
    Info { message: String },
    Help { scroll: u16 },
}

/// Backend work queued by a key press, executed by
/// [`update::perform_pending_action`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    RefreshUsers,
    LoadUser { id: i64 },
    CreateUser { name: String, email: String },
    UpdateUser { id: i64, name: String, email: String },
    DeleteUser { id: i64 },
}

impl PendingAction {
    /// Short status-line text while the request is in flight.
    pub fn describe(&self) -> String {
        match self {
            PendingAction::RefreshUsers => "Loading users...".to_string(),
            PendingAction::LoadUser { id } => format!("Loading user {id}..."),
            PendingAction::CreateUser { name, .. } => format!("Creating '{name}'..."),
            PendingAction::UpdateUser { id, .. } => format!("Updating user {id}..."),
            PendingAction::DeleteUser { id } => format!("Deleting user {id}..."),
        }
    }
}

impl From<Submission> for PendingAction {
    fn from(s: Submission) -> Self {
        match s {
            Submission::Create { name, email } => PendingAction::CreateUser { name, email },
            Submission::Update { id, name, email } => PendingAction::UpdateUser { id, name, email },
        }
    }
}

pub struct AppState {
    /// Users in backend order, as last fetched.
    pub users_all: Vec<User>,
    /// `users_all` after the local search filter.
    pub users: Vec<User>,
    /// Highlighted row in `users`.
    pub cursor: usize,
    /// User shown in the details pane.
    pub selected: Option<User>,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub status: Option<String>,
    pub backend: BackendStatus,
    pub base_url: String,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(base_url: impl Into<String>, theme: Theme, keymap: Keymap) -> Self {
        Self {
            users_all: Vec::new(),
            users: Vec::new(),
            cursor: 0,
            selected: None,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            keymap,
            modal: None,
            status: None,
            backend: BackendStatus::Unknown,
            base_url: base_url.into(),
            should_quit: false,
        }
    }

    /// Replace the listing with a fresh fetch, keeping the search filter.
    /// The selection follows its id; it is dropped when that id is gone.
    pub fn set_users(&mut self, users: Vec<User>) {
        self.users_all = users;
        apply_search(self);
        if let Some(id) = self.selected.as_ref().and_then(|u| u.id) {
            self.selected = self.users_all.iter().find(|u| u.id == Some(id)).cloned();
        }
    }

    pub fn highlighted(&self) -> Option<&User> {
        self.users.get(self.cursor)
    }

    /// The selection if any, else the highlighted row.
    pub fn target(&self) -> Option<&User> {
        self.selected.as_ref().or_else(|| self.highlighted())
    }

    /// Move the cursor to the row holding `id`, if it is visible.
    pub fn focus_id(&mut self, id: i64) {
        if let Some(idx) = self.users.iter().position(|u| u.id == Some(id)) {
            self.cursor = idx;
        }
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.users.len().saturating_sub(1));
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.open_modal(ModalState::Info { message: message.into() });
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(users: Vec<User>) -> AppState {
        let mut app = AppState::new("http://api:8010", Theme::dark(), Keymap::default());
        app.set_users(users);
        app
    }

    #[test]
    fn set_users_keeps_backend_order() {
        let app = app_with(vec![User::new(5, "e", "e@x.io"), User::new(1, "a", "a@x.io")]);
        let ids: Vec<_> = app.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![Some(5), Some(1)]);
    }

    #[test]
    fn selection_follows_fresh_copy_or_drops() {
        let mut app = app_with(vec![User::new(1, "a", "a@x.io")]);
        app.selected = app.users.first().cloned();
        app.set_users(vec![User::new(1, "renamed", "a@x.io")]);
        assert_eq!(app.selected.as_ref().and_then(|u| u.name.as_deref()), Some("renamed"));
        app.set_users(vec![]);
        assert!(app.selected.is_none());
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn target_prefers_selection() {
        let mut app = app_with(vec![User::new(1, "a", "a@x.io"), User::new(2, "b", "b@x.io")]);
        assert_eq!(app.target().and_then(|u| u.id), Some(1));
        app.selected = Some(User::new(2, "b", "b@x.io"));
        assert_eq!(app.target().and_then(|u| u.id), Some(2));
    }

    #[test]
    fn submission_maps_to_pending_action() {
        let p: PendingAction = Submission::Update { id: 3, name: "Bob".into(), email: "b@x.io".into() }.into();
        assert_eq!(p, PendingAction::UpdateUser { id: 3, name: "Bob".into(), email: "b@x.io".into() });
        assert_eq!(p.describe(), "Updating user 3...");
    }
}
