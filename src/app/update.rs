use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::api::{ApiClient, Transport};
use crate::app::{AppState, BackendStatus, FormField, InputMode, KeyAction, ModalState, PendingAction, UserForm};
use crate::search::apply_search;
use crate::ui;

/// Draw, wait for a key, and run whatever request it produced. Requests are
/// awaited one at a time; a failure is shown in an info modal.
pub async fn run_app<B: Backend, T: Transport>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    api: &ApiClient<T>,
) -> Result<()> {
    app.status = Some("Connecting...".to_string());
    terminal.draw(|f| ui::render(f, app))?;
    initial_load(app, api).await;

    while !app.should_quit {
        terminal.draw(|f| ui::render(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(pending) = handle_key(app, key) {
            app.status = Some(pending.describe());
            terminal.draw(|f| ui::render(f, app))?;
            if let Err(err) = perform_pending_action(app, api, pending).await {
                tracing::warn!(error = %format!("{err:#}"), "action failed");
                app.status = Some("Request failed".to_string());
                app.show_info(format!("Request failed: {err:#}"));
            }
        }
    }

    Ok(())
}

/// Health probe plus first listing. A failed listing leaves the collection
/// empty instead of failing the app.
pub async fn initial_load<T: Transport>(app: &mut AppState, api: &ApiClient<T>) {
    app.backend = match api.health().await {
        Ok(h) if h.is_ok() => BackendStatus::Up,
        Ok(h) => {
            tracing::warn!(status = %h.status, "backend reports unhealthy");
            BackendStatus::Down
        }
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            BackendStatus::Down
        }
    };
    match api.get_users().await {
        Ok(users) => {
            tracing::info!(count = users.len(), "loaded users");
            app.status = Some(format!("Loaded {} users", users.len()));
            app.set_users(users);
        }
        Err(err) => {
            tracing::warn!(error = %err, "initial listing failed");
            app.status = Some(format!("Could not load users: {err}"));
            app.set_users(Vec::new());
        }
    }
}

/// Apply a key press to the state. Returns the backend work it calls for.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Option<PendingAction> {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => {
            handle_search_key(app, key.code);
            None
        }
        InputMode::Modal => handle_modal_key(app, key.code),
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Option<PendingAction> {
    let action = app.keymap.resolve(&key)?;
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::NewUser => app.open_modal(ModalState::Form(UserForm::create())),
        KeyAction::EditSelection => match app.target().filter(|u| u.is_persisted()) {
            Some(user) => {
                let form = UserForm::edit(user);
                app.open_modal(ModalState::Form(form));
            }
            None => app.status = Some("No user selected".to_string()),
        },
        KeyAction::DeleteSelection => match app.target().filter(|u| u.is_persisted()).cloned() {
            Some(target) => app.open_modal(ModalState::DeleteConfirm { target, selected: 1 }),
            None => app.status = Some("No user selected".to_string()),
        },
        KeyAction::Refresh => return Some(PendingAction::RefreshUsers),
        KeyAction::StartSearch => {
            app.search_query.clear();
            apply_search(app);
            app.input_mode = InputMode::Search;
        }
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::EnterAction => {
            let user = app.highlighted()?.clone();
            let id = user.id;
            app.selected = Some(user);
            return id.map(|id| PendingAction::LoadUser { id });
        }
        KeyAction::Back => app.selected = None,
        KeyAction::MoveUp => app.cursor = app.cursor.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.cursor + 1 < app.users.len() {
                app.cursor += 1;
            }
        }
        KeyAction::PageUp => app.cursor = app.cursor.saturating_sub(app.rows_per_page.max(1)),
        KeyAction::PageDown => {
            app.cursor = app.cursor.saturating_add(app.rows_per_page.max(1));
            app.clamp_cursor();
        }
        KeyAction::Ignore => {}
    }
    None
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            apply_search(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.search_query.clear();
            apply_search(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => app.search_query.push(c),
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) -> Option<PendingAction> {
    match app.modal.as_mut()? {
        ModalState::Form(form) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.push_char(c),
            KeyCode::Enter => {
                if form.focus == FormField::Cancel {
                    app.close_modal();
                    return None;
                }
                match form.submit() {
                    Ok(submission) => {
                        app.close_modal();
                        return Some(submission.into());
                    }
                    Err(err) => app.status = Some(format!("Cannot submit: {err}")),
                }
            }
            _ => {}
        },
        ModalState::DeleteConfirm { target, selected } => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - *selected;
            }
            KeyCode::Enter => {
                let confirmed = *selected == 0;
                let id = target.id;
                app.close_modal();
                if confirmed {
                    app.selected = None;
                    return id.map(|id| PendingAction::DeleteUser { id });
                }
            }
            _ => {}
        },
        ModalState::Info { .. } => {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                app.close_modal();
            }
        }
        ModalState::Help { scroll } => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => app.close_modal(),
            _ => {}
        },
    }
    None
}

/// Run one queued request and, for mutations, the follow-up listing.
pub async fn perform_pending_action<T: Transport>(
    app: &mut AppState,
    api: &ApiClient<T>,
    pending: PendingAction,
) -> Result<()> {
    match pending {
        PendingAction::RefreshUsers => {
            let count = refresh_users(app, api).await?;
            app.status = Some(format!("Loaded {count} users"));
        }
        PendingAction::LoadUser { id } => match api.get_user(id).await {
            Ok(user) => {
                app.selected = Some(user);
                app.status = None;
            }
            Err(err) => {
                // keep the listed copy
                tracing::warn!(id, error = %err, "could not load user details");
                app.status = Some(format!("Showing cached details: {err}"));
            }
        },
        PendingAction::CreateUser { name, email } => {
            let created = api
                .create_user(&name, &email)
                .await
                .with_context(|| format!("create user '{name}'"))?;
            tracing::info!(id = ?created.id, "created user");
            refresh_users(app, api).await?;
            if let Some(id) = created.id {
                app.focus_id(id);
            }
            app.status = Some(format!("Created user '{name}'"));
        }
        PendingAction::UpdateUser { id, name, email } => {
            api.update_user(id, &name, &email)
                .await
                .with_context(|| format!("update user {id}"))?;
            tracing::info!(id, "updated user");
            refresh_users(app, api).await?;
            app.status = Some(format!("Updated user {id}"));
        }
        PendingAction::DeleteUser { id } => {
            api.delete_user(id)
                .await
                .with_context(|| format!("delete user {id}"))?;
            tracing::info!(id, "deleted user");
            refresh_users(app, api).await?;
            app.status = Some(format!("Deleted user {id}"));
        }
    }
    Ok(())
}

async fn refresh_users<T: Transport>(app: &mut AppState, api: &ApiClient<T>) -> Result<usize> {
    let users = api.get_users().await.context("list users")?;
    let count = users.len();
    app.set_users(users);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;
    use crate::api::testing::FakeTransport;
    use crate::app::{Keymap, Theme};
    use crate::config::ApiConfig;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn press(app: &mut AppState, code: KeyCode) -> Option<PendingAction> {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_with(users: Vec<User>) -> AppState {
        let mut app = AppState::new("http://api:8010", Theme::dark(), Keymap::default());
        app.set_users(users);
        app
    }

    fn api(fake: FakeTransport) -> ApiClient<FakeTransport> {
        ApiClient::with_transport(ApiConfig::with_host("api:8010"), fake)
    }

    #[test]
    fn create_flow_emits_create_action() {
        let mut app = app_with(vec![]);
        assert_eq!(press(&mut app, KeyCode::Char('n')), None);
        assert_eq!(app.input_mode, InputMode::Modal);
        type_text(&mut app, "Alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "alice@example.com");
        let pending = press(&mut app, KeyCode::Enter);
        assert_eq!(
            pending,
            Some(PendingAction::CreateUser { name: "Alice".into(), email: "alice@example.com".into() })
        );
        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn invalid_form_never_produces_a_request() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Alice");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "not-an-email");
        assert_eq!(press(&mut app, KeyCode::Enter), None);
        match &app.modal {
            Some(ModalState::Form(form)) => assert!(form.email_error()),
            other => panic!("form should stay open, got {other:?}"),
        }
        assert_eq!(app.status.as_deref(), Some("Cannot submit: email address is malformed"));
    }

    #[test]
    fn typing_q_in_form_does_not_quit() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        match &app.modal {
            Some(ModalState::Form(form)) => assert_eq!(form.name, "q"),
            other => panic!("unexpected modal {other:?}"),
        }
    }

    #[test]
    fn cancel_button_closes_form() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::BackTab);
        if let Some(ModalState::Form(form)) = &app.modal {
            assert_eq!(form.focus, FormField::Cancel);
        }
        assert_eq!(press(&mut app, KeyCode::Enter), None);
        assert!(app.modal.is_none());
    }

    #[test]
    fn edit_targets_highlighted_row_when_nothing_selected() {
        let mut app = app_with(vec![User::new(1, "a", "a@x.io"), User::new(3, "Bob", "bob@example.com")]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('e'));
        let pending = press(&mut app, KeyCode::Enter);
        assert_eq!(
            pending,
            Some(PendingAction::UpdateUser { id: 3, name: "Bob".into(), email: "bob@example.com".into() })
        );
    }

    #[test]
    fn edit_without_users_reports_status() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('e'));
        assert!(app.modal.is_none());
        assert_eq!(app.status.as_deref(), Some("No user selected"));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app_with(vec![User::new(3, "Bob", "bob@example.com")]);
        press(&mut app, KeyCode::Char('d'));
        // default choice is Cancel
        assert_eq!(press(&mut app, KeyCode::Enter), None);
        assert!(app.modal.is_none());

        press(&mut app, KeyCode::Enter);
        assert!(app.selected.is_some());
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Left);
        assert_eq!(press(&mut app, KeyCode::Enter), Some(PendingAction::DeleteUser { id: 3 }));
        assert!(app.selected.is_none());
    }

    #[test]
    fn enter_selects_and_requests_details() {
        let mut app = app_with(vec![User::new(8, "h", "h@x.io")]);
        assert_eq!(press(&mut app, KeyCode::Enter), Some(PendingAction::LoadUser { id: 8 }));
        assert_eq!(app.selected.as_ref().and_then(|u| u.id), Some(8));
        press(&mut app, KeyCode::Esc);
        assert!(app.selected.is_none());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = app_with(vec![User::new(1, "a", "a@x.io"), User::new(2, "b", "b@x.io")]);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.cursor, 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, 1);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn search_mode_filters_on_enter_and_restores_on_esc() {
        let mut app = app_with(vec![User::new(1, "alice", "a@x.io"), User::new(2, "bob", "b@x.io")]);
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        type_text(&mut app, "bo");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.users.len(), 1);
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.users.len(), 2);
    }

    #[test]
    fn new_search_starts_from_the_full_list() {
        let mut app = app_with(vec![User::new(1, "alice", "a@x.io"), User::new(2, "bob", "b@x.io")]);
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "bo");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.users.len(), 1);
        press(&mut app, KeyCode::Char('/'));
        assert!(app.search_query.is_empty());
        assert_eq!(app.users.len(), 2);
    }

    #[test]
    fn quit_and_help() {
        let mut app = app_with(vec![]);
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.modal, Some(ModalState::Help { scroll: 0 })));
        press(&mut app, KeyCode::Down);
        assert!(matches!(app.modal, Some(ModalState::Help { scroll: 1 })));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn create_posts_then_refreshes_once() {
        let fake = FakeTransport::new()
            .respond_json(201, json!({"id": 7, "name": "Alice", "email": "alice@example.com"}))
            .respond_json(200, json!([
                {"id": 1, "name": "a", "email": "a@x.io"},
                {"id": 7, "name": "Alice", "email": "alice@example.com"}
            ]));
        let api = api(fake);
        let mut app = app_with(vec![]);
        perform_pending_action(
            &mut app,
            &api,
            PendingAction::CreateUser { name: "Alice".into(), email: "alice@example.com".into() },
        )
        .await
        .unwrap();

        assert_eq!(
            api.transport().calls(),
            vec![
                ("POST".to_string(), "http://api:8010/users".to_string()),
                ("GET".to_string(), "http://api:8010/users".to_string()),
            ]
        );
        assert_eq!(app.users.len(), 2);
        assert_eq!(app.cursor, 1);
        assert_eq!(app.status.as_deref(), Some("Created user 'Alice'"));
    }

    #[tokio::test]
    async fn update_then_refresh_updates_selection() {
        let fake = FakeTransport::new()
            .respond_json(200, json!({"id": 3, "name": "Bobby", "email": "bob@example.com"}))
            .respond_json(200, json!([{"id": 3, "name": "Bobby", "email": "bob@example.com"}]));
        let api = api(fake);
        let mut app = app_with(vec![User::new(3, "Bob", "bob@example.com")]);
        app.selected = Some(User::new(3, "Bob", "bob@example.com"));
        perform_pending_action(
            &mut app,
            &api,
            PendingAction::UpdateUser { id: 3, name: "Bobby".into(), email: "bob@example.com".into() },
        )
        .await
        .unwrap();
        assert_eq!(api.transport().calls()[0], ("PUT".to_string(), "http://api:8010/users/3".to_string()));
        assert_eq!(app.selected.as_ref().and_then(|u| u.name.as_deref()), Some("Bobby"));
    }

    #[tokio::test]
    async fn delete_then_refresh() {
        let fake = FakeTransport::new()
            .respond_json(200, json!({"result": "success"}))
            .respond_json(200, json!([]));
        let api = api(fake);
        let mut app = app_with(vec![User::new(3, "Bob", "bob@example.com")]);
        perform_pending_action(&mut app, &api, PendingAction::DeleteUser { id: 3 }).await.unwrap();
        assert_eq!(api.transport().calls().len(), 2);
        assert!(app.users.is_empty());
    }

    #[tokio::test]
    async fn failed_mutation_skips_refresh_and_reports() {
        let api = api(FakeTransport::new().respond_raw(500, "boom"));
        let mut app = app_with(vec![User::new(3, "Bob", "bob@example.com")]);
        let err = perform_pending_action(&mut app, &api, PendingAction::DeleteUser { id: 3 })
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("delete user 3"));
        assert_eq!(api.transport().calls().len(), 1);
        assert_eq!(app.users.len(), 1);
    }

    #[tokio::test]
    async fn load_user_falls_back_to_listed_copy() {
        let api = api(FakeTransport::new().fail("unreachable"));
        let mut app = app_with(vec![User::new(8, "h", "h@x.io")]);
        app.selected = Some(User::new(8, "h", "h@x.io"));
        perform_pending_action(&mut app, &api, PendingAction::LoadUser { id: 8 }).await.unwrap();
        assert_eq!(app.selected, Some(User::new(8, "h", "h@x.io")));
    }

    #[tokio::test]
    async fn initial_load_substitutes_empty_list_on_failure() {
        let api = api(FakeTransport::new().fail("down").fail("down"));
        let mut app = app_with(vec![User::new(1, "stale", "s@x.io")]);
        initial_load(&mut app, &api).await;
        assert!(app.users.is_empty());
        assert_eq!(app.backend, BackendStatus::Down);
    }

    #[tokio::test]
    async fn initial_load_reads_health_and_users() {
        let api = api(
            FakeTransport::new()
                .respond_json(200, json!({"Status": "OK"}))
                .respond_json(200, json!([{"id": 1, "name": "a", "email": "a@x.io"}])),
        );
        let mut app = app_with(vec![]);
        initial_load(&mut app, &api).await;
        assert_eq!(app.backend, BackendStatus::Up);
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.status.as_deref(), Some("Loaded 1 users"));
    }
}
