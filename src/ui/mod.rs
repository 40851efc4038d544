//! Rendering: header, users table, details pane, status bar and modals.

pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, BackendStatus, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[1]);

    render_header(f, root[0], app);
    users::render_users_table(f, body[0], app);
    users::render_user_details(f, body[1], app);
    components::render_status_bar(f, root[2], app);

    if let Some(state) = app.modal.clone() {
        let area = f.area();
        render_modal(f, area, app, &state);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let health = match app.backend {
        BackendStatus::Unknown => "?",
        BackendStatus::Up => "up",
        BackendStatus::Down => "down",
    };
    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}", app.search_query),
        InputMode::Normal | InputMode::Modal => String::new(),
    };
    let p = Paragraph::new(format!(
        "{} [{health}]  users:{}{prompt}  n: new  e: edit  d: delete  r: refresh  ?: help  q: quit",
        app.base_url,
        app.users.len(),
    ))
    .block(
        Block::default()
            .title("userdesk")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::Form(form) => users::render_user_form(f, area, app, form),
        ModalState::DeleteConfirm { target, selected } => {
            users::render_delete_confirm(f, area, app, target, *selected)
        }
        ModalState::Info { message } => components::render_info_modal(f, area, app, message),
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}
