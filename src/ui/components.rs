//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, InputMode, KeyAction};

/// Render the bottom status bar with mode, counts and the last message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let filter = if app.search_query.is_empty() || app.input_mode == InputMode::Search {
        String::new()
    } else {
        format!("  filter:'{}'", app.search_query)
    };
    let message = app.status.as_deref().map(|s| format!("  | {s}")).unwrap_or_default();
    let msg = format!(
        "mode: {mode}  users:{}/{}{filter}{message}",
        app.users.len(),
        app.users_all.len(),
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    // size from the message, wrap the rest
    let max_w = area.width.saturating_sub(6).max(30);
    let width = 50u16.min(max_w);
    let message_len = u16::try_from(message.len()).unwrap_or(u16::MAX);
    let approx_lines = (message_len / width.saturating_sub(4).max(10)).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = approx_lines.saturating_add(4).min(max_h).max(5);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(format!("{message}\n\n(Enter/Esc to close)"))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal from the active keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let entry = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {label:>18} │ ")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let bold = |s: &'static str| Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)));

    let mut lines = vec![bold("Users:")];
    for (label, action) in [
        ("New user", KeyAction::NewUser),
        ("Edit", KeyAction::EditSelection),
        ("Delete", KeyAction::DeleteSelection),
        ("Select / details", KeyAction::EnterAction),
        ("Back", KeyAction::Back),
        ("Refresh", KeyAction::Refresh),
        ("Search", KeyAction::StartSearch),
    ] {
        lines.push(entry(label, app.keymap.keys_for(action).join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(bold("Navigation:"));
    for (label, action) in [
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Page up", KeyAction::PageUp),
        ("Page down", KeyAction::PageDown),
    ] {
        lines.push(entry(label, app.keymap.keys_for(action).join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(bold("General:"));
    lines.push(entry("Help", app.keymap.keys_for(KeyAction::OpenHelp).join(", ")));
    lines.push(entry("Quit", app.keymap.keys_for(KeyAction::Quit).join(", ")));
    lines.push(Line::raw(""));
    lines.push(bold("Form:"));
    lines.push(entry("Next / prev field", "Tab, Down / BackTab, Up".to_string()));
    lines.push(entry("Submit", "Enter".to_string()));
    lines.push(entry("Cancel", "Esc".to_string()));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
