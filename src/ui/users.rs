use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::api::User;
use crate::app::{AppState, FormField, UserForm};
use crate::ui::components::centered_rect;

/// Users table, paged so the cursor row is always visible.
pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let header = Row::new(vec!["ID", "NAME", "EMAIL"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));
    let widths = [Constraint::Length(8), Constraint::Percentage(40), Constraint::Percentage(60)];
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.users.is_empty() {
        let row = Row::new(vec![Cell::from(""), Cell::from("No users")])
            .style(Style::default().fg(app.theme.muted));
        let table = Table::new(vec![row], widths).header(header).block(block);
        f.render_widget(table, area);
        return;
    }

    let start = (app.cursor / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.users.len());
    let selected_id = app.selected.as_ref().and_then(|u| u.id);

    let rows = app.users[start..end].iter().enumerate().map(|(i, u)| {
        let mut style = Style::default().fg(app.theme.text);
        if u.id.is_some() && u.id == selected_id {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if start + i == app.cursor {
            style = style
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD);
        }
        Row::new(vec![
            Cell::from(u.id.map(|id| id.to_string()).unwrap_or_default()),
            Cell::from(u.name_or_empty().to_string()),
            Cell::from(u.email_or_empty().to_string()),
        ])
        .style(style)
    });

    let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match &app.selected {
        Some(u) => format!(
            "ID: {}\nName: {}\nEmail: {}\n\ne: edit  d: delete  Esc: back",
            u.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            u.name_or_empty(),
            u.email_or_empty(),
        ),
        None => "No user selected.\n\nEnter: select  n: create".to_string(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState, form: &UserForm) {
    let rect = centered_rect(60, 10, area);
    let marker = |field: FormField| if form.focus == field { "▶" } else { " " };
    let field_style = |error: bool| {
        if error { Style::default().fg(app.theme.error) } else { Style::default().fg(app.theme.text) }
    };
    let cursor = |field: FormField| if form.focus == field { "_" } else { "" };

    let submit_style = if form.can_submit() {
        Style::default().fg(app.theme.text)
    } else {
        Style::default().fg(app.theme.muted)
    };
    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{} Name*:  ", marker(FormField::Name))),
            Span::styled(format!("{}{}", form.name, cursor(FormField::Name)), field_style(form.name_error())),
        ]),
        Line::from(vec![
            Span::raw(format!("{} Email*: ", marker(FormField::Email))),
            Span::styled(format!("{}{}", form.email, cursor(FormField::Email)), field_style(form.email_error())),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("{} [Submit]", marker(FormField::Submit)), submit_style),
            Span::raw(format!("    {} [Cancel]", marker(FormField::Cancel))),
        ]),
        Line::raw(""),
        Line::styled("Tab: next field  Enter: submit  Esc: cancel", Style::default().fg(app.theme.muted)),
    ];

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(form.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_confirm(f: &mut Frame, area: Rect, app: &AppState, target: &User, selected: usize) {
    let rect = centered_rect(56, 7, area);
    let confirm = if selected == 0 { "[Confirm]" } else { " Confirm " };
    let cancel = if selected == 1 { "[Cancel]" } else { " Cancel " };
    let body = format!(
        "Removing user {} ({})\n\n  {confirm}    {cancel}",
        target.name_or_empty(),
        target.email_or_empty(),
    );
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
