use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, Field, Focus};
use crate::ui::components::{border_style, table_title, visible_window};
use crate::ui::field_text;

/// Users table with its username search box above it.
pub fn render_users(f: &mut Frame, area: Rect, app: &mut AppState) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let focused = app.focus == Focus::Users;
    let search = Paragraph::new(field_text(app, Field::UserSearch)).block(
        Block::default()
            .title("Search username (/ to edit, Enter to search)")
            .borders(Borders::ALL)
            .border_style(border_style(app, focused)),
    );
    f.render_widget(search, parts[0]);

    render_users_table(f, parts[1], app);
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 && app.focus == Focus::Users {
        app.rows_per_page = body_height;
    }
    let users = &app.page.users.items;
    let (start, end) = visible_window(app.selected_user_index, body_height.max(1), users.len());

    let rows = users[start..end].iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_user_index {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.map(|id| id.to_string()).unwrap_or_default()),
            Cell::from(u.username.clone()),
            Cell::from(u.name.clone().unwrap_or_default()),
            Cell::from(u.email.clone().unwrap_or_default()),
            Cell::from(u.role.clone().unwrap_or_default()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(20),
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Length(8),
    ];
    let header = Row::new(vec!["ID", "USERNAME", "NAME", "EMAIL", "ROLE"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(table_title("Users", app.page.users.is_loading, users.len()))
                .borders(Borders::ALL)
                .border_style(border_style(app, app.focus == Focus::Users)),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}
