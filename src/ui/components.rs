//! Shared UI components (status bar, modals, small layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, DeleteTarget, Focus, InputMode};

/// Render the bottom status bar with mode, focus and in-flight requests.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL".to_string(),
        InputMode::Editing(field) => format!("EDIT({})", field.label()),
        InputMode::Modal => "MODAL".to_string(),
    };
    let focus = match app.focus {
        Focus::Users => "users",
        Focus::Books => "books",
    };
    let pending = app.in_flight();
    let pending = if pending > 0 { format!("  requests:{pending}") } else { String::new() };
    let msg = format!("mode: {mode}  focus: {focus}  rows/page:{}{pending}", app.rows_per_page);
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

pub fn border_style(app: &AppState, focused: bool) -> Style {
    if focused {
        Style::default().fg(app.theme.highlight_fg)
    } else {
        Style::default().fg(app.theme.border)
    }
}

pub fn table_title(name: &str, loading: bool, count: usize) -> String {
    if loading {
        format!("{name} (loading...)")
    } else {
        format!("{name} ({count})")
    }
}

/// Page-aligned `[start, end)` slice of `len` rows that contains `selected`.
pub fn visible_window(selected: usize, rows: usize, len: usize) -> (usize, usize) {
    let rows = rows.max(1);
    let start = ((selected / rows) * rows).min(len);
    (start, (start + rows).min(len))
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

fn modal_block(app: &AppState, title: &'static str) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, target: &DeleteTarget, selected: usize) {
    let rect = centered_rect(50, 7, area);
    let what = match target {
        DeleteTarget::User(username) => format!("user '{username}'"),
        DeleteTarget::Book(isbn) => format!("book '{isbn}'"),
    };
    let yes = if selected == 0 { "[Yes]" } else { " Yes " };
    let no = if selected == 1 { "[No]" } else { " No " };
    let body = format!("Delete {what}?\n\n  {yes}    {no}\n\ny/n, Left/Right, Enter");
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(modal_block(app, "Confirm delete"));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Help modal, built from the live keymap so rebinding shows up here.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let entries = [
        ("Switch table", KeyAction::SwitchFocus),
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Page up", KeyAction::PageUp),
        ("Page down", KeyAction::PageDown),
        ("Search focused table", KeyAction::StartSearch),
        ("Reload focused table", KeyAction::Reload),
        ("Edit book ISBN", KeyAction::EditIsbn),
        ("Edit book title", KeyAction::EditTitle),
        ("Add book", KeyAction::AddBook),
        ("Delete selection", KeyAction::DeleteSelection),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ];
    let label_w = entries.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut lines = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for (label, action) in entries {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:>label_w$} │ ")),
            Span::styled(
                app.keymap.keys_for(action).join(", "),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("While editing", Style::default().add_modifier(Modifier::BOLD))));
    lines.push(Line::raw("  Enter submits (search, or ISBN -> title -> add), Esc leaves the field,"));
    lines.push(Line::raw("  Tab switches between ISBN and title."));
    lines.push(Line::raw(""));
    lines.push(Line::raw("Close: Esc / Enter"));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(modal_block(app, "Help"));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
