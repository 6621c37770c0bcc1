pub mod books;
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::page::Route;
use crate::app::{AppState, InputMode, ModalState};

/// Render the whole screen for the current route.
pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(1)])
        .split(f.area());

    render_header(f, root[0], app);
    match app.route() {
        Route::Home => render_home(f, root[1], app),
        Route::Admin => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(root[1]);
            users::render_users(f, body[0], app);
            books::render_books(f, body[1], app);
        }
    }
    components::render_status_bar(f, root[2], app);

    if let Some(modal) = app.modal.clone() {
        render_modal(f, f.area(), app, &modal);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let who = app.signed_in_as.as_deref().unwrap_or("anonymous");
    let counts = match app.route() {
        Route::Admin => format!(
            "  users:{}  books:{}",
            app.page.users.items.len(),
            app.page.books.items.len()
        ),
        Route::Home => String::new(),
    };
    let text = format!(
        "{} ({who}){counts}  Tab: switch table; /: search; i/t: book form; a: add; d: delete; r: reload; ?: help; q: quit",
        app.route().path()
    );
    let p = Paragraph::new(text)
        .block(
            Block::default()
                .title("book-admin")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

/// Landing screen shown to anyone who is not an admin.
fn render_home(f: &mut Frame, area: Rect, app: &AppState) {
    let lines = vec![
        Line::from(Span::styled(
            "Admin access required",
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw("The current session is missing or does not have the ADMIN role."),
        Line::raw("Sign in as an administrator, then start book-admin again."),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Quit: "),
            Span::styled("q", Style::default().add_modifier(Modifier::ITALIC)),
        ]),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Home")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, modal: &ModalState) {
    match modal {
        ModalState::DeleteConfirm { target, selected } => {
            components::render_delete_modal(f, area, app, target, *selected)
        }
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}

/// Text shown for a field; the one being edited gets a cursor.
pub(crate) fn field_text(app: &AppState, field: crate::app::Field) -> String {
    let value = app.field_value(field);
    if app.input_mode == InputMode::Editing(field) {
        format!("{value}_")
    } else {
        value.to_string()
    }
}
