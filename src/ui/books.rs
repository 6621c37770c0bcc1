use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, Field, Focus, InputMode};
use crate::ui::components::{border_style, table_title, visible_window};
use crate::ui::field_text;

/// Books table with the add-book form and text search above it.
pub fn render_books(f: &mut Frame, area: Rect, app: &mut AppState) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(parts[0]);

    render_book_form(f, top[0], app);

    let search = Paragraph::new(field_text(app, Field::BookSearch)).block(
        Block::default()
            .title("Search text (/ to edit, Enter to search)")
            .borders(Borders::ALL)
            .border_style(border_style(app, app.input_mode == InputMode::Editing(Field::BookSearch))),
    );
    f.render_widget(search, top[1]);

    render_books_table(f, parts[1], app);
}

fn render_book_form(f: &mut Frame, area: Rect, app: &AppState) {
    let label = |field: Field| {
        let style = if app.input_mode == InputMode::Editing(field) {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        };
        Span::styled(format!("{}: ", field.label()), style)
    };
    let line = Line::from(vec![
        label(Field::BookIsbn),
        Span::raw(field_text(app, Field::BookIsbn)),
        Span::raw("   "),
        label(Field::BookTitle),
        Span::raw(field_text(app, Field::BookTitle)),
    ]);
    let editing = matches!(app.input_mode, InputMode::Editing(Field::BookIsbn | Field::BookTitle));
    let p = Paragraph::new(line).block(
        Block::default()
            .title("Add book (i/t to edit, a to add)")
            .borders(Borders::ALL)
            .border_style(border_style(app, editing)),
    );
    f.render_widget(p, area);
}

pub fn render_books_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 && app.focus == Focus::Books {
        app.rows_per_page = body_height;
    }
    let books = &app.page.books.items;
    let (start, end) = visible_window(app.selected_book_index, body_height.max(1), books.len());

    let rows = books[start..end].iter().enumerate().map(|(i, b)| {
        let style = if start + i == app.selected_book_index {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![Cell::from(b.isbn.clone()), Cell::from(b.title.clone())]).style(style)
    });

    let widths = [Constraint::Length(20), Constraint::Percentage(100)];
    let header = Row::new(vec!["ISBN", "TITLE"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(table_title("Books", app.page.books.is_loading, books.len()))
                .borders(Borders::ALL)
                .border_style(border_style(app, app.focus == Focus::Books)),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}
