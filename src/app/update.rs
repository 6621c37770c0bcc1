use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;

use crate::app::keymap::KeyAction;
use crate::app::page::{Msg, Route};
use crate::app::{AppState, DeleteTarget, Field, Focus, InputMode, ModalState};
use crate::ui;

const TICK: Duration = Duration::from_millis(50);

/// Draw, apply finished requests, handle one key; repeat until quit. Pending requests
/// are aborted on the way out.
pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: AppState) -> Result<()> {
    loop {
        app.pump();
        terminal.draw(|f| ui::render(f, &mut app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key);
                }
            }
        }
        if app.should_quit {
            break;
        }
    }
    app.unmount().await;
    Ok(())
}

/// Route a key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Editing(field) => handle_editing_key(app, field, key.code),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) {
    let Some(action) = app.keymap.resolve(&key) else { return };
    if app.route() == Route::Home {
        // the home screen only offers help and quit
        match action {
            KeyAction::Quit => app.should_quit = true,
            KeyAction::OpenHelp => open_modal(app, ModalState::Help { scroll: 0 }),
            _ => {}
        }
        return;
    }
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::OpenHelp => open_modal(app, ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => {
            let field = match app.focus {
                Focus::Users => Field::UserSearch,
                Focus::Books => Field::BookSearch,
            };
            app.input_mode = InputMode::Editing(field);
        }
        KeyAction::EditIsbn => {
            app.focus = Focus::Books;
            app.input_mode = InputMode::Editing(Field::BookIsbn);
        }
        KeyAction::EditTitle => {
            app.focus = Focus::Books;
            app.input_mode = InputMode::Editing(Field::BookTitle);
        }
        KeyAction::AddBook => app.send(Msg::AddBook),
        KeyAction::DeleteSelection => {
            let target = match app.focus {
                Focus::Users => app.selected_user().map(|u| DeleteTarget::User(u.username.clone())),
                Focus::Books => app.selected_book().map(|b| DeleteTarget::Book(b.isbn.clone())),
            };
            if let Some(target) = target {
                // default to "No"
                open_modal(app, ModalState::DeleteConfirm { target, selected: 1 });
            }
        }
        KeyAction::SwitchFocus => app.focus = app.focus.toggled(),
        KeyAction::Reload => app.send(Msg::Load(app.focus.kind())),
        KeyAction::MoveUp => move_selection(app, -1),
        KeyAction::MoveDown => move_selection(app, 1),
        KeyAction::PageUp | KeyAction::PageDown => {
            let page = app.rows_per_page.max(1) as isize;
            let delta = if action == KeyAction::PageUp { -page } else { page };
            move_selection(app, delta);
        }
        KeyAction::Ignore => {}
    }
}

fn handle_editing_key(app: &mut AppState, field: Field, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            match field {
                Field::UserSearch => app.send(Msg::SearchUsers),
                Field::BookSearch => app.send(Msg::SearchBooks),
                Field::BookIsbn => app.input_mode = InputMode::Editing(Field::BookTitle),
                Field::BookTitle => app.send(Msg::AddBook),
            }
        }
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Tab if matches!(field, Field::BookIsbn | Field::BookTitle) => {
            let next = if field == Field::BookIsbn { Field::BookTitle } else { Field::BookIsbn };
            app.input_mode = InputMode::Editing(next);
        }
        KeyCode::Backspace => {
            let mut value = app.field_value(field).to_string();
            if value.pop().is_some() {
                app.send(field.changed(value));
            }
        }
        KeyCode::Char(c) => {
            let mut value = app.field_value(field).to_string();
            value.push(c);
            app.send(field.changed(value));
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match app.modal.as_mut() {
        Some(ModalState::DeleteConfirm { target, selected }) => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - (*selected).min(1);
            }
            KeyCode::Char('y') => {
                let target = target.clone();
                close_modal(app);
                app.send(target.into_msg());
            }
            KeyCode::Enter => {
                let confirmed = (*selected == 0).then(|| target.clone());
                close_modal(app);
                if let Some(target) = confirmed {
                    app.send(target.into_msg());
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => close_modal(app),
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => close_modal(app),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}

fn move_selection(app: &mut AppState, delta: isize) {
    let (index, len) = match app.focus {
        Focus::Users => (&mut app.selected_user_index, app.page.users.items.len()),
        Focus::Books => (&mut app.selected_book_index, app.page.books.items.len()),
    };
    let last = len.saturating_sub(1);
    *index = index.saturating_add_signed(delta).min(last);
}

fn open_modal(app: &mut AppState, modal: ModalState) {
    app.modal = Some(modal);
    app.input_mode = InputMode::Modal;
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}
