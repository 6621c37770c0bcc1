//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only Normal mode goes through the keymap. While a text field is being edited every
//! printable key is text, and modals use fixed keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::Path;

use super::config::key_values;

/// Semantic actions that can be bound to keys in Normal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    OpenHelp,
    /// Edit the search box of the focused table.
    StartSearch,
    EditIsbn,
    EditTitle,
    /// Submit the add-book form.
    AddBook,
    /// Ask to delete the selected user or book.
    DeleteSelection,
    /// Move focus between the users and books tables.
    SwitchFocus,
    /// Reload the focused table from the server.
    Reload,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Ignore,
}

const ACTIONS: [(KeyAction, &str); 14] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::EditIsbn, "EditIsbn"),
    (KeyAction::EditTitle, "EditTitle"),
    (KeyAction::AddBook, "AddBook"),
    (KeyAction::DeleteSelection, "DeleteSelection"),
    (KeyAction::SwitchFocus, "SwitchFocus"),
    (KeyAction::Reload, "Reload"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PageUp, "PageUp"),
    (KeyAction::PageDown, "PageDown"),
    (KeyAction::Ignore, "Ignore"),
];

/// Maps `(KeyModifiers, KeyCode)` to a [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

impl Keymap {
    /// Built-in bindings: arrows plus vim keys, `/` search, `i`/`t` form fields,
    /// `a` add, Delete or `d` delete, Tab focus, `r` reload, `?` help, `q` quit.
    pub fn new_defaults() -> Self {
        use KeyAction as A;
        use KeyCode::*;
        let none = KeyModifiers::NONE;
        let bindings = [
            (Char('q'), A::Quit),
            (Char('?'), A::OpenHelp),
            (Char('/'), A::StartSearch),
            (Char('i'), A::EditIsbn),
            (Char('t'), A::EditTitle),
            (Char('a'), A::AddBook),
            (Delete, A::DeleteSelection),
            (Char('d'), A::DeleteSelection),
            (Tab, A::SwitchFocus),
            (BackTab, A::SwitchFocus),
            (Char('r'), A::Reload),
            (Up, A::MoveUp),
            (Char('k'), A::MoveUp),
            (Down, A::MoveDown),
            (Char('j'), A::MoveDown),
            (PageUp, A::PageUp),
            (PageDown, A::PageDown),
            (Esc, A::Ignore),
        ]
        .into_iter()
        .map(|(code, action)| ((none, code), action))
        .collect::<HashMap<_, _>>();
        let mut map = Self { bindings };
        // some terminals report BackTab with SHIFT set
        map.bindings.insert((KeyModifiers::SHIFT, BackTab), A::SwitchFocus);
        map
    }

    /// Parse `<Action> = <KeySpec>` lines on top of the defaults.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for (lhs, rhs) in key_values(contents) {
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|c| Self::parse(&c))
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# book-admin keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec: a single character, Ctrl+<char>, Enter, Esc, Tab, BackTab, Up, Down, PageUp, PageDown, Delete\n\n");
        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| format!("{} = {}", format_action(*action), Self::format_key(*mods, *code)))
            .collect();
        lines.sort();
        for line in lines {
            let _ = writeln!(buf, "{line}");
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, or write the defaults there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted, for the help screen.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Human-readable key spec like `Ctrl+q` or `BackTab`.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        let base = match code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::BackTab => "BackTab".into(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::Delete => "Delete".into(),
            other => format!("{other:?}"),
        };
        if mods.contains(KeyModifiers::CONTROL) { format!("Ctrl+{base}") } else { base }
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    let (mods, rest) = match spec.strip_prefix("Ctrl+") {
        Some(rest) => (KeyModifiers::CONTROL, rest),
        None => (KeyModifiers::NONE, spec),
    };
    let code = match rest {
        "Enter" => KeyCode::Enter,
        "Esc" | "Escape" => KeyCode::Esc,
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Delete" => KeyCode::Delete,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ACTIONS.iter().find(|(_, name)| *name == s).map(|(a, _)| *a)
}

pub fn format_action(action: KeyAction) -> &'static str {
    ACTIONS
        .iter()
        .find(|(a, _)| *a == action)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_cover_vim_and_arrows() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyCode::Char('j'))), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&key(KeyCode::Down)), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn file_overrides_defaults() {
        let km = Keymap::parse("Reload = Ctrl+r\nAddBook = Enter\nNotAnAction = z\nQuit = TooLong\n");
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(km.resolve(&ctrl_r), Some(KeyAction::Reload));
        assert_eq!(km.resolve(&key(KeyCode::Enter)), Some(KeyAction::AddBook));
        assert_eq!(km.resolve(&key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn every_action_name_round_trips() {
        for (action, name) in ACTIONS {
            assert_eq!(parse_action(name), Some(action));
            assert_eq!(format_action(action), name);
        }
    }
}
