//! Keybinding configuration: defaults, `keybinds.conf` parsing, and key-to-action lookup.
//!
//! The config file uses `<Action> = <KeySpec>` lines. Bindings in the file are
//! added on top of the defaults, so a file only needs the keys it changes.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

/// What a key does in normal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    OpenHelp,
    StartSearch,
    NewRecord,
    EditRecord,
    DeleteSelection,
    /// Show the selected record's details.
    EnterAction,
    Refresh,
    Logout,
    NextTab,
    PrevTab,
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    Ignore,
}

const ACTIONS: &[(KeyAction, &str)] = &[
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::NewRecord, "NewRecord"),
    (KeyAction::EditRecord, "EditRecord"),
    (KeyAction::DeleteSelection, "DeleteSelection"),
    (KeyAction::EnterAction, "EnterAction"),
    (KeyAction::Refresh, "Refresh"),
    (KeyAction::Logout, "Logout"),
    (KeyAction::NextTab, "NextTab"),
    (KeyAction::PrevTab, "PrevTab"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PrevPage, "PrevPage"),
    (KeyAction::NextPage, "NextPage"),
    (KeyAction::Ignore, "Ignore"),
];

#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Default for Keymap {
    fn default() -> Self {
        use KeyCode::*;
        let none = KeyModifiers::NONE;
        let mut bindings = HashMap::new();
        for (code, action) in [
            (Char('q'), KeyAction::Quit),
            (Esc, KeyAction::Ignore),
            (Char('?'), KeyAction::OpenHelp),
            (Char('/'), KeyAction::StartSearch),
            (Char('n'), KeyAction::NewRecord),
            (Char('e'), KeyAction::EditRecord),
            (Delete, KeyAction::DeleteSelection),
            (Char('d'), KeyAction::DeleteSelection),
            (Enter, KeyAction::EnterAction),
            (Char('r'), KeyAction::Refresh),
            (Char('L'), KeyAction::Logout),
            (Tab, KeyAction::NextTab),
            (BackTab, KeyAction::PrevTab),
            (Up, KeyAction::MoveUp),
            (Down, KeyAction::MoveDown),
            (Char('k'), KeyAction::MoveUp),
            (Char('j'), KeyAction::MoveDown),
            (Left, KeyAction::PrevPage),
            (Right, KeyAction::NextPage),
            (Char('h'), KeyAction::PrevPage),
            (Char('l'), KeyAction::NextPage),
            (PageUp, KeyAction::PrevPage),
            (PageDown, KeyAction::NextPage),
        ] {
            bindings.insert((none, code), action);
        }
        // Terminals disagree on whether Shift accompanies BackTab and capitals.
        bindings.insert((KeyModifiers::SHIFT, BackTab), KeyAction::PrevTab);
        bindings.insert((KeyModifiers::SHIFT, Char('L')), KeyAction::Logout);
        Self { bindings }
    }
}

impl Keymap {
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else { continue };
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => warn!(line, "ignoring unrecognized keybinding"),
            }
        }
        map
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|c| Self::parse(&c))
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        let mut buf = String::new();
        buf.push_str("# admin-console keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+r, Enter, Esc, Tab, BackTab, Up, Down, Left, Right, PageUp, PageDown, Delete\n\n");
        let mut rows: Vec<_> = self
            .bindings
            .iter()
            .filter(|((mods, _), _)| !mods.contains(KeyModifiers::SHIFT))
            .map(|((mods, code), action)| (format_action(*action), Self::format_key(*mods, *code)))
            .collect();
        rows.sort();
        for (action, key) in rows {
            let _ = writeln!(&mut buf, "{} = {}", action, key);
        }
        std::fs::write(path, buf)
    }

    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            warn!(path = %path.display(), error = %e, "could not write default keybindings");
        }
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
            .filter(|((mods, _), _)| !mods.contains(KeyModifiers::SHIFT))
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) { format!("Ctrl+{}", base) } else { base }
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTIONS.iter().find(|(_, name)| *name == s).map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTIONS.iter().find(|(x, _)| *x == a).map(|(_, name)| *name).unwrap_or("Ignore")
}
