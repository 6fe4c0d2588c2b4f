use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single keyboard chord: held modifiers plus one key token.
///
/// The canonical rendering joins modifier names in a fixed order
/// (Ctrl, Alt, Shift, Meta) with `+` and ends with the key token,
/// e.g. `"Ctrl+Shift+A"`. Two chords are equal iff their canonical
/// renderings are equal, so the persisted form is just the string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Chord {
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
    key: String,
}

impl Chord {
    /// Build a chord from a terminal key event.
    ///
    /// Returns `None` for events that cannot stand alone as a chord:
    /// pure modifier presses, Escape (reserved for cancelling capture),
    /// and keys with no stable display token.
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        let token = key_token(key.code)?;
        // Most terminals report Shift+Tab as BackTab with the shift bit
        // already stripped.
        let shift = key.modifiers.contains(KeyModifiers::SHIFT) || key.code == KeyCode::BackTab;
        Some(Self {
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            alt: key.modifiers.contains(KeyModifiers::ALT),
            shift,
            meta: key
                .modifiers
                .intersects(KeyModifiers::SUPER | KeyModifiers::META),
            key: token,
        })
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.meta {
            f.write_str("Meta+")?;
        }
        f.write_str(&self.key)
    }
}

/// Map a key code to its display token. Letters are uppercased so
/// `Ctrl+p` and `Ctrl+Shift+P` agree on the token.
fn key_token(code: KeyCode) -> Option<String> {
    let token = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(ch) if ch.is_ascii_alphabetic() => ch.to_ascii_uppercase().to_string(),
        KeyCode::Char(ch) if !ch.is_control() => ch.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Tab | KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        _ => return None,
    };
    Some(token)
}
