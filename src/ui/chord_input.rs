use crossterm::event::{KeyCode, KeyEvent};

use crate::chord::Chord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Key did not affect the capture (pure modifier, unmappable key).
    Ignored,
    /// A chord was committed; recording ended.
    Committed,
    /// Recording was cancelled; the previous value is restored.
    Cancelled,
}

/// A field that records a single keyboard chord.
///
/// Idle it shows the last committed chord read-only. Gaining focus starts
/// recording: the display clears and the next non-modifier key press is
/// committed as the new chord. Escape (or losing focus) restores whatever
/// was shown before recording started.
#[derive(Clone, Debug, Default)]
pub struct ChordInput {
    committed: String,
    prev_display: String,
    recording: bool,
}

impl ChordInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset with a previously persisted chord string.
    pub fn with_chord(chord: &str) -> Self {
        Self {
            committed: chord.to_string(),
            prev_display: String::new(),
            recording: false,
        }
    }

    /// The last committed chord, empty if never set.
    pub fn chord(&self) -> &str {
        &self.committed
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Focus gained: stash the current display so a cancelled recording
    /// can restore it, then clear the field.
    pub fn begin_recording(&mut self) {
        if self.recording {
            return;
        }
        self.prev_display = self.committed.clone();
        self.committed.clear();
        self.recording = true;
    }

    /// Focus lost with no key pressed: restore the previous display.
    pub fn abort(&mut self) {
        if self.recording {
            self.committed = std::mem::take(&mut self.prev_display);
            self.recording = false;
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> CaptureOutcome {
        if !self.recording {
            return CaptureOutcome::Ignored;
        }
        if key.code == KeyCode::Esc {
            self.committed = std::mem::take(&mut self.prev_display);
            self.recording = false;
            return CaptureOutcome::Cancelled;
        }
        match Chord::from_key_event(key) {
            Some(chord) => {
                self.committed = chord.to_string();
                self.prev_display.clear();
                self.recording = false;
                CaptureOutcome::Committed
            }
            None => CaptureOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, ModifierKeyCode};

    fn event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn modifier_presses_never_commit() {
        let mut input = ChordInput::new();
        input.begin_recording();
        for code in [
            KeyCode::Modifier(ModifierKeyCode::LeftControl),
            KeyCode::Modifier(ModifierKeyCode::RightShift),
            KeyCode::Modifier(ModifierKeyCode::LeftAlt),
        ] {
            let outcome = input.handle_key(&event(code, KeyModifiers::NONE));
            assert_eq!(outcome, CaptureOutcome::Ignored);
            assert!(input.is_recording());
            assert_eq!(input.chord(), "");
        }
    }

    #[test]
    fn escape_restores_previous_display() {
        let mut input = ChordInput::with_chord("Ctrl+P");
        input.begin_recording();
        assert_eq!(input.chord(), "");

        let outcome = input.handle_key(&event(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(outcome, CaptureOutcome::Cancelled);
        assert!(!input.is_recording());
        assert_eq!(input.chord(), "Ctrl+P");
    }

    #[test]
    fn shift_a_commits_canonical_string() {
        let mut input = ChordInput::new();
        input.begin_recording();
        let outcome = input.handle_key(&event(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(outcome, CaptureOutcome::Committed);
        assert!(!input.is_recording());
        assert_eq!(input.chord(), "Shift+A");
    }

    #[test]
    fn commit_replaces_previous_chord() {
        let mut input = ChordInput::with_chord("Ctrl+1");
        input.begin_recording();
        input.handle_key(&event(KeyCode::Char('2'), KeyModifiers::CONTROL));
        assert_eq!(input.chord(), "Ctrl+2");
    }

    #[test]
    fn focus_loss_restores_previous_display() {
        let mut input = ChordInput::with_chord("Ctrl+X");
        input.begin_recording();
        input.abort();
        assert!(!input.is_recording());
        assert_eq!(input.chord(), "Ctrl+X");
    }

    #[test]
    fn keys_while_idle_are_ignored() {
        let mut input = ChordInput::with_chord("Ctrl+X");
        let outcome = input.handle_key(&event(KeyCode::Char('z'), KeyModifiers::NONE));
        assert_eq!(outcome, CaptureOutcome::Ignored);
        assert_eq!(input.chord(), "Ctrl+X");
    }
}
