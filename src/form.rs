use crate::config::{DELAY_STEP, Settings};
use crate::ui::chord_input::ChordInput;
use crate::ui::line_input::LineInput;

/// Coarse stepper + precise numeric entry over the same delay value.
/// The two views are kept in sync; an update that would not change the
/// value reports `false` so synchronization can never oscillate.
#[derive(Clone, Debug)]
pub struct DelayControl {
    value: f64,
    entry: String,
}

impl DelayControl {
    pub fn new(value: f64) -> Self {
        let value = Settings::clamp_delay(value);
        Self {
            value,
            entry: format_delay(value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// What the numeric entry control displays.
    pub fn entry_display(&self) -> &str {
        &self.entry
    }

    pub fn step_up(&mut self) -> bool {
        self.set_stepper(self.value + DELAY_STEP)
    }

    pub fn step_down(&mut self) -> bool {
        self.set_stepper(self.value - DELAY_STEP)
    }

    /// Stepper-side update. Returns whether a change propagated.
    pub fn set_stepper(&mut self, value: f64) -> bool {
        let value = Settings::clamp_delay(value);
        if (value - self.value).abs() < f64::EPSILON {
            return false;
        }
        self.value = value;
        self.entry = format_delay(value);
        true
    }

    /// Entry-side update from submitted text. Unparseable text leaves the
    /// value alone and renormalizes the display.
    pub fn set_entry(&mut self, text: &str) -> bool {
        let Ok(parsed) = text.trim().parse::<f64>() else {
            self.entry = format_delay(self.value);
            return false;
        };
        let value = Settings::clamp_delay(parsed);
        let changed = (value - self.value).abs() >= f64::EPSILON;
        self.value = value;
        self.entry = format_delay(value);
        changed
    }
}

fn format_delay(value: f64) -> String {
    format!("{value:.1}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Attract,
    Repel,
    Toggle,
    Delay,
    StoragePath,
    Save,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Attract,
        FormField::Repel,
        FormField::Toggle,
        FormField::Delay,
        FormField::StoragePath,
        FormField::Save,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Attract => "Attract shortcut",
            FormField::Repel => "Repel shortcut",
            FormField::Toggle => "Start/stop shortcut",
            FormField::Delay => "Delay (seconds)",
            FormField::StoragePath => "Script directory",
            FormField::Save => "Save",
        }
    }
}

/// State of the settings page: three chord captures, the delay control,
/// the storage directory, and a field cursor.
pub struct SettingsForm {
    pub attract: ChordInput,
    pub repel: ChordInput,
    pub toggle: ChordInput,
    pub delay: DelayControl,
    pub storage_path: String,
    pub selected: usize,
    /// Line editor open over the storage-path field, if any.
    pub path_editor: Option<LineInput>,
    /// Line editor open over the precise delay entry, if any.
    pub delay_editor: Option<LineInput>,
}

impl SettingsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            attract: ChordInput::with_chord(&settings.attract_shortcut),
            repel: ChordInput::with_chord(&settings.repel_shortcut),
            toggle: ChordInput::with_chord(&settings.toggle_shortcut),
            delay: DelayControl::new(settings.delay_seconds),
            storage_path: settings.storage_path.clone(),
            selected: 0,
            path_editor: None,
            delay_editor: None,
        }
    }

    pub fn selected_field(&self) -> FormField {
        FormField::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % FormField::ALL.len();
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = FormField::ALL.len() - 1;
        }
    }

    /// The chord input currently recording, if any.
    pub fn recording_input_mut(&mut self) -> Option<&mut ChordInput> {
        [&mut self.attract, &mut self.repel, &mut self.toggle]
            .into_iter()
            .find(|input| input.is_recording())
    }

    pub fn chord_input_mut(&mut self, field: FormField) -> Option<&mut ChordInput> {
        match field {
            FormField::Attract => Some(&mut self.attract),
            FormField::Repel => Some(&mut self.repel),
            FormField::Toggle => Some(&mut self.toggle),
            _ => None,
        }
    }

    /// Valid iff all three shortcuts are set and pairwise distinct.
    pub fn validate(&self) -> Result<(), String> {
        let a = self.attract.chord();
        let r = self.repel.chord();
        let t = self.toggle.chord();
        if a.is_empty() || r.is_empty() || t.is_empty() {
            return Err("All three shortcuts must be set.".to_string());
        }
        if a == r || a == t || r == t {
            return Err("All shortcuts must be distinct.".to_string());
        }
        Ok(())
    }

    /// Write the form values into the record and clear the first-run flag.
    /// Callers validate first and persist the record afterwards.
    pub fn apply(&self, settings: &mut Settings) {
        settings.attract_shortcut = self.attract.chord().to_string();
        settings.repel_shortcut = self.repel.chord().to_string();
        settings.toggle_shortcut = self.toggle.chord().to_string();
        settings.delay_seconds = self.delay.value();
        settings.storage_path = self.storage_path.trim().to_string();
        settings.first_run = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(attract: &str, repel: &str, toggle: &str) -> SettingsForm {
        let settings = Settings {
            attract_shortcut: attract.to_string(),
            repel_shortcut: repel.to_string(),
            toggle_shortcut: toggle.to_string(),
            ..Settings::default()
        };
        SettingsForm::from_settings(&settings)
    }

    #[test]
    fn validate_rejects_missing_shortcuts() {
        let form = form_with("Ctrl+1", "", "Ctrl+3");
        let err = form.validate().unwrap_err();
        assert!(err.contains("must be set"));
    }

    #[test]
    fn validate_rejects_duplicates() {
        for (a, r, t) in [
            ("Ctrl+1", "Ctrl+1", "Ctrl+3"),
            ("Ctrl+1", "Ctrl+2", "Ctrl+1"),
            ("Ctrl+1", "Ctrl+2", "Ctrl+2"),
        ] {
            let form = form_with(a, r, t);
            let err = form.validate().unwrap_err();
            assert!(err.contains("distinct"), "expected duplicate error for {a}/{r}/{t}");
        }
    }

    #[test]
    fn validate_accepts_distinct_chords() {
        let form = form_with("Ctrl+1", "Ctrl+2", "Ctrl+3");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn apply_writes_record_and_clears_first_run() {
        let mut form = form_with("Ctrl+1", "Ctrl+2", "Ctrl+3");
        form.storage_path = "  /tmp/out  ".to_string();
        let mut settings = Settings::default();
        assert!(settings.first_run);

        form.apply(&mut settings);
        assert!(!settings.first_run);
        assert_eq!(settings.attract_shortcut, "Ctrl+1");
        assert_eq!(settings.storage_path, "/tmp/out");
        assert_eq!(settings.delay_seconds, 4.0);
    }

    #[test]
    fn delay_stepper_updates_entry_display() {
        let mut delay = DelayControl::new(4.0);
        assert!(delay.set_stepper(7.5));
        assert_eq!(delay.entry_display(), "7.5");
        assert_eq!(delay.value(), 7.5);
    }

    #[test]
    fn delay_identical_update_reports_no_change() {
        let mut delay = DelayControl::new(4.0);
        assert!(delay.set_stepper(7.5));
        // Second identical update: no further change event.
        assert!(!delay.set_stepper(7.5));
        assert!(!delay.set_entry("7.5"));
        assert_eq!(delay.entry_display(), "7.5");
    }

    #[test]
    fn delay_entry_updates_stepper() {
        let mut delay = DelayControl::new(4.0);
        assert!(delay.set_entry("7.5"));
        assert_eq!(delay.value(), 7.5);
        assert_eq!(delay.entry_display(), "7.5");
    }

    #[test]
    fn delay_entry_clamps_and_snaps() {
        let mut delay = DelayControl::new(4.0);
        delay.set_entry("99");
        assert_eq!(delay.value(), 10.0);
        delay.set_entry("3.3");
        assert_eq!(delay.value(), 3.5);
    }

    #[test]
    fn delay_entry_garbage_renormalizes_display() {
        let mut delay = DelayControl::new(4.0);
        assert!(!delay.set_entry("fast"));
        assert_eq!(delay.value(), 4.0);
        assert_eq!(delay.entry_display(), "4.0");
    }

    #[test]
    fn delay_steps_clamp_at_bounds() {
        let mut delay = DelayControl::new(10.0);
        assert!(!delay.step_up());
        let mut delay = DelayControl::new(2.0);
        assert!(!delay.step_down());
    }
}
