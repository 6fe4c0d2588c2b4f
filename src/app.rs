use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::{Settings, SettingsStore};
use crate::form::SettingsForm;
use crate::generator::{self, SCRIPT_FILENAME, ScriptTarget};
use crate::text;
use crate::ui::components::menu::Menu;
use crate::ui::components::summary::SummaryView;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Menu,
    Reverse,
    SwapCase,
    Settings,
    Regenerate,
    Summary,
}

impl Page {
    /// Map a page name to its page; unknown names fall back to the menu.
    pub fn from_name(name: &str) -> Self {
        match name {
            "menu" => Page::Menu,
            "reverse" => Page::Reverse,
            "swapcase" => Page::SwapCase,
            "settings" => Page::Settings,
            "regen" | "regenerate" => Page::Regenerate,
            "summary" => Page::Summary,
            _ => Page::Menu,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Warning,
    Error,
}

/// Transient one-line feedback. Expires on a tick; carries no state.
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub until: Instant,
}

const TOAST_SECS: u64 = 4;

pub struct App {
    pub page: Page,
    pub store: SettingsStore,
    pub settings: Settings,
    pub form: SettingsForm,
    pub summary: SummaryView,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub toast: Option<Toast>,
    /// Modal line editor asking for an explicit script path when no
    /// storage directory is configured.
    pub path_prompt: Option<LineInput>,
    pub last_generated: Option<PathBuf>,
    pub should_quit: bool,
    pub reverse_input: LineInput,
    pub reverse_result: String,
    pub swap_input: LineInput,
    pub swap_result: String,
}

impl App {
    /// The store is injected so every page reads the same record and tests
    /// can point the whole app at a scratch file.
    pub fn new(store: SettingsStore, theme: &'static Theme) -> Self {
        let settings = store.load();
        let first_run = settings.first_run;
        let start_page = if first_run { Page::Settings } else { Page::Summary };

        let mut app = Self {
            page: Page::Menu,
            form: SettingsForm::from_settings(&settings),
            summary: SummaryView::from_settings(&settings),
            menu: Menu::new(theme, first_run),
            theme,
            settings,
            store,
            toast: None,
            path_prompt: None,
            last_generated: None,
            should_quit: false,
            reverse_input: LineInput::new(""),
            reverse_result: String::new(),
            swap_input: LineInput::new(""),
            swap_result: String::new(),
        };
        app.navigate_to(start_page);
        app
    }

    /// Switch pages. The summary page is refreshed from the store *before*
    /// it becomes visible so out-of-band edits are never shown stale; the
    /// settings form likewise reloads the persisted record on entry.
    pub fn navigate_to(&mut self, page: Page) {
        match page {
            Page::Summary => self.refresh_summary(),
            Page::Settings => {
                self.settings = self.store.load();
                self.form = SettingsForm::from_settings(&self.settings);
            }
            Page::Menu => {
                self.menu = Menu::new(self.theme, self.store.is_first_run());
            }
            _ => {}
        }
        info!(?page, "navigate");
        self.page = page;
    }

    pub fn navigate_to_name(&mut self, name: &str) {
        self.navigate_to(Page::from_name(name));
    }

    pub fn refresh_summary(&mut self) {
        self.settings = self.store.load();
        self.summary = SummaryView::from_settings(&self.settings);
    }

    /// Validate and persist the form. On success the app lands on the
    /// summary page; on failure the record is left untouched.
    pub fn save_settings(&mut self) {
        if let Err(message) = self.form.validate() {
            self.show_toast(message, ToastKind::Warning);
            return;
        }
        let mut settings = self.store.load();
        self.form.apply(&mut settings);
        match self.store.save(&settings) {
            Ok(()) => {
                self.settings = settings;
                info!("settings saved");
                self.show_toast("Settings saved.".to_string(), ToastKind::Info);
                self.navigate_to(Page::Summary);
            }
            Err(err) => {
                warn!(%err, "settings save failed");
                self.show_toast(format!("Could not save settings: {err}"), ToastKind::Error);
            }
        }
    }

    /// Generate from the persisted record. With a configured directory the
    /// script is written immediately; otherwise a path prompt opens and
    /// generation continues on submit.
    pub fn generate_script(&mut self) {
        let settings = self.store.load();
        match ScriptTarget::from_settings(&settings) {
            Some(target) => self.run_generate(&settings, target),
            None => {
                self.path_prompt = Some(LineInput::new(SCRIPT_FILENAME));
            }
        }
    }

    pub fn submit_path_prompt(&mut self) {
        let Some(input) = self.path_prompt.take() else {
            return;
        };
        let raw = input.value().trim().to_string();
        if raw.is_empty() {
            self.show_toast("No file path given.".to_string(), ToastKind::Warning);
            return;
        }
        let settings = self.store.load();
        self.run_generate(&settings, ScriptTarget::File(PathBuf::from(raw)));
    }

    fn run_generate(&mut self, settings: &Settings, target: ScriptTarget) {
        match generator::generate(settings, target) {
            Ok(path) => {
                self.show_toast(
                    format!("Script created: {} (press o to open folder)", path.display()),
                    ToastKind::Info,
                );
                self.last_generated = Some(path);
            }
            Err(err) => {
                warn!(%err, "generation failed");
                self.show_toast(err.to_string(), ToastKind::Error);
            }
        }
    }

    /// Best-effort folder reveal; a failure is only a warning.
    pub fn open_last_folder(&mut self) {
        let Some(path) = self.last_generated.clone() else {
            self.show_toast("Nothing generated yet.".to_string(), ToastKind::Warning);
            return;
        };
        if let Err(err) = generator::reveal_containing_folder(&path) {
            warn!(%err, "folder reveal failed");
            self.show_toast(format!("Could not open folder: {err}"), ToastKind::Warning);
        }
    }

    pub fn submit_reverse(&mut self) {
        self.reverse_result = text::reverse(self.reverse_input.value());
    }

    pub fn submit_swap(&mut self) {
        self.swap_result = text::swap_case(self.swap_input.value());
    }

    pub fn show_toast(&mut self, text: String, kind: ToastKind) {
        self.toast = Some(Toast {
            text,
            kind,
            until: Instant::now() + Duration::from_secs(TOAST_SECS),
        });
    }

    /// Periodic housekeeping from the event pump.
    pub fn tick(&mut self) {
        if let Some(ref toast) = self.toast {
            if Instant::now() >= toast.until {
                self.toast = None;
            }
        }
    }
}
