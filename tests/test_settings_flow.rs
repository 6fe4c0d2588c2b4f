use std::fs;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;

use keyloop::app::{App, Page};
use keyloop::config::{Settings, SettingsStore};
use keyloop::generator::SCRIPT_FILENAME;
use keyloop::ui::components::summary::PATH_UNSET;
use keyloop::ui::theme::Theme;

fn leaked_theme() -> &'static Theme {
    Box::leak(Box::new(Theme::default()))
}

fn ctrl_digit(digit: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(digit), KeyModifiers::CONTROL)
}

/// Record a chord into whichever form field is currently recording.
fn record(app: &mut App, key: KeyEvent) {
    let input = app
        .form
        .recording_input_mut()
        .expect("a chord field should be recording");
    input.handle_key(&key);
}

#[test]
fn first_run_setup_through_to_summary() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::with_path(dir.path().join("settings.json"));
    let mut app = App::new(store, leaked_theme());

    // No settings file: the app opens on the settings page.
    assert_eq!(app.page, Page::Settings);

    app.form.attract.begin_recording();
    record(&mut app, ctrl_digit('1'));
    app.form.repel.begin_recording();
    record(&mut app, ctrl_digit('2'));
    app.form.toggle.begin_recording();
    record(&mut app, ctrl_digit('3'));

    // Delay stays at its default, storage path stays empty.
    assert_eq!(app.form.delay.value(), 4.0);
    assert!(app.form.storage_path.is_empty());

    app.save_settings();

    // Record persisted with first_run cleared.
    let saved = app.store.load();
    assert!(!saved.first_run);
    assert_eq!(saved.attract_shortcut, "Ctrl+1");
    assert_eq!(saved.repel_shortcut, "Ctrl+2");
    assert_eq!(saved.toggle_shortcut, "Ctrl+3");
    assert_eq!(saved.delay_seconds, 4.0);

    // Navigator landed on the summary page with fresh values.
    assert_eq!(app.page, Page::Summary);
    assert_eq!(app.summary.attract, "Ctrl+1");
    assert_eq!(app.summary.repel, "Ctrl+2");
    assert_eq!(app.summary.toggle, "Ctrl+3");
    assert_eq!(app.summary.path, PATH_UNSET);
}

#[test]
fn duplicate_chords_block_save() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::with_path(dir.path().join("settings.json"));
    let mut app = App::new(store, leaked_theme());

    app.form.attract.begin_recording();
    record(&mut app, ctrl_digit('1'));
    app.form.repel.begin_recording();
    record(&mut app, ctrl_digit('1'));
    app.form.toggle.begin_recording();
    record(&mut app, ctrl_digit('3'));

    app.save_settings();

    // Still on the settings page, nothing persisted.
    assert_eq!(app.page, Page::Settings);
    assert!(app.store.load().first_run);
    assert!(app.form.validate().is_err());
}

#[test]
fn regenerate_from_summary_writes_script() {
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("out");
    let store = SettingsStore::with_path(dir.path().join("settings.json"));
    store
        .save(&Settings {
            first_run: false,
            attract_shortcut: "Ctrl+1".to_string(),
            repel_shortcut: "Ctrl+2".to_string(),
            toggle_shortcut: "Ctrl+3".to_string(),
            delay_seconds: 4.0,
            storage_path: out_dir.display().to_string(),
        })
        .unwrap();

    let mut app = App::new(store, leaked_theme());
    assert_eq!(app.page, Page::Summary);

    app.generate_script();

    let script_path = out_dir.join(SCRIPT_FILENAME);
    assert!(script_path.exists());
    let content = fs::read_to_string(&script_path).unwrap();
    assert!(content.contains("Ctrl+3::"), "toggle chord is the activation trigger");
    assert!(content.contains("^F11"), "fixed emergency stop chord");
    assert!(content.contains("Sleep 4000"), "delay embedded in milliseconds");
}

#[test]
fn generate_without_directory_prompts_then_writes_exact_path() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::with_path(dir.path().join("settings.json"));
    store
        .save(&Settings {
            first_run: false,
            attract_shortcut: "Ctrl+1".to_string(),
            repel_shortcut: "Ctrl+2".to_string(),
            toggle_shortcut: "Ctrl+3".to_string(),
            delay_seconds: 2.5,
            storage_path: String::new(),
        })
        .unwrap();

    let mut app = App::new(store, leaked_theme());
    app.generate_script();
    let prompt = app.path_prompt.as_mut().expect("prompt opens when no directory set");

    // Replace the suggested name with an explicit path.
    let target = dir.path().join("custom.ahk");
    prompt.handle(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    for ch in target.display().to_string().chars() {
        prompt.handle(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }
    app.submit_path_prompt();

    assert!(target.exists());
    let content = fs::read_to_string(&target).unwrap();
    assert!(content.contains("Sleep 2500"));
}

#[test]
fn navigation_falls_back_and_refreshes() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::with_path(dir.path().join("settings.json"));
    store
        .save(&Settings {
            first_run: false,
            attract_shortcut: "Ctrl+1".to_string(),
            repel_shortcut: "Ctrl+2".to_string(),
            toggle_shortcut: "Ctrl+3".to_string(),
            ..Settings::default()
        })
        .unwrap();
    let mut app = App::new(store, leaked_theme());

    app.navigate_to_name("swapcase");
    assert_eq!(app.page, Page::SwapCase);
    app.navigate_to_name("bogus");
    assert_eq!(app.page, Page::Menu);

    // Out-of-band edit is visible after navigating back to the summary.
    let mut settings = app.store.load();
    settings.repel_shortcut = "Shift+F5".to_string();
    app.store.save(&settings).unwrap();
    app.navigate_to_name("summary");
    assert_eq!(app.summary.repel, "Shift+F5");
}
