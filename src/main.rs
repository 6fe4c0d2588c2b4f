mod app;
mod chord;
mod config;
mod event;
mod form;
mod generator;
mod logging;
mod text;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use app::{App, Page, ToastKind};
use config::SettingsStore;
use event::{AppEvent, EventHandler};
use form::{FormField, SettingsForm};
use ui::components::summary::Summary;
use ui::layout::{AppLayout, centered_rect};
use ui::line_input::{InputResult, LineInput};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "keyloop",
    version,
    about = "Configure shortcuts and generate an alternating-hotkey macro script"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Settings file path override")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init() {
        eprintln!("logging disabled: {err}");
    }

    let store = match cli.config {
        Some(path) => SettingsStore::with_path(path),
        None => SettingsStore::new(),
    };
    let loaded_theme = cli
        .theme
        .as_deref()
        .and_then(Theme::load)
        .unwrap_or_default();
    let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
    let mut app = App::new(store, theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Keyboard enhancement delivers pure modifier presses as their own
    // events, which the capture widget needs to ignore explicitly.
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process Press events; Repeat/Release would double input.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // The save-as prompt is modal over whatever page opened it.
    if let Some(mut prompt) = app.path_prompt.take() {
        match prompt.handle(key) {
            InputResult::Continue => app.path_prompt = Some(prompt),
            InputResult::Submit => {
                app.path_prompt = Some(prompt);
                app.submit_path_prompt();
            }
            InputResult::Cancel => {}
        }
        return;
    }

    match app.page {
        Page::Menu => handle_menu_key(app, key),
        Page::Reverse => handle_reverse_key(app, key),
        Page::SwapCase => handle_swap_key(app, key),
        Page::Settings => handle_settings_key(app, key),
        Page::Regenerate => handle_regenerate_key(app, key),
        Page::Summary => handle_summary_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let page = app.menu.selected_page();
            app.navigate_to(page);
        }
        KeyCode::Char(ch) => {
            if let Some(page) = app.menu.page_for_key(ch) {
                app.navigate_to(page);
            }
        }
        _ => {}
    }
}

fn handle_reverse_key(app: &mut App, key: KeyEvent) {
    match app.reverse_input.handle(key) {
        InputResult::Submit => app.submit_reverse(),
        InputResult::Cancel => app.navigate_to(Page::Menu),
        InputResult::Continue => {}
    }
}

fn handle_swap_key(app: &mut App, key: KeyEvent) {
    match app.swap_input.handle(key) {
        InputResult::Submit => app.submit_swap(),
        InputResult::Cancel => app.navigate_to(Page::Menu),
        InputResult::Continue => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    // An active chord recording consumes every key.
    if let Some(input) = app.form.recording_input_mut() {
        input.handle_key(&key);
        return;
    }

    // Open line editors are next in priority.
    if let Some(mut editor) = app.form.path_editor.take() {
        match editor.handle(key) {
            InputResult::Continue => app.form.path_editor = Some(editor),
            InputResult::Submit => {
                app.form.storage_path = editor.value().trim().to_string();
            }
            InputResult::Cancel => {}
        }
        return;
    }
    if let Some(mut editor) = app.form.delay_editor.take() {
        match editor.handle(key) {
            InputResult::Continue => app.form.delay_editor = Some(editor),
            InputResult::Submit => {
                app.form.delay.set_entry(editor.value());
            }
            InputResult::Cancel => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.navigate_to(Page::Menu),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.form.select_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.form.select_next(),
        KeyCode::Left if app.form.selected_field() == FormField::Delay => {
            app.form.delay.step_down();
        }
        KeyCode::Right if app.form.selected_field() == FormField::Delay => {
            app.form.delay.step_up();
        }
        KeyCode::Enter => match app.form.selected_field() {
            field @ (FormField::Attract | FormField::Repel | FormField::Toggle) => {
                if let Some(input) = app.form.chord_input_mut(field) {
                    input.begin_recording();
                }
            }
            FormField::Delay => {
                app.form.delay_editor = Some(LineInput::new(app.form.delay.entry_display()));
            }
            FormField::StoragePath => {
                app.form.path_editor = Some(LineInput::new(&app.form.storage_path));
            }
            FormField::Save => app.save_settings(),
        },
        _ => {}
    }
}

fn handle_regenerate_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('g') => app.generate_script(),
        KeyCode::Char('o') => app.open_last_folder(),
        KeyCode::Esc | KeyCode::Char('q') => app.navigate_to(Page::Menu),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('g') => app.generate_script(),
        KeyCode::Char('e') | KeyCode::Enter => app.navigate_to(Page::Settings),
        KeyCode::Char('o') => app.open_last_folder(),
        KeyCode::Esc | KeyCode::Char('q') => app.navigate_to(Page::Menu),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.page {
        Page::Menu => render_menu(frame, app),
        Page::Reverse => render_text_page(
            frame,
            app,
            " Reverse text ",
            &app.reverse_input,
            &app.reverse_result,
        ),
        Page::SwapCase => render_text_page(
            frame,
            app,
            " Swap case ",
            &app.swap_input,
            &app.swap_result,
        ),
        Page::Settings => render_settings(frame, app),
        Page::Regenerate => render_regenerate(frame, app),
        Page::Summary => render_summary(frame, app),
    }

    if app.path_prompt.is_some() {
        render_path_prompt(frame, app);
    }
    render_toast(frame, app);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, title: &str) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " keyloop ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            title.to_string(),
            Style::default().fg(colors.dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, hints: &str) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;
    let footer = Paragraph::new(Line::from(Span::styled(
        hints.to_string(),
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    render_header(frame, app, " Menu");
    let layout = AppLayout::new(frame.area());
    let menu_area = centered_rect(50, 80, layout.main);
    frame.render_widget(&app.menu, menu_area);
    render_footer(frame, app, " [1-5] Open page  [Enter] Select  [q] Quit ");
}

/// Input line with the cursor drawn as an inverted cell.
fn input_line<'a>(input: &'a LineInput, theme: &Theme) -> Line<'a> {
    let colors = &theme.colors;
    let (before, cursor, after) = input.render_parts();
    let mut spans = vec![Span::styled(before, Style::default().fg(colors.fg()))];
    match cursor {
        Some(ch) => {
            spans.push(Span::styled(
                ch.to_string(),
                Style::default().fg(colors.bg()).bg(colors.fg()),
            ));
            spans.push(Span::styled(after, Style::default().fg(colors.fg())));
        }
        None => {
            spans.push(Span::styled(
                " ",
                Style::default().fg(colors.bg()).bg(colors.fg()),
            ));
        }
    }
    Line::from(spans)
}

fn render_text_page(
    frame: &mut ratatui::Frame,
    app: &App,
    title: &str,
    input: &LineInput,
    result: &str,
) {
    render_header(frame, app, title);
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let area = centered_rect(60, 50, layout.main);
    let block = Block::bordered()
        .title(title.to_string())
        .border_style(Style::default().fg(colors.border()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("Text:", Style::default().fg(colors.dim()))),
        input_line(input, app.theme),
        Line::from(""),
        Line::from(Span::styled("Result:", Style::default().fg(colors.dim()))),
        Line::from(Span::styled(
            result.to_string(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    render_footer(frame, app, " [Enter] Apply  [Esc] Menu ");
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    render_header(frame, app, " Settings");
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let area = centered_rect(70, 90, layout.main);
    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let validation = app.form.validate().err();

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        "  Use arrows to move, Enter to record or edit, Esc for the menu",
        Style::default().fg(colors.dim()),
    )));
    // Inline banner: visible whenever the form is not saveable.
    match &validation {
        Some(message) => lines.push(Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(colors.error()),
        ))),
        None => lines.push(Line::from("")),
    }
    lines.push(Line::from(""));

    for field in FormField::ALL {
        let is_selected = field == app.form.selected_field();
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

        lines.push(Line::from(Span::styled(
            format!("{indicator}{}:", field.label()),
            label_style,
        )));
        lines.push(field_value_line(&app.form, field, app.theme, validation.is_some()));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), inner);
    render_footer(
        frame,
        app,
        " [Up/Down] Field  [Enter] Record/edit  [Left/Right] Delay  [Esc] Menu ",
    );
}

fn field_value_line<'a>(
    form: &'a SettingsForm,
    field: FormField,
    theme: &Theme,
    invalid: bool,
) -> Line<'a> {
    let colors = &theme.colors;
    let value_style = Style::default().fg(colors.fg());
    let dim_style = Style::default().fg(colors.dim());
    let recording_style = Style::default()
        .fg(colors.border_recording())
        .add_modifier(Modifier::BOLD);

    match field {
        FormField::Attract | FormField::Repel | FormField::Toggle => {
            let input = match field {
                FormField::Attract => &form.attract,
                FormField::Repel => &form.repel,
                _ => &form.toggle,
            };
            if input.is_recording() {
                Line::from(Span::styled(
                    "      press a shortcut... (Esc cancels)",
                    recording_style,
                ))
            } else if input.chord().is_empty() {
                Line::from(Span::styled("      (not set)", dim_style))
            } else {
                Line::from(Span::styled(format!("      {}", input.chord()), value_style))
            }
        }
        FormField::Delay => match &form.delay_editor {
            Some(editor) => {
                let mut line = input_line(editor, theme);
                line.spans.insert(0, Span::raw("      "));
                line
            }
            None => Line::from(vec![
                Span::styled(
                    format!("      < {} >", form.delay.entry_display()),
                    value_style,
                ),
                Span::styled("  (Enter to type a value)", dim_style),
            ]),
        },
        FormField::StoragePath => match &form.path_editor {
            Some(editor) => {
                let mut line = input_line(editor, theme);
                line.spans.insert(0, Span::raw("      "));
                line
            }
            None if form.storage_path.is_empty() => Line::from(Span::styled(
                "      (none - you will be asked where to save)",
                dim_style,
            )),
            None => Line::from(Span::styled(format!("      {}", form.storage_path), value_style)),
        },
        FormField::Save => {
            if invalid {
                Line::from(Span::styled("      [ Save and view summary ]", dim_style))
            } else {
                Line::from(Span::styled(
                    "      [ Save and view summary ]",
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                ))
            }
        }
    }
}

fn render_regenerate(frame: &mut ratatui::Frame, app: &App) {
    render_header(frame, app, " Regenerate");
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let area = centered_rect(60, 40, layout.main);
    let block = Block::bordered()
        .title(" Regenerate script ")
        .border_style(Style::default().fg(colors.border()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Write the macro script from the saved settings.",
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  [Enter] Generate now    [o] Open folder    [Esc] Menu",
            Style::default().fg(colors.dim()),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
    render_footer(frame, app, " [Enter] Generate  [Esc] Menu ");
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    render_header(frame, app, " Summary");
    let layout = AppLayout::new(frame.area());

    let area = centered_rect(60, 70, layout.main);
    frame.render_widget(Summary::new(&app.summary, app.theme), area);

    render_footer(
        frame,
        app,
        " [g] Generate script  [e] Edit settings  [o] Open folder  [q] Menu ",
    );
}

fn render_path_prompt(frame: &mut ratatui::Frame, app: &App) {
    let Some(ref prompt) = app.path_prompt else {
        return;
    };
    let colors = &app.theme.colors;

    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(" Save script as ")
        .border_style(Style::default().fg(colors.border_recording()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            " No storage directory is configured; enter a file path:",
            Style::default().fg(colors.dim()),
        )),
        input_line(prompt, app.theme),
        Line::from(Span::styled(
            " [Enter] Write  [Esc] Cancel",
            Style::default().fg(colors.dim()),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_toast(frame: &mut ratatui::Frame, app: &App) {
    let Some(ref toast) = app.toast else {
        return;
    };
    let colors = &app.theme.colors;
    let style = match toast.kind {
        ToastKind::Info => Style::default().fg(colors.success()),
        ToastKind::Warning => Style::default().fg(colors.warning()),
        ToastKind::Error => Style::default().fg(colors.error()),
    };
    let layout = AppLayout::new(frame.area());
    let line = Paragraph::new(Line::from(Span::styled(
        format!(" {}", toast.text),
        style.add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(line, layout.footer);
}
