use std::path::Path;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::Settings;
use crate::ui::theme::Theme;

/// Placeholder shown when no storage directory has been configured.
pub const PATH_UNSET: &str = "(unset)";

/// Display-ready snapshot of the persisted record. Rebuilt by the summary
/// refresh so the page never shows stale values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryView {
    pub attract: String,
    pub repel: String,
    pub toggle: String,
    pub delay: String,
    pub path: String,
}

impl SummaryView {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            attract: settings.attract_shortcut.clone(),
            repel: settings.repel_shortcut.clone(),
            toggle: settings.toggle_shortcut.clone(),
            delay: format!("{:.1} s", settings.delay_seconds),
            path: resolve_path_display(&settings.storage_path),
        }
    }
}

/// Absolute form of the configured directory, or the unset placeholder.
fn resolve_path_display(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return PATH_UNSET.to_string();
    }
    std::path::absolute(Path::new(raw))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct Summary<'a> {
    pub view: &'a SummaryView,
    pub theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(view: &'a SummaryView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Saved configuration ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let badge = Style::default()
            .fg(colors.badge_fg())
            .bg(colors.badge_bg())
            .add_modifier(Modifier::BOLD);
        let label = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);

        let rows: [(&str, &str); 5] = [
            ("Attract:", &self.view.attract),
            ("Repel:", &self.view.repel),
            ("Start/stop:", &self.view.toggle),
            ("Delay:", &self.view.delay),
            ("Directory:", &self.view.path),
        ];
        for (i, (name, value)) in rows.iter().enumerate() {
            let line = Line::from(vec![
                Span::styled(format!(" {name:<12}"), label),
                Span::styled(format!(" {value} "), badge),
            ]);
            Paragraph::new(line)
                .alignment(Alignment::Left)
                .render(layout[i + 1], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_path_shows_placeholder() {
        let view = SummaryView::from_settings(&Settings::default());
        assert_eq!(view.path, PATH_UNSET);
        assert_eq!(view.delay, "4.0 s");
    }

    #[test]
    fn configured_path_is_absolute() {
        let settings = Settings {
            storage_path: "relative/out".to_string(),
            ..Settings::default()
        };
        let view = SummaryView::from_settings(&settings);
        assert!(Path::new(&view.path).is_absolute());
        assert!(view.path.ends_with("out"));
    }

    #[test]
    fn absolute_path_kept_verbatim() {
        let settings = Settings {
            storage_path: "/tmp/out".to_string(),
            ..Settings::default()
        };
        let view = SummaryView::from_settings(&settings);
        assert_eq!(view.path, "/tmp/out");
    }
}
