use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::Page;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
    pub page: Page,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    /// Before the first save only the settings entry is offered; once a
    /// record exists the full page set is reachable.
    pub fn new(theme: &'a Theme, first_run: bool) -> Self {
        let items = if first_run {
            vec![MenuItem {
                key: "1".to_string(),
                label: "Settings".to_string(),
                description: "Record your shortcuts before first use".to_string(),
                page: Page::Settings,
            }]
        } else {
            vec![
                MenuItem {
                    key: "1".to_string(),
                    label: "Summary".to_string(),
                    description: "View the saved configuration".to_string(),
                    page: Page::Summary,
                },
                MenuItem {
                    key: "2".to_string(),
                    label: "Settings".to_string(),
                    description: "Edit shortcuts, delay and storage".to_string(),
                    page: Page::Settings,
                },
                MenuItem {
                    key: "3".to_string(),
                    label: "Regenerate".to_string(),
                    description: "Write the script from saved settings".to_string(),
                    page: Page::Regenerate,
                },
                MenuItem {
                    key: "4".to_string(),
                    label: "Reverse text".to_string(),
                    description: "Demo: reverse a line of text".to_string(),
                    page: Page::Reverse,
                },
                MenuItem {
                    key: "5".to_string(),
                    label: "Swap case".to_string(),
                    description: "Demo: swap upper/lower case".to_string(),
                    page: Page::SwapCase,
                },
            ]
        };
        Self {
            items,
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_page(&self) -> Page {
        self.items[self.selected].page
    }

    /// Page for a pressed number key, if it matches an item.
    pub fn page_for_key(&self, ch: char) -> Option<Page> {
        self.items
            .iter()
            .find(|item| item.key == ch.to_string())
            .map(|item| item.page)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "keyloop",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Alternating-hotkey script generator",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text =
                format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.dim()))),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }
    }
}
