//! Screen rendering.
//!
//! Draws one [`TableFrame`] per render tick: a title bar with the status,
//! the table, a search line and a footer of key hints.

mod spinner;

use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::config::{GlobalAction, KeyResolver, NavAction, SearchAction};
use crate::navigator::controller::StatusLevel;
use crate::navigator::TableFrame;
use crate::theme::Theme;
use spinner::Spinner;

/// A key and what it does, for the footer.
pub struct Keybinding {
    pub key: String,
    pub description: &'static str,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: &'static str) -> Self {
        Self {
            key: key.into(),
            description,
        }
    }
}

pub struct Screen {
    theme: Theme,
    keys: Arc<KeyResolver>,
    spinner: Spinner,
}

impl Screen {
    pub fn new(theme: Theme, keys: Arc<KeyResolver>) -> Self {
        Self {
            theme,
            keys,
            spinner: Spinner::default(),
        }
    }

    pub fn tick(&mut self) {
        self.spinner.tick();
    }

    pub fn render(&mut self, frame: &mut Frame, table: &TableFrame<'_>) {
        let [title, body, search, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_title(frame, title, table);
        self.render_table(frame, body, table);
        self.render_search(frame, search, table);
        self.render_footer(frame, footer);
    }

    fn render_title(&mut self, frame: &mut Frame, area: Rect, table: &TableFrame<'_>) {
        let theme = &self.theme;
        let [left, right] =
            Layout::horizontal([Constraint::Min(24), Constraint::Percentage(55)]).areas(area);

        let mut spans = vec![Span::styled(
            format!(" Discretion: {} ", table.view),
            Style::default()
                .fg(theme.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(at) = table.refreshed_at {
            spans.push(Span::styled(
                format!("refreshed {}", at.format("%H:%M:%S")),
                Style::default().fg(theme.muted()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), left);

        if table.busy {
            self.spinner
                .render(frame, right, &table.status.message, &self.theme);
        } else {
            let color = match table.status.level {
                StatusLevel::Info => theme.success(),
                StatusLevel::Error => theme.error(),
            };
            let status = Paragraph::new(table.status.message.as_str())
                .style(Style::default().fg(color))
                .right_aligned();
            frame.render_widget(status, right);
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, table: &TableFrame<'_>) {
        let theme = &self.theme;

        let header_cells: Vec<Cell> = table
            .columns
            .iter()
            .map(|c| {
                Cell::from(c.title).style(
                    Style::default()
                        .fg(theme.header())
                        .add_modifier(Modifier::BOLD),
                )
            })
            .collect();
        let header = Row::new(header_cells)
            .height(1)
            .style(Style::default().bg(theme.header_bg()));

        let rows: Vec<Row> = table
            .rows
            .iter()
            .map(|row| {
                Row::new(row.cells().iter().map(|cell| Cell::from(cell.as_str())))
                    .style(Style::default().fg(theme.text()))
            })
            .collect();

        let widths: Vec<Constraint> = table
            .columns
            .iter()
            .map(|c| Constraint::Length(c.width))
            .collect();

        let position = if table.total == 0 { 0 } else { table.cursor + 1 };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()))
            .title(format!(" {} [{position}/{}] ", table.view, table.total))
            .title_style(
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD),
            );

        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.selection_fg())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        if table.total == 0 {
            let empty = Paragraph::new("No rows").style(Style::default().fg(theme.muted()));
            frame.render_widget(widget, area);
            frame.render_widget(empty, area.inner(ratatui::layout::Margin::new(2, 2)));
            return;
        }

        let mut state = TableState::default().with_selected(table.highlight);
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect, table: &TableFrame<'_>) {
        let theme = &self.theme;
        let line = if let Some(query) = table.query {
            Line::from(vec![
                Span::styled("/", Style::default().fg(theme.key())),
                Span::styled(format!("{query}_"), Style::default().fg(theme.text())),
            ])
        } else if !table.filters.is_empty() {
            Line::from(vec![
                Span::styled(" filter: ", Style::default().fg(theme.muted())),
                Span::styled(table.filters.join(" › "), Style::default().fg(theme.header())),
                Span::styled(
                    format!(
                        "  ({} to clear)",
                        self.keys.display_search(SearchAction::ClearFilter)
                    ),
                    Style::default().fg(theme.muted()),
                ),
            ])
        } else {
            Line::default()
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let mut spans = Vec::new();
        for kb in self.keybindings() {
            spans.push(Span::styled(format!(" {}", kb.key), Style::default().fg(theme.key())));
            spans.push(Span::styled(" │ ", Style::default().fg(theme.separator())));
            spans.push(Span::styled(kb.description, Style::default().fg(theme.subtext0)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    pub fn keybindings(&self) -> Vec<Keybinding> {
        let keys = &self.keys;
        vec![
            Keybinding::new(
                format!(
                    "{}/{}",
                    keys.display_nav(NavAction::Up),
                    keys.display_nav(NavAction::Down)
                ),
                "Navigate",
            ),
            Keybinding::new(keys.display_nav(NavAction::Select), "Copy"),
            Keybinding::new(keys.display_search(SearchAction::Start), "Search"),
            Keybinding::new(keys.display_global(GlobalAction::ToggleView), "Switch view"),
            Keybinding::new(keys.display_global(GlobalAction::Refresh), "Refresh"),
            Keybinding::new(keys.display_global(GlobalAction::Quit), "Quit"),
        ]
    }
}
