use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use throbber_widgets_tui::WhichUse::Spin;
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use crate::theme::Theme;

/// Braille spinner shown next to the status while background work runs.
#[derive(Debug, Default)]
pub struct Spinner {
    throbber_state: ThrobberState,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.throbber_state.calc_next();
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, label: &str, theme: &Theme) {
        let throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .use_type(Spin)
            .label(label.to_string())
            .throbber_style(Style::default().fg(theme.selection_fg()))
            .style(Style::default().fg(theme.subtext1));

        frame.render_stateful_widget(throbber, area, &mut self.throbber_state);
    }
}
