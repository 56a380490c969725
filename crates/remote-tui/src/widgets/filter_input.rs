//! FilterInput: tui-input line editor used as the catalog filter bar.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use remote_proto::browser::filter::{FilterState, PredicateKind};
use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED, C_SECONDARY};

#[derive(Debug, PartialEq)]
pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
}

pub struct FilterInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl FilterInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Esc clears non-empty text first and closes on the second press.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.input = Input::default();
                    FilterAction::Changed(String::new())
                } else {
                    self.deactivate();
                    FilterAction::Cancelled
                }
            }
            KeyCode::Enter => {
                self.deactivate();
                FilterAction::Confirmed
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                FilterAction::Changed(self.input.value().to_string())
            }
        }
    }

    /// One-row bar: prompt, text, and which match mode the text selects.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let value = self.input.value();
        let mode = match FilterState::new(value).kind() {
            PredicateKind::Prefix => "prefix",
            PredicateKind::Contains => "contains",
        };
        let mode_w = mode.len() as u16 + 2;
        let text_w = area.width.saturating_sub(4 + mode_w) as usize;
        let scroll = self.input.visual_scroll(text_w);

        let text = if value.is_empty() {
            Span::styled(
                format!("/ {}", self.placeholder),
                Style::default().fg(C_MUTED),
            )
        } else {
            Span::styled(
                format!("/ {}", value.chars().skip(scroll).collect::<String>()),
                Style::default().fg(C_FILTER_FG),
            )
        };
        let padding = area
            .width
            .saturating_sub(mode_w + text.width() as u16) as usize;
        let line = Line::from(vec![
            text,
            Span::raw(" ".repeat(padding)),
            Span::styled(format!(" {} ", mode), Style::default().fg(C_SECONDARY)),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(C_FILTER_BG)),
            area,
        );

        if self.active {
            let cursor_x = area.x + 2 + self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
        }
    }
}

impl Default for FilterInput {
    fn default() -> Self {
        Self::new("name prefix, *anywhere")
    }
}
