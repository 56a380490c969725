//! Header component: 2-row top bar.
//!
//! Row 1: command tabs.
//! Row 2: breadcrumbs for the current path (blank at the command's root).
//!
//! Not focusable; clicks on a tab or crumb navigate.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_CRUMB, C_MUTED, C_NUMBER_HINT, C_PRIMARY, C_SECONDARY},
};

const CRUMB_MAX_WIDTH: usize = 24;
const CRUMB_SEP: &str = " › ";
const HOME: &str = " ⌂";

/// Clickable column span on one header row.
struct Hit {
    row: u16,
    x0: u16,
    x1: u16,
    action: Action,
}

#[derive(Default)]
pub struct Header {
    hits: Vec<Hit>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_hit(&mut self, row: u16, x: &mut u16, text: &str, action: Option<Action>) {
        let w = text.width() as u16;
        if let Some(action) = action {
            self.hits.push(Hit {
                row,
                x0: *x,
                x1: *x + w,
                action,
            });
        }
        *x += w;
    }
}

/// Cut `s` to at most `max` terminal columns, ending in `…` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut w = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if w + cw + 1 > max {
            break;
        }
        out.push(c);
        w += cw;
    }
    out.push('…');
    out
}

impl Component for Header {
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        self.hits
            .iter()
            .find(|h| h.row == event.row && (h.x0..h.x1).contains(&event.column))
            .map(|h| vec![h.action.clone()])
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        self.hits.clear();
        if area.height == 0 {
            return;
        }

        // ── Row 1: commands ───────────────────────────────────────────────────
        let row = area.y;
        let mut x = area.x;
        let mut spans = Vec::new();
        if state.commands.is_empty() {
            spans.push(Span::styled(" no commands configured", Style::default().fg(C_MUTED)));
        }
        for (i, cmd) in state.commands.iter().enumerate() {
            let active = state.active_command == Some(i);
            let hint = if i < 9 {
                format!(" {} ", i + 1)
            } else {
                "   ".to_string()
            };
            let label = format!("{} ", cmd.title);
            let label_style = if active {
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            self.push_hit(row, &mut x, &hint, None);
            self.push_hit(row, &mut x, &label, Some(Action::SelectCommand(i)));
            spans.push(Span::styled(hint, Style::default().fg(C_NUMBER_HINT)));
            spans.push(Span::styled(label, label_style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect { height: 1, ..area },
        );

        // ── Row 2: breadcrumbs ────────────────────────────────────────────────
        let path_len = state.browser.path().len();
        if area.height < 2 || path_len == 0 {
            return;
        }
        let row = area.y + 1;
        let mut x = area.x;
        let mut spans = Vec::new();
        self.push_hit(row, &mut x, HOME, Some(Action::Home));
        spans.push(Span::styled(HOME, Style::default().fg(C_CRUMB)));

        for (k, label) in state.browser.breadcrumbs().into_iter().enumerate() {
            let label = truncate(&label, CRUMB_MAX_WIDTH);
            let last = k + 1 == path_len;
            let style = if last {
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_CRUMB)
            };
            self.push_hit(row, &mut x, CRUMB_SEP, None);
            let action = (!last).then_some(Action::JumpToBreadcrumb(k));
            self.push_hit(row, &mut x, &label, action);
            spans.push(Span::styled(CRUMB_SEP, Style::default().fg(C_MUTED)));
            spans.push(Span::styled(label, style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect {
                y: row,
                height: 1,
                ..area
            },
        );
    }
}
