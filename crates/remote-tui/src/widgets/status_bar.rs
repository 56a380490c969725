//! Status bar: log line with connection state, and the keybindings footer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACCENT, C_CONNECTED, C_MODE_FILTER, C_MODE_NORMAL, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "BROWSE",
            Self::Filter => "FILTER",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
        }
    }
}

/// Server name with a connection dot, then the last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, server: &str) {
    let (dot, color) = if server.is_empty() {
        ("○", C_ACCENT)
    } else {
        ("●", C_CONNECTED)
    };
    let line = Line::from(vec![
        Span::styled(dot, Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(server, Style::default().fg(C_SECONDARY)),
        Span::raw("  "),
        Span::styled(last_log.unwrap_or(""), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    let keys = match mode {
        InputMode::Normal => {
            " ↑↓/jk move  Enter/l open  p/Space play  y copy art  r retry  Backspace/h back  H home  / filter  Tab/1-9 command  q quit"
        }
        InputMode::Filter => " type to filter (*x = anywhere)  ↑↓ move  Enter keep  Esc clear+close",
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
