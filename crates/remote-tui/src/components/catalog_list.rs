//! CatalogList: the browser's visible set as a virtualized list.
//!
//! Only the rows inside the drawn window ever get their details resolved:
//! after each draw the App asks `take_load_request` for the window and
//! hands it to the browser's loader.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use remote_proto::browser::{Browser, RowState};
use remote_proto::protocol::Node;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{
        style_muted, style_selected, C_BADGE_ERR, C_BADGE_PENDING, C_CONTAINER, C_MUTED,
        C_PLAYABLE, C_PRIMARY, C_SECONDARY,
    },
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub struct CatalogList {
    list: ScrollableList,
    filter_input: FilterInput,
    list_state: ListState,
    /// Inclusive row range drawn last frame.
    window: Option<(usize, usize)>,
    /// Last window handed to the loader, with the view it was drawn for.
    requested: Option<(u64, usize, usize)>,
}

impl CatalogList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            filter_input: FilterInput::default(),
            list_state: ListState::default(),
            window: None,
            requested: None,
        }
    }

    /// The visible set was rebuilt: row indices mean different nodes now.
    pub fn reset_view(&mut self, browser: &Browser) {
        self.list.reset();
        self.window = None;
        self.requested = None;
        if self.filter_input.text() != browser.filter_text() {
            self.filter_input.set_value(browser.filter_text());
        }
    }

    /// The drawn window, if some row in it still lacks details and it has
    /// not already been requested for the current view.
    pub fn take_load_request(&mut self, browser: &Browser) -> Option<(usize, usize)> {
        let (start, stop) = self.window?;
        let key = (browser.view_generation(), start, stop);
        if self.requested == Some(key) {
            return None;
        }
        if (start..=stop).all(|i| browser.is_row_loaded(i)) {
            return None;
        }
        self.requested = Some(key);
        Some((start, stop))
    }

    /// Forget the last request so the drawn window is planned again,
    /// picking up rows that failed to load.
    pub fn retry_window(&mut self) {
        self.requested = None;
    }

    fn selected_node<'a>(&self, state: &'a AppState) -> Option<&'a Node> {
        state.browser.visible_node(self.list.selected)
    }

    fn open_selected(&self, state: &AppState) -> Vec<Action> {
        match self.selected_node(state) {
            Some(node) if node.is_container() => vec![Action::Enter(node.id.clone())],
            Some(node) => vec![play(node)],
            None => vec![],
        }
    }
}

impl Default for CatalogList {
    fn default() -> Self {
        Self::new()
    }
}

fn play(node: &Node) -> Action {
    Action::Play {
        node_type: node.node_type,
        id: node.id.clone(),
        name: node.name.clone(),
    }
}

impl Component for CatalogList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let len = state.browser.row_count();

        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return vec![];
                }
                KeyCode::Down => {
                    self.list.select_down(1, len);
                    return vec![];
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(text) => vec![Action::FilterChanged(text)],
                FilterAction::Confirmed | FilterAction::Cancelled => vec![Action::CloseFilter],
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step, len),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10, len),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(len),

            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                return self.open_selected(state)
            }
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                return self.selected_node(state).map(play).into_iter().collect();
            }
            KeyCode::Char('y') => {
                if let Some(RowState::Loaded(detail)) = state.browser.row_state(self.list.selected)
                {
                    return vec![Action::CopyToClipboard(detail.artwork_url.clone())];
                }
            }
            KeyCode::Char('r') => self.retry_window(),
            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        let len = state.browser.row_count();
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1, len),
            MouseEventKind::Down(MouseButton::Left) => {
                let row = event.row.saturating_sub(area.y + 1) as usize;
                self.list.handle_click(row, len);
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::CloseFilter = action {
            self.filter_input.deactivate();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let browser = &state.browser;
        let len = browser.row_count();

        let badge = if state.navigating.is_some() {
            Some(Badge {
                text: "loading".to_string(),
                color: C_BADGE_PENDING,
            })
        } else if browser.filter_pending() {
            Some(Badge {
                text: "filtering".to_string(),
                color: C_BADGE_PENDING,
            })
        } else if len > 0 {
            Some(Badge {
                text: format!("{}/{}", self.list.selected + 1, len),
                color: C_MUTED,
            })
        } else {
            None
        };
        let title = state
            .active_command()
            .map(|c| c.title.as_str())
            .unwrap_or("catalog");
        let block = pane_chrome(title, focused, badge);
        let mut inner = block.inner(area);
        frame.render_widget(block, area);

        if self.filter_input.is_active() || !browser.filter_text().is_empty() {
            let filter_area = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            self.filter_input.draw(frame, filter_area);
            inner.height = inner.height.saturating_sub(1);
        }

        if len == 0 {
            self.window = None;
            let msg = if state.navigating.is_some() {
                "  opening…"
            } else if browser.children().is_empty() {
                "  nothing here"
            } else {
                "  no entries match filter"
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, style_muted())), inner);
            return;
        }

        let height = inner.height as usize;
        self.list.clamp(len);
        self.list.ensure_visible(height);
        self.window = self.list.window(height, len);
        let Some((start, stop)) = self.window else {
            return;
        };

        let selected = self.list.selected;
        let items: Vec<ListItem> = (start..=stop)
            .filter_map(|i| Some((i, browser.visible_node(i)?, browser.row_state(i)?)))
            .map(|(i, node, row)| row_item(node, row, i == selected))
            .collect();

        self.list_state.select(Some(self.list.selected_in_view(height)));
        frame.render_stateful_widget(
            List::new(items).highlight_style(Style::default()),
            inner,
            &mut self.list_state,
        );
    }
}

fn row_item(node: &Node, row: RowState<'_>, selected: bool) -> ListItem<'static> {
    let enterable = match row {
        RowState::Loaded(detail) => detail.enterable(),
        _ => node.is_container(),
    };
    let (icon, icon_color) = if enterable {
        ("▸", C_CONTAINER)
    } else {
        ("♪", C_PLAYABLE)
    };
    let mut spans = vec![Span::styled(
        format!(" {} ", icon),
        Style::default().fg(icon_color),
    )];
    match row {
        RowState::Loaded(detail) => {
            let name_style = if selected {
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_PRIMARY)
            };
            spans.push(Span::styled(detail.title.clone(), name_style));
            if let Some(sub) = &detail.subtitle {
                spans.push(Span::styled(
                    format!("  {}", sub),
                    Style::default().fg(C_SECONDARY),
                ));
            }
        }
        RowState::Pending => {
            spans.push(Span::styled(node.name.clone(), style_muted()));
            spans.push(Span::styled("  …", style_muted()));
        }
        RowState::Failed => {
            spans.push(Span::styled(node.name.clone(), style_muted()));
            spans.push(Span::styled(
                "  ✗ unavailable",
                Style::default().fg(C_BADGE_ERR),
            ));
        }
    }
    let item = ListItem::new(Line::from(spans));
    if selected {
        item.style(style_selected())
    } else {
        item
    }
}
