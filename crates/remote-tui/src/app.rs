//! App: component-based event loop around the catalog browser.
//!
//! - `App` owns the components and `AppState` (read-only for components).
//! - A `tokio::mpsc` channel carries `AppMessage`s in from background tasks.
//! - Server calls run in spawned tasks; only the loop mutates the browser,
//!   so results come back as messages and are applied in arrival order.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use remote_proto::browser::{
    resolve_rows, Catalog, McwsCatalog, Navigated, NavigationTicket, RenderSignal, ResolvedRows,
};
use remote_proto::config::Config;
use remote_proto::error::TransportError;
use remote_proto::protocol::{Node, NodeId, NodeType};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    components::{catalog_list::CatalogList, header::Header},
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Navigated(NavigationTicket, Result<Vec<Node>, TransportError>),
    RowsResolved(ResolvedRows),
    Played(String, Result<(), TransportError>),
}

/// Last-drawn rects, for mouse hit-testing.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    header: Rect,
    list: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    state: AppState,
    catalog: Arc<McwsCatalog>,

    header: Header,
    catalog_list: CatalogList,
    toast: ToastManager,
    pane_areas: PaneAreas,

    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, catalog: McwsCatalog, server_name: String) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(1024);
        let quiet = Duration::from_millis(config.browser.filter_debounce_ms);
        Self {
            state: AppState::new(config.commands.clone(), server_name, quiet),
            catalog: Arc::new(catalog),
            header: Header::new(),
            catalog_list: CatalogList::new(),
            toast: ToastManager::new(),
            pane_areas: PaneAreas::default(),
            tx,
            rx: Some(rx),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut rx = self.rx.take().ok_or_else(|| anyhow!("app is already running"))?;

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal ready, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        if !self.state.commands.is_empty() {
            self.dispatch(Action::SelectCommand(0));
        }

        // Debounce polling, toast expiry and spinner animation.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
                self.load_visible_rows();
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                    while let Ok(next) = rx.try_recv() {
                        needs_redraw |= self.handle_message(next);
                    }
                }

                _ = ui_tick.tick() => {
                    let applied = self.state.browser.tick();
                    self.toast.tick();
                    needs_redraw = applied || !self.toast.is_empty();
                }
            }
            self.apply_signals();
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("mcws-remote exiting");

        Ok(())
    }

    /// Returns true when a redraw is needed.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(..) => {}
                _ => return false,
            },

            AppMessage::Navigated(ticket, result) => {
                let id = ticket.id.clone();
                if self.state.navigating.as_ref() == Some(&id)
                    && ticket.generation == self.state.browser.generation()
                {
                    self.state.navigating = None;
                    self.toast.dismiss_spinner();
                }
                match self.state.browser.finish_navigation(ticket, result) {
                    Ok(Navigated::Applied) => {
                        let count = self.state.browser.children().len();
                        self.push_log(format!("opened {} ({} entries)", id, count));
                    }
                    Ok(Navigated::Superseded) => {}
                    Err(e) => self.toast.error(format!("browse failed: {}", e)),
                }
            }

            AppMessage::RowsResolved(resolved) => {
                let current = resolved.view_generation == self.state.browser.view_generation();
                let total = resolved.rows.len();
                let cached = self.state.browser.merge_rows(resolved);
                if current && cached < total {
                    self.toast
                        .warning(format!("{} of {} rows failed to load", total - cached, total));
                }
            }

            AppMessage::Played(name, result) => match result {
                Ok(()) => self.toast.success(format!("playing {}", name)),
                Err(e) => {
                    warn!("play {} failed: {}", name, e);
                    self.toast.error(format!("play failed: {}", e));
                }
            },
        }
        true
    }

    fn apply_signals(&mut self) {
        for signal in self.state.browser.take_signals() {
            match signal {
                RenderSignal::Reset => self.catalog_list.reset_view(&self.state.browser),
                // The next draw re-reads every visible row.
                RenderSignal::Refresh => {}
            }
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let normal = self.state.input_mode == InputMode::Normal;
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q') if normal => return vec![Action::Quit],
            KeyCode::Tab => {
                if !normal {
                    return vec![Action::CloseFilter, Action::NextCommand];
                }
                return vec![Action::NextCommand];
            }
            KeyCode::Char(c @ '1'..='9') if normal => {
                return vec![Action::SelectCommand(c as usize - '1' as usize)];
            }
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') if normal => {
                return vec![Action::Back];
            }
            KeyCode::Char('H') if normal => return vec![Action::Home],
            _ => {}
        }
        self.catalog_list.handle_key(key, &self.state)
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        fn hit(r: Rect, col: u16, row: u16) -> bool {
            col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
        }
        let areas = self.pane_areas;
        if hit(areas.header, event.column, event.row) {
            self.header.handle_mouse(event, areas.header, &self.state)
        } else if hit(areas.list, event.column, event.row) {
            self.catalog_list.handle_mouse(event, areas.list, &self.state)
        } else {
            vec![]
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        let secondary = self.catalog_list.on_action(&action, &self.state);
        self.apply_action(action);
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Catalog ───────────────────────────────────────────────────────
            Action::Enter(id) => {
                let ticket = self.state.browser.begin_navigation(id, false);
                self.spawn_navigation(ticket);
            }
            Action::Back => match self.state.browser.back() {
                Some(ticket) => self.spawn_navigation(ticket),
                None => self.toast.info("already at the top"),
            },
            Action::Home => {
                if let Some(ticket) = self.state.browser.home() {
                    self.spawn_navigation(ticket);
                }
            }
            Action::JumpToBreadcrumb(k) => {
                if let Some(ticket) = self.state.browser.jump_to_breadcrumb(k) {
                    self.spawn_navigation(ticket);
                }
            }
            Action::Play { node_type, id, name } => self.spawn_play(node_type, id, name),

            // ── Filter ────────────────────────────────────────────────────────
            Action::OpenFilter => self.state.input_mode = InputMode::Filter,
            Action::CloseFilter => self.state.input_mode = InputMode::Normal,
            Action::FilterChanged(text) => self.state.browser.set_filter_text(text),

            // ── Commands ──────────────────────────────────────────────────────
            Action::SelectCommand(i) => {
                let Some(cmd) = self.state.commands.get(i).cloned() else {
                    return;
                };
                self.state.active_command = Some(i);
                info!("command selected: {} (node {})", cmd.title, cmd.node_id);
                if let Some(ticket) = self.state.browser.enter_command(NodeId::new(cmd.node_id)) {
                    self.spawn_navigation(ticket);
                }
            }
            Action::NextCommand => {
                let len = self.state.commands.len();
                if len > 0 {
                    let next = self.state.active_command.map_or(0, |i| (i + 1) % len);
                    self.apply_action(Action::SelectCommand(next));
                }
            }

            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::Quit => self.should_quit = true,
        }
    }

    // ── Background work ───────────────────────────────────────────────────────

    fn spawn_navigation(&mut self, ticket: NavigationTicket) {
        let label = self
            .state
            .browser
            .cache()
            .name(&ticket.id)
            .map(str::to_string)
            .unwrap_or_else(|| ticket.id.to_string());
        self.toast.spinner(format!("opening {}", label));
        self.state.navigating = Some(ticket.id.clone());

        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = catalog.fetch_children(&ticket.id).await;
            let _ = tx.send(AppMessage::Navigated(ticket, result)).await;
        });
    }

    /// Request details for the rows the list just drew.
    fn load_visible_rows(&mut self) {
        let Some((start, stop)) = self.catalog_list.take_load_request(&self.state.browser) else {
            return;
        };
        let batch = self.state.browser.plan_rows(start, stop);
        if batch.is_empty() {
            return;
        }
        debug!("loading rows {}..={} ({} uncached)", start, stop, batch.nodes.len());
        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let resolved = resolve_rows(catalog.as_ref(), batch).await;
            let _ = tx.send(AppMessage::RowsResolved(resolved)).await;
        });
    }

    fn spawn_play(&mut self, node_type: NodeType, id: NodeId, name: String) {
        if let Some(cmd) = self.state.active_command() {
            info!("dispatching command {} before playback", cmd.id);
        }
        self.push_log(format!("play {}", name));
        let catalog = self.catalog.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = catalog.play(node_type, &id).await;
            let _ = tx.send(AppMessage::Played(name, result)).await;
        });
    }

    fn push_log(&mut self, msg: String) {
        info!("{}", msg);
        self.state.last_log = Some(msg);
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();
        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.pane_areas = PaneAreas {
            header: outer[0],
            list: outer[1],
        };
        self.header.draw(frame, outer[0], false, &self.state);
        self.catalog_list.draw(frame, outer[1], true, &self.state);
        status_bar::draw_log_bar(
            frame,
            outer[2],
            self.state.last_log.as_deref(),
            &self.state.server_name,
        );
        status_bar::draw_keys_bar(frame, outer[3], self.state.input_mode);

        self.toast.draw(frame, area);
    }
}
