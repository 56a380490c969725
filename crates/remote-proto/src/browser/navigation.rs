//! Path stack, visible set and navigation sequencing.
//!
//! Navigation is split so the owner never awaits while holding the state:
//! `begin_navigation` stamps a ticket, the fetch runs elsewhere, and
//! `finish_navigation` applies the result only if no newer navigation was
//! started in the meantime.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::protocol::{Node, NodeId};
use super::filter::{FilterDebounce, FilterState};
use super::row_cache::RowCache;
use super::source::Catalog;
use super::virtualization::RenderSignal;

/// Identifies one in-flight navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTicket {
    pub generation: u64,
    pub id: NodeId,
    pub reset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigated {
    Applied,
    /// A newer navigation was started after this one; its result was dropped.
    Superseded,
}

/// The browser state machine: current path, children, filtered view and
/// the session-long row cache.
pub struct Browser {
    /// Root of the last applied reset navigation.
    root: Option<NodeId>,
    path: Vec<NodeId>,
    children: Vec<Node>,
    /// Indices into `children` that pass the filter, in order.
    visible: Vec<usize>,
    filter: FilterState,
    debounce: FilterDebounce,
    pub(super) cache: RowCache,
    /// Rows whose detail failed to resolve for the current view generation.
    pub(super) failed: HashSet<NodeId>,
    issued: u64,
    view_generation: u64,
    pub(super) signals: Vec<RenderSignal>,
}

impl Browser {
    pub fn new(filter_quiet: Duration) -> Self {
        Self {
            root: None,
            path: Vec::new(),
            children: Vec::new(),
            visible: Vec::new(),
            filter: FilterState::default(),
            debounce: FilterDebounce::new(filter_quiet),
            cache: RowCache::new(),
            failed: HashSet::new(),
            issued: 0,
            view_generation: 0,
            signals: Vec::new(),
        }
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    pub fn begin_navigation(&mut self, id: NodeId, reset: bool) -> NavigationTicket {
        self.issued += 1;
        debug!(
            "browser: navigation #{} to {} (reset={})",
            self.issued, id, reset
        );
        NavigationTicket {
            generation: self.issued,
            id,
            reset,
        }
    }

    /// Apply a fetch result.  On error the previous state is left untouched.
    pub fn finish_navigation(
        &mut self,
        ticket: NavigationTicket,
        result: Result<Vec<Node>, TransportError>,
    ) -> Result<Navigated, TransportError> {
        if ticket.generation != self.issued {
            debug!(
                "browser: dropping navigation #{} to {}, #{} is newer",
                ticket.generation, ticket.id, self.issued
            );
            return Ok(Navigated::Superseded);
        }
        let children = match result {
            Ok(children) => children,
            Err(e) => {
                warn!("browser: navigation to {} failed: {}", ticket.id, e);
                return Err(e);
            }
        };

        if ticket.reset {
            self.path.clear();
            self.root = Some(ticket.id.clone());
        } else {
            self.path = next_path(&self.path, &ticket.id);
        }
        info!(
            "browser: at {} ({} children, depth {})",
            ticket.id,
            children.len(),
            self.path.len()
        );
        self.children = children;
        self.filter = FilterState::default();
        self.debounce.cancel();
        self.recompute_visible();
        Ok(Navigated::Applied)
    }

    /// Fetch and apply in one step.
    pub async fn select_node<C: Catalog + ?Sized>(
        &mut self,
        catalog: &C,
        id: NodeId,
        reset: bool,
    ) -> Result<Navigated, TransportError> {
        let ticket = self.begin_navigation(id, reset);
        let result = catalog.fetch_children(&ticket.id).await;
        self.finish_navigation(ticket, result)
    }

    /// A command was selected.  Navigates to its root with the path reset
    /// when it differs from the root on screen; re-selecting the displayed
    /// root does nothing.  The root only changes once the fetch is applied.
    pub fn enter_command(&mut self, root: NodeId) -> Option<NavigationTicket> {
        if self.root.as_ref() == Some(&root) {
            return None;
        }
        Some(self.begin_navigation(root, true))
    }

    pub fn home(&mut self) -> Option<NavigationTicket> {
        let root = self.root.clone()?;
        Some(self.begin_navigation(root, true))
    }

    /// Navigate to the `k`-th breadcrumb, truncating the path after it.
    pub fn jump_to_breadcrumb(&mut self, k: usize) -> Option<NavigationTicket> {
        let id = self.path.get(k)?.clone();
        Some(self.begin_navigation(id, false))
    }

    /// One level up: the previous breadcrumb, or the root from depth one.
    pub fn back(&mut self) -> Option<NavigationTicket> {
        match self.path.len() {
            0 => None,
            1 => self.home(),
            n => self.jump_to_breadcrumb(n - 2),
        }
    }

    // ── Filter ───────────────────────────────────────────────────────────────

    /// Record typed filter text.  Applied once input has been quiet.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter = FilterState::new(text);
        self.debounce.schedule();
    }

    /// Drive the debounce.  Returns true when the visible set was recomputed.
    pub fn tick(&mut self) -> bool {
        if !self.debounce.poll() {
            return false;
        }
        debug!("browser: applying filter {:?}", self.filter.raw());
        self.recompute_visible();
        true
    }

    pub fn filter_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    fn recompute_visible(&mut self) {
        let filter = &self.filter;
        self.visible = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, n)| filter.matches(&n.name))
            .map(|(i, _)| i)
            .collect();
        self.view_generation += 1;
        self.failed.clear();
        self.signals.push(RenderSignal::Reset);
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn filter_text(&self) -> &str {
        self.filter.raw()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_node(&self, index: usize) -> Option<&Node> {
        self.visible.get(index).and_then(|&i| self.children.get(i))
    }

    pub fn cache(&self) -> &RowCache {
        &self.cache
    }

    /// Generation of the most recently started navigation.
    pub fn generation(&self) -> u64 {
        self.issued
    }

    /// Bumped every time the visible set is rebuilt.
    pub fn view_generation(&self) -> u64 {
        self.view_generation
    }

    /// Display labels for the path: cached name where known, else the id.
    pub fn breadcrumbs(&self) -> Vec<String> {
        self.path
            .iter()
            .map(|id| {
                self.cache
                    .name(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| id.to_string())
            })
            .collect()
    }

    /// Drain pending render signals in emission order.
    pub fn take_signals(&mut self) -> Vec<RenderSignal> {
        std::mem::take(&mut self.signals)
    }
}

/// Path after navigating to `id`: truncated just after `id` if it is
/// already on the path, otherwise extended by it.
pub fn next_path(path: &[NodeId], id: &NodeId) -> Vec<NodeId> {
    match path.iter().position(|p| p == id) {
        Some(k) => path[..=k].to_vec(),
        None => {
            let mut next = path.to_vec();
            next.push(id.clone());
            next
        }
    }
}
