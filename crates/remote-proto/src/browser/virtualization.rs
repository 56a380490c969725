//! Range-based row loading for a virtualized list.
//!
//! Indices address the visible set and `stop` is inclusive.  Loading is
//! split like navigation: `plan_rows` picks the uncached nodes, the
//! resolution runs off the owner, and `merge_rows` writes results back by
//! node id so a batch planned against an older view can never land in the
//! wrong row.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::protocol::Node;
use super::detail::RowDetail;
use super::navigation::Browser;
use super::source::DetailResolver;

/// Told to the rendering side after state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSignal {
    /// The visible set was rebuilt; forget every known-loaded row.
    Reset,
    /// New rows were cached; re-pull the current window.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowState<'a> {
    Loaded(&'a RowDetail),
    Pending,
    /// Detail resolution failed for this view.  Retried by the next load
    /// covering the row.
    Failed,
}

/// Nodes to resolve, stamped with the view they were planned against.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    pub view_generation: u64,
    pub nodes: Vec<Node>,
}

impl RowBatch {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug)]
pub struct ResolvedRows {
    pub view_generation: u64,
    pub rows: Vec<(Node, Result<RowDetail, TransportError>)>,
}

/// Resolve every node of a batch concurrently.
pub async fn resolve_rows<R: DetailResolver + ?Sized>(resolver: &R, batch: RowBatch) -> ResolvedRows {
    let details = join_all(batch.nodes.iter().map(|n| resolver.resolve(n))).await;
    ResolvedRows {
        view_generation: batch.view_generation,
        rows: batch.nodes.into_iter().zip(details).collect(),
    }
}

impl Browser {
    pub fn row_count(&self) -> usize {
        self.visible_len()
    }

    /// False for out-of-range indices.
    pub fn is_row_loaded(&self, index: usize) -> bool {
        self.visible_node(index).is_some_and(|n| self.cache.has(&n.id))
    }

    pub fn row_state(&self, index: usize) -> Option<RowState<'_>> {
        let node = self.visible_node(index)?;
        Some(match self.cache.get(&node.id) {
            Some(detail) => RowState::Loaded(detail),
            None if self.failed.contains(&node.id) => RowState::Failed,
            None => RowState::Pending,
        })
    }

    /// Uncached nodes in `[start, stop]`, clamped to the visible set.
    /// Rows that previously failed are planned again.
    pub fn plan_rows(&mut self, start: usize, stop: usize) -> RowBatch {
        let count = self.row_count();
        let nodes: Vec<Node> = if start >= count || stop < start {
            Vec::new()
        } else {
            let stop = stop.min(count - 1);
            (start..=stop)
                .filter_map(|i| self.visible_node(i))
                .filter(|n| !self.cache.has(&n.id))
                .cloned()
                .collect()
        };
        for node in &nodes {
            self.failed.remove(&node.id);
        }
        RowBatch {
            view_generation: self.view_generation(),
            nodes,
        }
    }

    /// Cache every resolved row.  Failures are remembered only when the
    /// batch belongs to the current view.  Returns how many rows were
    /// cached; emits one `Refresh` for a non-empty batch.
    pub fn merge_rows(&mut self, resolved: ResolvedRows) -> usize {
        if resolved.rows.is_empty() {
            return 0;
        }
        let current = resolved.view_generation == self.view_generation();
        let mut cached = 0;
        for (node, detail) in resolved.rows {
            match detail {
                Ok(detail) => {
                    self.cache.put(node.id, node.name, detail);
                    cached += 1;
                }
                Err(e) => {
                    warn!("browser: row {} failed to resolve: {}", node.id, e);
                    if current {
                        self.failed.insert(node.id);
                    }
                }
            }
        }
        if !current {
            debug!(
                "browser: merged {} rows from view #{} into view #{}",
                cached,
                resolved.view_generation,
                self.view_generation()
            );
        }
        self.signals.push(RenderSignal::Refresh);
        cached
    }

    /// Plan, resolve and merge `[start, stop]` in one step.
    pub async fn load_more_rows<R: DetailResolver + ?Sized>(
        &mut self,
        resolver: &R,
        start: usize,
        stop: usize,
    ) -> usize {
        let batch = self.plan_rows(start, stop);
        if batch.is_empty() {
            return 0;
        }
        let resolved = resolve_rows(resolver, batch).await;
        self.merge_rows(resolved)
    }
}
