//! Action enum: user intents produced by components, applied by the App.

use remote_proto::protocol::{NodeId, NodeType};

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Catalog ──────────────────────────────────────────────────────────────
    /// Open a container row.
    Enter(NodeId),
    Play {
        node_type: NodeType,
        id: NodeId,
        name: String,
    },
    Back,
    Home,
    JumpToBreadcrumb(usize),

    // ── Filter ───────────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,
    FilterChanged(String),

    // ── Commands ─────────────────────────────────────────────────────────────
    SelectCommand(usize),
    NextCommand,

    // ── System ───────────────────────────────────────────────────────────────
    CopyToClipboard(String),
    Quit,
}
