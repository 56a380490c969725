use std::collections::HashMap;

use crate::protocol::NodeId;
use super::detail::RowDetail;

#[derive(Debug, Clone, PartialEq)]
struct RowEntry {
    name: String,
    detail: RowDetail,
}

/// Resolved row details keyed by node id.
///
/// Lives for the whole session and is never evicted, so anything resolved
/// once (including under a previous filter or path) renders instantly later.
/// Breadcrumbs read display names from here too.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RowCache {
    entries: HashMap<NodeId, RowEntry>,
}

impl RowCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&RowDetail> {
        self.entries.get(id).map(|e| &e.detail)
    }

    pub fn name(&self, id: &NodeId) -> Option<&str> {
        self.entries.get(id).map(|e| e.name.as_str())
    }

    /// Last write wins; details are deterministic per id so this is harmless.
    pub fn put(&mut self, id: NodeId, name: impl Into<String>, detail: RowDetail) {
        self.entries.insert(
            id,
            RowEntry {
                name: name.into(),
                detail,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
