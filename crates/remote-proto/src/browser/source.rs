//! Where children and row details come from.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::detail::RowDetail;
use crate::config::BrowserConfig;
use crate::error::TransportError;
use crate::mcws::McwsClient;
use crate::protocol::{Node, NodeId, NodeType};

/// Hierarchical catalog exposing two child-listing shapes.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Structural children (containers).
    async fn browse_children(&self, id: &NodeId) -> Result<Vec<Node>, TransportError>;

    /// Leaf files directly under `id`.
    async fn browse_files(&self, id: &NodeId) -> Result<Vec<Node>, TransportError>;

    /// Children of `id`: the structural listing, or the file listing when
    /// the structural one is empty.  Empty means the node is a dead end.
    /// An error from either call is returned as is.
    async fn fetch_children(&self, id: &NodeId) -> Result<Vec<Node>, TransportError> {
        let children = self.browse_children(id).await?;
        if !children.is_empty() {
            return Ok(children);
        }
        debug!("browser: no structural children under {}, listing files", id);
        self.browse_files(id).await
    }
}

/// Produces the render-ready detail for a node.
#[async_trait]
pub trait DetailResolver: Send + Sync {
    async fn resolve(&self, node: &Node) -> Result<RowDetail, TransportError>;
}

/// Catalog and resolver backed by a live MCWS server.
pub struct McwsCatalog {
    client: Arc<McwsClient>,
    artwork_width: u32,
    artwork_height: u32,
    fallback_colour: String,
}

impl McwsCatalog {
    pub fn new(client: McwsClient, browser: &BrowserConfig) -> Self {
        Self {
            client: Arc::new(client),
            artwork_width: browser.artwork_width,
            artwork_height: browser.artwork_height,
            fallback_colour: browser.fallback_colour.clone(),
        }
    }

    pub async fn play(&self, node_type: NodeType, id: &NodeId) -> Result<(), TransportError> {
        self.client.play(node_type, id).await
    }
}

#[async_trait]
impl Catalog for McwsCatalog {
    async fn browse_children(&self, id: &NodeId) -> Result<Vec<Node>, TransportError> {
        self.client.browse_children(id).await
    }

    async fn browse_files(&self, id: &NodeId) -> Result<Vec<Node>, TransportError> {
        self.client.browse_files(id).await
    }
}

#[async_trait]
impl DetailResolver for McwsCatalog {
    async fn resolve(&self, node: &Node) -> Result<RowDetail, TransportError> {
        let artwork = self.client.image_url(
            node.node_type,
            &node.id,
            self.artwork_width,
            self.artwork_height,
            &self.fallback_colour,
        );
        Ok(RowDetail::for_node(node, artwork))
    }
}
