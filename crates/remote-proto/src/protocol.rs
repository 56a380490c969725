//! Catalog node model and MCWS response decoding.
//!
//! The media server answers browse queries in two shapes:
//!
//! - `Browse/Children` returns an XML envelope with one `<Item Name="…">id</Item>`
//!   per structural child (folders, albums, shows). These are containers.
//! - `Browse/Files?Action=JSON` returns a JSON array of field maps, one per
//!   playable file.
//!
//! Every other call returns the same XML envelope, whose `Status` attribute is
//! either `OK` or `Failure`.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Opaque, stable catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Whether a node can be entered or only started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Structural node; MCWS "browse" play type.
    Container,
    /// Leaf file; MCWS "file" play type.
    Playable,
}

/// Kind-specific presentation attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaContent {
    Audio {
        artist: Option<String>,
        duration_secs: f64,
    },
    Movie {
        resolution: Option<String>,
        year: Option<String>,
        duration_secs: f64,
    },
    TvShow {
        season: Option<String>,
        episode: Option<String>,
        resolution: Option<String>,
        duration_secs: f64,
    },
    Generic,
}

/// An entry in the catalog.  Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
    pub content: MediaContent,
}

impl Node {
    pub fn container(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.into(),
            node_type: NodeType::Container,
            content: MediaContent::Generic,
        }
    }

    pub fn playable(id: impl Into<String>, name: impl Into<String>, content: MediaContent) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.into(),
            node_type: NodeType::Playable,
            content,
        }
    }

    pub fn is_container(&self) -> bool {
        self.node_type == NodeType::Container
    }
}

// ── XML envelope ──────────────────────────────────────────────────────────────

const STATUS_PATTERN: &str = r#"<Response\s+Status="([^"]*)""#;
const ITEM_PATTERN: &str = r#"<Item\s+Name="([^"]*)"\s*>([^<]*)</Item>"#;

fn compile(pattern: &str) -> Result<Regex, TransportError> {
    Regex::new(pattern).map_err(|e| TransportError::new(format!("bad pattern: {}", e)))
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Decode an MCWS XML envelope into its `(Name, value)` items, in order.
///
/// A missing envelope or a `Status` other than `OK` is a transport error;
/// the server puts its reason in an `Information` item when it has one.
pub fn parse_response_items(xml: &str) -> Result<Vec<(String, String)>, TransportError> {
    let status = compile(STATUS_PATTERN)?
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TransportError::new("malformed response: no Response envelope"))?;

    let items: Vec<(String, String)> = compile(ITEM_PATTERN)?
        .captures_iter(xml)
        .map(|c| (unescape_xml(&c[1]), unescape_xml(c[2].trim())))
        .collect();

    if status != "OK" {
        let info = items
            .iter()
            .find(|(k, _)| k == "Information")
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| format!("status {}", status));
        return Err(TransportError::new(format!("server failure: {}", info)));
    }
    Ok(items)
}

/// Find the value of item `name` in an MCWS XML envelope.
pub fn response_item(xml: &str, name: &str) -> Result<String, TransportError> {
    parse_response_items(xml)?
        .into_iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
        .ok_or_else(|| TransportError::new(format!("malformed response: no {} item", name)))
}

/// `Browse/Children` → container nodes.  Display name is the `Name`
/// attribute, the key is the element text.
pub fn parse_children_xml(xml: &str) -> Result<Vec<Node>, TransportError> {
    Ok(parse_response_items(xml)?
        .into_iter()
        .filter(|(_, id)| !id.is_empty())
        .map(|(name, id)| Node::container(id, name))
        .collect())
}

// ── JSON file listing ─────────────────────────────────────────────────────────

type FieldMap = HashMap<String, serde_json::Value>;

fn field_str(fields: &FieldMap, key: &str) -> Option<String> {
    match fields.get(key)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_f64(fields: &FieldMap, key: &str) -> Option<f64> {
    match fields.get(key)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pick the presentation variant from the file's media type fields.
pub fn media_content(fields: &FieldMap) -> MediaContent {
    let duration_secs = field_f64(fields, "Duration").unwrap_or(0.0);
    let media_type = field_str(fields, "Media Type");
    let sub_type = field_str(fields, "Media Sub Type");
    match (media_type.as_deref(), sub_type.as_deref()) {
        (Some("Audio"), _) => MediaContent::Audio {
            artist: field_str(fields, "Artist"),
            duration_secs,
        },
        (Some("Video"), Some("Movie")) => MediaContent::Movie {
            resolution: field_str(fields, "Dimensions"),
            year: field_str(fields, "Year"),
            duration_secs,
        },
        (Some("Video"), Some("TV Show")) => MediaContent::TvShow {
            season: field_str(fields, "Season"),
            episode: field_str(fields, "Episode"),
            resolution: field_str(fields, "Dimensions"),
            duration_secs,
        },
        _ => MediaContent::Generic,
    }
}

/// `Browse/Files?Action=JSON` → playable nodes.  Entries without a `Key`
/// cannot be played or cached and are skipped.
pub fn parse_files_json(body: &str) -> Result<Vec<Node>, TransportError> {
    let rows: Vec<FieldMap> = serde_json::from_str(body)?;
    Ok(rows
        .iter()
        .filter_map(|fields| {
            let key = field_str(fields, "Key")?;
            let name = field_str(fields, "Name").unwrap_or_else(|| key.clone());
            Some(Node::playable(key, name, media_content(fields)))
        })
        .collect())
}
