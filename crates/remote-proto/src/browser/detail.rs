//! Render-ready row detail, built per media kind.

use chrono::NaiveTime;

use crate::protocol::{MediaContent, Node, NodeType};

const SEP: &str = " \u{2022} ";

/// What a row shows once resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDetail {
    pub title: String,
    pub subtitle: Option<String>,
    pub artwork_url: String,
    pub node_type: NodeType,
}

impl RowDetail {
    pub fn for_node(node: &Node, artwork_url: String) -> Self {
        Self {
            title: node.name.clone(),
            subtitle: describe(&node.content),
            artwork_url,
            node_type: node.node_type,
        }
    }

    /// Containers get an "enter" affordance; everything gets "play".
    pub fn enterable(&self) -> bool {
        self.node_type == NodeType::Container
    }
}

/// Secondary line for a node, or `None` for generic content.
pub fn describe(content: &MediaContent) -> Option<String> {
    let parts: Vec<String> = match content {
        MediaContent::Audio {
            artist,
            duration_secs,
        } => artist
            .iter()
            .cloned()
            .chain([format_duration(*duration_secs)])
            .collect(),
        MediaContent::Movie {
            resolution,
            year,
            duration_secs,
        } => resolution
            .iter()
            .chain(year.iter())
            .cloned()
            .chain([format_duration(*duration_secs)])
            .collect(),
        MediaContent::TvShow {
            season,
            episode,
            resolution,
            duration_secs,
        } => episode_marker(season.as_deref(), episode.as_deref())
            .into_iter()
            .chain(resolution.iter().cloned())
            .chain([format_duration(*duration_secs)])
            .collect(),
        MediaContent::Generic => return None,
    };
    Some(parts.join(SEP))
}

fn episode_marker(season: Option<&str>, episode: Option<&str>) -> Option<String> {
    match (season, episode) {
        (None, None) => None,
        (s, e) => {
            let mut marker = String::new();
            if let Some(s) = s {
                marker.push_str(&format!("S{}", s));
            }
            if let Some(e) = e {
                marker.push_str(&format!("E{}", e));
            }
            Some(marker)
        }
    }
}

/// `HH:MM:SS`, wrapping at 24 hours.
pub fn format_duration(secs: f64) -> String {
    let whole = if secs.is_finite() && secs > 0.0 {
        (secs.floor() as u64 % 86_400) as u32
    } else {
        0
    };
    NaiveTime::from_num_seconds_from_midnight_opt(whole, 0)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "00:00:00".to_string())
}
