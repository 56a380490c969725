//! MCWS client: the authenticated HTTP calls the browser needs.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::TransportError;
use crate::protocol::{self, Node, NodeId, NodeType};

pub struct McwsClient {
    http: reqwest::Client,
    base: String,
    username: String,
    password: String,
    token: Option<String>,
}

impl McwsClient {
    pub fn new(server: &ServerConfig) -> Result<Self, TransportError> {
        if !server.is_valid() {
            return Err(TransportError::new(format!(
                "server url {:?} is not configured",
                server.url
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base: format!("{}/MCWS/v1", server.url.trim_end_matches('/')),
            username: server.username.clone(),
            password: server.password.clone(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Check the server is up; returns its friendly name.  Needs no token.
    pub async fn alive(&self) -> Result<String, TransportError> {
        let body = self.get_text("Alive", &[]).await?;
        protocol::response_item(&body, "FriendlyName")
    }

    /// Exchange the configured credentials for a session token, kept for
    /// every later call.
    pub async fn authenticate(&mut self) -> Result<String, TransportError> {
        let url = format!("{}/Authenticate", self.base);
        let mut req = self.http.get(&url);
        if !self.username.is_empty() {
            req = req.basic_auth(&self.username, Some(&self.password));
        }
        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(TransportError::new(format!(
                "Authenticate returned status: {}",
                response.status()
            )));
        }
        let body = response.text().await?;
        let token = protocol::response_item(&body, "Token")?;
        info!("mcws: authenticated against {}", self.base);
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Structural children of `id` (catalog-browse query).
    pub async fn browse_children(&self, id: &NodeId) -> Result<Vec<Node>, TransportError> {
        let body = self
            .get_text("Browse/Children", &[("ID", id.as_str()), ("Version", "2")])
            .await?;
        protocol::parse_children_xml(&body)
    }

    /// Files directly under `id` (file-browse query).
    pub async fn browse_files(&self, id: &NodeId) -> Result<Vec<Node>, TransportError> {
        let body = self
            .get_text("Browse/Files", &[("ID", id.as_str()), ("Action", "JSON")])
            .await?;
        protocol::parse_files_json(&body)
    }

    /// Start playback of a container (everything under it) or a single file.
    pub async fn play(&self, node_type: NodeType, id: &NodeId) -> Result<(), TransportError> {
        let body = match node_type {
            NodeType::Container => {
                self.get_text("Browse/Files", &[("ID", id.as_str()), ("Action", "Play")])
                    .await?
            }
            NodeType::Playable => {
                self.get_text("Playback/PlayByKey", &[("Key", id.as_str())])
                    .await?
            }
        };
        protocol::parse_response_items(&body)?;
        info!("mcws: playing {:?} {}", node_type, id);
        Ok(())
    }

    /// Artwork URL for a row.  `fallback_colour` is a theme hex colour.
    pub fn image_url(
        &self,
        node_type: NodeType,
        id: &NodeId,
        width: u32,
        height: u32,
        fallback_colour: &str,
    ) -> String {
        image_url(
            &self.base,
            self.token.as_deref().unwrap_or(""),
            node_type,
            id,
            width,
            height,
            fallback_colour,
        )
    }

    async fn get_text(&self, path: &str, params: &[(&str, &str)]) -> Result<String, TransportError> {
        let url = format!("{}/{}", self.base, path);
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        if let Some(token) = self.token.as_deref() {
            query.push(("Token", token));
        }
        query.extend_from_slice(params);

        debug!("mcws: GET {} {:?}", path, params);
        let response = self.http.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            return Err(TransportError::new(format!(
                "{} returned status: {}",
                path,
                response.status()
            )));
        }
        Ok(response.text().await?)
    }
}

/// Build the artwork URL the server renders for a node.
pub fn image_url(
    base: &str,
    token: &str,
    node_type: NodeType,
    id: &NodeId,
    width: u32,
    height: u32,
    fallback_colour: &str,
) -> String {
    let (path, id_param) = match node_type {
        NodeType::Container => ("Browse/Image", "ID"),
        NodeType::Playable => ("File/GetImage", "File"),
    };
    format!(
        "{}/{}?Token={}&{}={}&Format=png&Width={}&Height={}&Pad=1&FallbackColor={}",
        base,
        path,
        token,
        id_param,
        id,
        width,
        height,
        hex_to_rgb(fallback_colour)
    )
}

/// `#rgb` / `#rrggbb` → `r,g,b` in decimal.  Anything else is black.
pub fn hex_to_rgb(hex: &str) -> String {
    let digits: Vec<char> = hex.chars().collect();
    let pairs: Option<[String; 3]> = match digits.as_slice() {
        ['#', r, g, b] => Some([format!("{r}{r}"), format!("{g}{g}"), format!("{b}{b}")]),
        ['#', r1, r2, g1, g2, b1, b2] => Some([
            format!("{r1}{r2}"),
            format!("{g1}{g2}"),
            format!("{b1}{b2}"),
        ]),
        _ => None,
    };
    let channels = pairs
        .and_then(|p| {
            let parsed: Option<Vec<u8>> =
                p.iter().map(|c| u8::from_str_radix(c, 16).ok()).collect();
            parsed
        })
        .unwrap_or_else(|| vec![0, 0, 0]);
    format!("{},{},{}", channels[0], channels[1], channels[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#607d8b"), "96,125,139");
        assert_eq!(hex_to_rgb("#fff"), "255,255,255");
        assert_eq!(hex_to_rgb("#0a0"), "0,170,0");
        assert_eq!(hex_to_rgb("607d8b"), "0,0,0");
        assert_eq!(hex_to_rgb("#zzzzzz"), "0,0,0");
    }

    #[test]
    fn test_image_url_by_type() {
        let base = "http://media:52199/MCWS/v1";
        let id = NodeId::new("42");
        assert_eq!(
            image_url(base, "tok", NodeType::Container, &id, 96, 96, "#607d8b"),
            "http://media:52199/MCWS/v1/Browse/Image?Token=tok&ID=42&Format=png&Width=96&Height=96&Pad=1&FallbackColor=96,125,139"
        );
        assert_eq!(
            image_url(base, "tok", NodeType::Playable, &id, 64, 48, "#000"),
            "http://media:52199/MCWS/v1/File/GetImage?Token=tok&File=42&Format=png&Width=64&Height=48&Pad=1&FallbackColor=0,0,0"
        );
    }

    #[test]
    fn test_unconfigured_server_is_rejected() {
        let err = McwsClient::new(&ServerConfig::default()).err().unwrap();
        assert!(err.message.contains("not configured"));

        let client = McwsClient::new(&ServerConfig {
            url: "http://media:52199/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://media:52199/MCWS/v1");
        assert!(client.token().is_none());
    }
}
