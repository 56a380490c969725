/// Network or protocol failure talking to the media server.
///
/// This is the only error kind the catalog browser deals in: a failed browse
/// query, a failed detail resolution, or a server-side `Failure` status all
/// collapse into one message-carrying value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(format!("http: {}", e))
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("malformed response: {}", e))
    }
}
