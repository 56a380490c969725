//! AppState: data passed read-only to components during render/event.
//!
//! The App event-loop is the only thing that writes to AppState.

use std::time::Duration;

use remote_proto::browser::Browser;
use remote_proto::config::CommandConfig;
use remote_proto::protocol::NodeId;

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub browser: Browser,
    pub commands: Vec<CommandConfig>,
    pub active_command: Option<usize>,
    /// Friendly name reported by the server's Alive call.
    pub server_name: String,
    pub input_mode: InputMode,
    pub last_log: Option<String>,
    /// Node a navigation is currently in flight to.
    pub navigating: Option<NodeId>,
}

impl AppState {
    pub fn new(commands: Vec<CommandConfig>, server_name: String, filter_quiet: Duration) -> Self {
        Self {
            browser: Browser::new(filter_quiet),
            commands,
            active_command: None,
            server_name,
            input_mode: InputMode::Normal,
            last_log: None,
            navigating: None,
        }
    }

    pub fn active_command(&self) -> Option<&CommandConfig> {
        self.active_command.and_then(|i| self.commands.get(i))
    }
}
