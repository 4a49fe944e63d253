pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::create_command_registry;

use crate::client::ChatClient;

/// REPL-side state threaded through command handlers.
pub struct ReplState {
    pub client: ChatClient,
    pub should_continue: bool,
}

impl ReplState {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            should_continue: true,
        }
    }
}
