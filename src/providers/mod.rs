use crate::error::ChatError;
use crate::history::Role;
use async_trait::async_trait;
use serde::Serialize;

/// A message as it goes over the wire: role and content only, timestamps
/// are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub role: Role,
    pub content: String,
}

/// Seam to the remote completion endpoint. The dispatcher only sees this
/// trait; tests substitute a scripted implementation.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Request a completion for `messages` on `model` and return the
    /// assistant reply text.
    async fn complete(
        &self,
        model: &str,
        messages: &[OutboundMessage],
    ) -> Result<String, ChatError>;
}

pub mod base_client;
pub mod openrouter;
