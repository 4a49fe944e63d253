//! The completion dispatcher: drives one chat turn from send intent to
//! settlement and keeps the session and history store consistent.

use crate::error::ChatError;
use crate::history::{Conversation, ConversationSummary, HistoryStore, Message};
use crate::models::{ModelInfo, ModelRegistry};
use crate::providers::{CompletionBackend, OutboundMessage};
use crate::session::Session;
use tracing::warn;

/// Most recent messages included in an outgoing completion request. Bounds
/// request size and latency; everything earlier is dropped from the
/// upstream context.
pub const CONTEXT_WINDOW: usize = 12;

/// How a send intent settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The guard rejected the intent; nothing was dispatched.
    Rejected,
    /// Assistant reply appended and persisted.
    Sent,
    /// The turn failed; the advisory is on the session.
    Failed,
}

/// Process-wide chat state: registry, store and session, plus the backend
/// seam. All intents from the presentation boundary go through here, and
/// the `&mut self` borrow serializes them, so at most one completion
/// request is ever outstanding.
pub struct ChatClient {
    registry: ModelRegistry,
    store: HistoryStore,
    session: Session,
    backend: Box<dyn CompletionBackend>,
}

impl ChatClient {
    pub fn new(
        registry: ModelRegistry,
        store: HistoryStore,
        backend: Box<dyn CompletionBackend>,
    ) -> Self {
        let session = Session::new(&registry);
        Self {
            registry,
            store,
            session,
            backend,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn summaries(&self) -> Vec<ConversationSummary> {
        self.store.summaries(&self.registry)
    }

    pub fn selected_model(&self) -> &ModelInfo {
        self.registry
            .resolve(&self.session.selected_model_id)
            .unwrap_or_else(|| self.registry.default_model())
    }

    pub fn start_new_conversation(&mut self) {
        self.session.start_new(&self.registry);
    }

    pub fn select_model(&mut self, id: &str) -> Result<(), ChatError> {
        match self.registry.resolve(id) {
            Some(model) => {
                let id = model.id.clone();
                self.session.select_model(id);
                Ok(())
            }
            None => Err(ChatError::Input(format!("Unknown model: {}", id))),
        }
    }

    pub fn select_conversation(&mut self, id: &str) -> Result<(), ChatError> {
        match self.store.get(id) {
            Some(conversation) => {
                let conversation = conversation.clone();
                self.session.load_conversation(&conversation, &self.registry);
                Ok(())
            }
            None => Err(ChatError::Input(format!("Unknown conversation: {}", id))),
        }
    }

    /// Stage `text` and drive a full turn.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        self.session.stage_draft(text);
        self.send_staged().await
    }

    /// Drive one turn from whatever is staged in the session draft:
    /// `Idle -> AwaitingResponse -> Settled -> Idle`.
    pub async fn send_staged(&mut self) -> SendOutcome {
        let Some(text) = self.session.take_draft() else {
            return SendOutcome::Rejected;
        };
        self.session.last_error = None;

        // The conversation must exist and be the session's active one
        // before the request leaves, so a rapid second send reuses it
        // instead of creating a sibling.
        let conversation_id = match self.session.active_conversation_id.clone() {
            Some(id) => id,
            None => {
                let conversation = Conversation::new(self.session.selected_model_id.clone());
                let id = conversation.id.clone();
                self.store.upsert(conversation);
                self.session.active_conversation_id = Some(id.clone());
                id
            }
        };

        // Optimistic append: the user's message stays even if the turn
        // fails; failure only withholds the assistant reply.
        let user_message = Message::user(text);
        self.session.messages.push(user_message.clone());
        self.store.append_message(&conversation_id, user_message);
        self.persist();

        let window = context_window(&self.session.messages);
        let model_id = self.session.selected_model_id.clone();

        self.session.awaiting_response = true;
        let result = self.backend.complete(&model_id, &window).await;
        self.session.awaiting_response = false;

        match result {
            Ok(reply) => {
                let message = Message::assistant(reply);
                // Settlement targets the conversation captured at dispatch
                // time, not whichever one the session displays now.
                if self.session.active_conversation_id.as_deref()
                    == Some(conversation_id.as_str())
                {
                    self.session.messages.push(message.clone());
                }
                self.store.append_message(&conversation_id, message);
                self.persist();
                SendOutcome::Sent
            }
            Err(err) => {
                self.session.last_error = Some(err.to_string());
                SendOutcome::Failed
            }
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save() {
            warn!("history not persisted this turn: {}", err);
        }
    }
}

/// Reduce a conversation to the bounded context sent upstream: the last
/// [`CONTEXT_WINDOW`] messages in chronological order, timestamps stripped.
pub fn context_window(messages: &[Message]) -> Vec<OutboundMessage> {
    let skip = messages.len().saturating_sub(CONTEXT_WINDOW);
    messages[skip..]
        .iter()
        .map(|m| OutboundMessage {
            role: m.role,
            content: m.content.clone(),
        })
        .collect()
}
