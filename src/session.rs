//! Transient state for the conversation currently on screen.

use crate::history::{Conversation, Message};
use crate::models::ModelRegistry;

/// What the user is currently viewing and doing. Created fresh at startup
/// and reset whenever a different conversation is selected or a new one is
/// started. The store owns the canonical conversation records; `messages`
/// is a shadow copy of the active one for rendering.
#[derive(Debug, Clone)]
pub struct Session {
    pub active_conversation_id: Option<String>,
    pub selected_model_id: String,
    pub draft: String,
    pub awaiting_response: bool,
    pub last_error: Option<String>,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new(registry: &ModelRegistry) -> Self {
        Self {
            active_conversation_id: None,
            selected_model_id: registry.default_model().id.clone(),
            draft: String::new(),
            awaiting_response: false,
            last_error: None,
            messages: Vec::new(),
        }
    }

    /// Reset to a fresh conversation on the default model.
    pub fn start_new(&mut self, registry: &ModelRegistry) {
        self.active_conversation_id = None;
        self.selected_model_id = registry.default_model().id.clone();
        self.draft.clear();
        self.last_error = None;
        self.messages.clear();
    }

    /// Load a stored conversation into the session. Conversations that
    /// reference a retired model fall back to the default model.
    pub fn load_conversation(&mut self, conversation: &Conversation, registry: &ModelRegistry) {
        self.active_conversation_id = Some(conversation.id.clone());
        self.selected_model_id = match registry.resolve(&conversation.model_id) {
            Some(model) => model.id.clone(),
            None => registry.default_model().id.clone(),
        };
        self.messages = conversation.messages.clone();
        self.draft.clear();
        self.last_error = None;
    }

    /// Switching model keeps the conversation; later turns on the same
    /// conversation id use the new model.
    pub fn select_model(&mut self, id: impl Into<String>) {
        self.selected_model_id = id.into();
    }

    /// Stage text for the next send. Blank input and in-flight turns are
    /// ignored, which is the guard against duplicate sends.
    pub fn stage_draft(&mut self, text: &str) {
        if text.trim().is_empty() || self.awaiting_response {
            return;
        }
        self.draft = text.to_string();
    }

    /// Take the staged draft, leaving the field empty. Returns `None` when
    /// there is nothing sendable.
    pub fn take_draft(&mut self) -> Option<String> {
        if self.awaiting_response {
            return None;
        }
        let text = self.draft.trim().to_string();
        self.draft.clear();
        if text.is_empty() { None } else { Some(text) }
    }
}
