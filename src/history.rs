//! Conversation records and the file-backed history store.
//!
//! The store owns every persisted conversation and serializes the whole
//! mapping as one JSON document. Durability is best-effort: unreadable data
//! loads as an empty store and write failures degrade to in-memory-only
//! operation for the turn, logged but never surfaced.

use crate::error::ChatError;
use crate::models::ModelRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Most conversations retained after any store mutation.
pub const HISTORY_CAP: usize = 10;

const EMPTY_PREVIEW: &str = "Empty chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message. Immutable once created; a conversation's message
/// vector is append-only, so insertion order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A persisted exchange with one associated model. `last_updated` tracks
/// the most recent append or the creation instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub model_id: String,
    pub last_updated: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            model_id: model_id.into(),
            last_updated: Utc::now(),
            messages: Vec::new(),
        }
    }
}

/// One row of the "existing chats" listing.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub id: String,
    pub model_name: String,
    pub preview: String,
    pub last_updated: DateTime<Utc>,
}

pub struct HistoryStore {
    path: PathBuf,
    conversations: BTreeMap<String, Conversation>,
}

impl HistoryStore {
    /// Open the store at `path`, loading whatever is there. Missing or
    /// corrupt data yields an empty store; corruption is "no history",
    /// not a fatal error.
    pub fn open(path: PathBuf) -> Self {
        let conversations = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(err) => {
                    let corrupt = ChatError::StorageCorrupt(err.to_string());
                    warn!("{} at {}, starting empty", corrupt, path.display());
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            conversations,
        }
    }

    /// Serialize the whole mapping back to disk. Callers treat failure as
    /// best-effort and keep the in-memory state.
    pub fn save(&self) -> Result<(), ChatError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ChatError::StorageWriteFailed(e.to_string()))?;
            }
        }
        let contents = serde_json::to_string(&self.conversations)
            .map_err(|e| ChatError::StorageWriteFailed(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| ChatError::StorageWriteFailed(e.to_string()))
    }

    /// Insert or replace a conversation, stamp its `last_updated`, then
    /// enforce the retention cap.
    pub fn upsert(&mut self, mut conversation: Conversation) {
        conversation.last_updated = Utc::now();
        self.conversations
            .insert(conversation.id.clone(), conversation);
        apply_retention(&mut self.conversations);
    }

    /// Append a message to a stored conversation and refresh its
    /// `last_updated`. Unknown ids are ignored; the conversation may have
    /// been evicted between dispatch and settlement.
    pub fn append_message(&mut self, id: &str, message: Message) {
        if let Some(conversation) = self.conversations.get_mut(id) {
            conversation.last_updated = message.timestamp;
            conversation.messages.push(message);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Listing rows sorted by recency, newest first. Conversations with no
    /// messages are not yet part of the "existing chats" view, though they
    /// still occupy a retention slot until populated. Retired model ids
    /// are labelled with the raw id.
    pub fn summaries(&self, registry: &ModelRegistry) -> Vec<ConversationSummary> {
        let mut rows: Vec<ConversationSummary> = self
            .conversations
            .values()
            .filter(|c| !c.messages.is_empty())
            .map(|c| ConversationSummary {
                id: c.id.clone(),
                model_name: registry
                    .resolve(&c.model_id)
                    .map(|m| m.display_name.clone())
                    .unwrap_or_else(|| c.model_id.clone()),
                preview: c
                    .messages
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_else(|| EMPTY_PREVIEW.to_string()),
                last_updated: c.last_updated,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| a.id.cmp(&b.id))
        });
        rows
    }
}

/// Drop the least-recently-updated conversations until at most
/// [`HISTORY_CAP`] remain. Ties fall to id lexical order.
pub fn apply_retention(conversations: &mut BTreeMap<String, Conversation>) {
    if conversations.len() <= HISTORY_CAP {
        return;
    }
    let mut order: Vec<(DateTime<Utc>, String)> = conversations
        .values()
        .map(|c| (c.last_updated, c.id.clone()))
        .collect();
    order.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    order.truncate(HISTORY_CAP);
    let keep: BTreeSet<String> = order.into_iter().map(|(_, id)| id).collect();
    conversations.retain(|id, _| keep.contains(id));
}
