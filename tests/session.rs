//! Session state tests.

use chrono::Utc;
use mmchat::history::{Conversation, Message, Role};
use mmchat::models::ModelRegistry;
use mmchat::session::Session;

fn user_message(content: &str) -> Message {
    Message {
        role: Role::User,
        content: content.to_string(),
        timestamp: Utc::now(),
    }
}

#[test]
fn registry_lists_models_in_order() {
    let registry = ModelRegistry::new();
    assert!(!registry.list().is_empty());
    assert_eq!(registry.default_model().id, registry.list()[0].id);
    assert!(registry.resolve("x-ai/grok-4-fast:free").is_some());
    assert!(registry.resolve("vendor/unknown").is_none());
}

#[test]
fn new_session_selects_default_model() {
    let registry = ModelRegistry::new();
    let session = Session::new(&registry);
    assert_eq!(session.selected_model_id, registry.default_model().id);
    assert!(session.active_conversation_id.is_none());
    assert!(session.messages.is_empty());
    assert!(session.last_error.is_none());
    assert!(!session.awaiting_response);
}

#[test]
fn start_new_resets_everything() {
    let registry = ModelRegistry::new();
    let mut session = Session::new(&registry);
    session.selected_model_id = "x-ai/grok-4-fast:free".to_string();
    session.active_conversation_id = Some("c1".to_string());
    session.messages.push(user_message("hi"));
    session.last_error = Some("Error: Bad Gateway".to_string());

    session.start_new(&registry);

    assert!(session.active_conversation_id.is_none());
    assert!(session.messages.is_empty());
    assert!(session.last_error.is_none());
    assert_eq!(session.selected_model_id, registry.default_model().id);
}

#[test]
fn load_conversation_copies_messages_and_model() {
    let registry = ModelRegistry::new();
    let mut session = Session::new(&registry);
    session.last_error = Some("stale advisory".to_string());

    let mut conversation = Conversation::new("x-ai/grok-4-fast:free");
    conversation.messages.push(user_message("first"));
    conversation.messages.push(Message {
        role: Role::Assistant,
        content: "second".to_string(),
        timestamp: Utc::now(),
    });

    session.load_conversation(&conversation, &registry);

    assert_eq!(
        session.active_conversation_id.as_deref(),
        Some(conversation.id.as_str())
    );
    assert_eq!(session.selected_model_id, "x-ai/grok-4-fast:free");
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].content, "first");
    assert_eq!(session.messages[1].content, "second");
    assert!(session.last_error.is_none());
}

#[test]
fn load_conversation_falls_back_for_retired_model() {
    let registry = ModelRegistry::new();
    let mut session = Session::new(&registry);

    let conversation = Conversation::new("vendor/retired-model");
    session.load_conversation(&conversation, &registry);

    assert_eq!(session.selected_model_id, registry.default_model().id);
}

#[test]
fn select_model_keeps_messages() {
    let registry = ModelRegistry::new();
    let mut session = Session::new(&registry);
    session.messages.push(user_message("hi"));

    session.select_model("mistralai/mistral-small-3.2-24b-instruct:free");

    assert_eq!(session.messages.len(), 1);
    assert_eq!(
        session.selected_model_id,
        "mistralai/mistral-small-3.2-24b-instruct:free"
    );
}

#[test]
fn stage_draft_guards_blank_and_in_flight() {
    let registry = ModelRegistry::new();
    let mut session = Session::new(&registry);

    session.stage_draft("   ");
    assert!(session.draft.is_empty());

    session.awaiting_response = true;
    session.stage_draft("hello");
    assert!(session.draft.is_empty());
    assert!(session.take_draft().is_none());

    session.awaiting_response = false;
    session.stage_draft("hello");
    assert_eq!(session.draft, "hello");
    assert_eq!(session.take_draft().as_deref(), Some("hello"));
    assert!(session.draft.is_empty());
}
