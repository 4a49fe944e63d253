//! Dispatcher state machine tests against a scripted backend.

use async_trait::async_trait;
use chrono::Utc;
use mmchat::client::{CONTEXT_WINDOW, ChatClient, SendOutcome, context_window};
use mmchat::error::ChatError;
use mmchat::history::{HistoryStore, Message, Role};
use mmchat::models::ModelRegistry;
use mmchat::providers::{CompletionBackend, OutboundMessage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

enum Scripted {
    Reply(&'static str),
    RateLimited,
    Upstream(&'static str),
    Transport(&'static str),
}

/// Backend that replays a script and records every request it sees.
/// Exhausting the script yields "ok" replies.
struct ScriptedBackend {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Arc<Mutex<Vec<(String, Vec<OutboundMessage>)>>>,
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        model: &str,
        messages: &[OutboundMessage],
    ) -> Result<String, ChatError> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        match self.replies.lock().unwrap().pop_front() {
            Some(Scripted::Reply(text)) => Ok(text.to_string()),
            Some(Scripted::RateLimited) => Err(ChatError::RateLimited {
                model: model.to_string(),
            }),
            Some(Scripted::Upstream(text)) => Err(ChatError::Upstream(text.to_string())),
            Some(Scripted::Transport(text)) => Err(ChatError::Transport(text.to_string())),
            None => Ok("ok".to_string()),
        }
    }
}

type Requests = Arc<Mutex<Vec<(String, Vec<OutboundMessage>)>>>;

fn client_with(script: Vec<Scripted>) -> (ChatClient, Requests, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open(dir.path().join("history.json"));
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let backend = ScriptedBackend {
        replies: Mutex::new(script.into_iter().collect()),
        requests: Arc::clone(&requests),
    };
    let client = ChatClient::new(ModelRegistry::new(), store, Box::new(backend));
    (client, requests, dir)
}

#[tokio::test]
async fn first_send_creates_conversation_and_appends_reply() {
    let (mut client, requests, _dir) = client_with(vec![Scripted::Reply("hello")]);

    let outcome = client.send_message("hi").await;
    assert_eq!(outcome, SendOutcome::Sent);

    let session = client.session();
    assert!(!session.awaiting_response);
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].content, "hi");
    assert_eq!(session.messages[0].role, Role::User);
    assert_eq!(session.messages[1].content, "hello");
    assert_eq!(session.messages[1].role, Role::Assistant);

    let id = session.active_conversation_id.clone().unwrap();
    let stored = client.store().get(&id).unwrap();
    assert_eq!(stored.messages.len(), 2);
    assert_eq!(stored.model_id, client.registry().default_model().id);

    let recorded = requests.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    let (model, messages) = &recorded[0];
    assert_eq!(model, &client.registry().default_model().id);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "hi");
}

#[tokio::test]
async fn send_rejected_while_awaiting_response() {
    let (mut client, requests, _dir) = client_with(vec![]);
    client.session_mut().awaiting_response = true;

    let outcome = client.send_message("hi").await;

    assert_eq!(outcome, SendOutcome::Rejected);
    assert!(client.session().messages.is_empty());
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_input_rejected() {
    let (mut client, requests, _dir) = client_with(vec![]);

    let outcome = client.send_message("   ").await;

    assert_eq!(outcome, SendOutcome::Rejected);
    assert!(client.session().messages.is_empty());
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rate_limit_keeps_user_message_and_names_model() {
    let (mut client, _requests, _dir) = client_with(vec![Scripted::RateLimited]);

    let outcome = client.send_message("hi").await;
    assert_eq!(outcome, SendOutcome::Failed);

    let session = client.session();
    assert!(!session.awaiting_response);
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].role, Role::User);

    let advisory = session.last_error.as_deref().unwrap();
    assert!(advisory.contains(client.registry().default_model().id.as_str()));

    // the optimistic user message is persisted despite the failure
    let id = session.active_conversation_id.clone().unwrap();
    assert_eq!(client.store().get(&id).unwrap().messages.len(), 1);
}

#[tokio::test]
async fn upstream_error_surfaces_status_text() {
    let (mut client, _requests, _dir) = client_with(vec![Scripted::Upstream("Bad Gateway")]);

    let outcome = client.send_message("hi").await;
    assert_eq!(outcome, SendOutcome::Failed);
    assert_eq!(
        client.session().last_error.as_deref(),
        Some("Error: Bad Gateway")
    );
}

#[tokio::test]
async fn transport_error_surfaces_cause() {
    let (mut client, _requests, _dir) = client_with(vec![Scripted::Transport("connection reset")]);

    let outcome = client.send_message("hi").await;
    assert_eq!(outcome, SendOutcome::Failed);
    assert_eq!(
        client.session().last_error.as_deref(),
        Some("Network or API error: connection reset")
    );
}

#[tokio::test]
async fn advisory_cleared_on_next_accepted_send() {
    let (mut client, _requests, _dir) =
        client_with(vec![Scripted::Transport("boom"), Scripted::Reply("fine")]);

    client.send_message("one").await;
    assert!(client.session().last_error.is_some());

    client.send_message("two").await;
    assert!(client.session().last_error.is_none());
    assert_eq!(client.session().messages.last().unwrap().content, "fine");
}

#[tokio::test]
async fn outgoing_context_is_bounded_and_ends_with_newest() {
    let (mut client, requests, _dir) = client_with(vec![]);

    for i in 0..9 {
        client.send_message(&format!("msg {}", i)).await;
    }
    // 9 settled turns leave 18 messages; the next turn crosses the bound
    client.send_message("final").await;

    let recorded = requests.lock().unwrap();
    assert_eq!(recorded[0].1.len(), 1);
    assert_eq!(recorded[1].1.len(), 3);

    let (_, messages) = recorded.last().unwrap();
    assert_eq!(messages.len(), CONTEXT_WINDOW);
    assert_eq!(messages.last().unwrap().content, "final");
    assert_eq!(messages.last().unwrap().role, Role::User);
    // window starts mid-conversation, chronological order preserved
    assert_eq!(messages[0].role, Role::Assistant);
    assert_eq!(messages[1].content, "msg 4");
}

#[test]
fn context_window_passes_short_conversations_whole() {
    let messages: Vec<Message> = (0..5)
        .map(|i| Message {
            role: if i % 2 == 0 { Role::User } else { Role::Assistant },
            content: format!("m{}", i),
            timestamp: Utc::now(),
        })
        .collect();

    let window = context_window(&messages);
    assert_eq!(window.len(), 5);
    assert_eq!(window[0].content, "m0");
    assert_eq!(window[4].content, "m4");
}

#[tokio::test]
async fn switching_conversations_loads_target_and_clears_error() {
    let (mut client, _requests, _dir) = client_with(vec![
        Scripted::Reply("first reply"),
        Scripted::Transport("boom"),
    ]);

    client.send_message("first").await;
    let first_id = client.session().active_conversation_id.clone().unwrap();

    client.start_new_conversation();
    client.send_message("second").await;
    assert!(client.session().last_error.is_some());

    client.select_conversation(&first_id).unwrap();
    let session = client.session();
    assert!(session.last_error.is_none());
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].content, "first");
    assert_eq!(session.messages[1].content, "first reply");
}

#[tokio::test]
async fn unknown_conversation_is_an_error() {
    let (mut client, _requests, _dir) = client_with(vec![]);
    assert!(client.select_conversation("nope").is_err());
}

#[test]
fn select_model_validates_against_registry() {
    let (mut client, _requests, _dir) = client_with(vec![]);

    assert!(client.select_model("vendor/unknown").is_err());
    client.select_model("x-ai/grok-4-fast:free").unwrap();
    assert_eq!(client.session().selected_model_id, "x-ai/grok-4-fast:free");
}

#[tokio::test]
async fn model_switch_applies_to_next_turn_same_conversation() {
    let (mut client, requests, _dir) = client_with(vec![]);

    client.send_message("one").await;
    let id = client.session().active_conversation_id.clone();

    client
        .select_model("mistralai/mistral-small-3.2-24b-instruct:free")
        .unwrap();
    client.send_message("two").await;

    assert_eq!(client.session().active_conversation_id, id);
    assert_eq!(client.session().messages.len(), 4);

    let recorded = requests.lock().unwrap();
    assert_eq!(
        recorded[1].0,
        "mistralai/mistral-small-3.2-24b-instruct:free"
    );
}

#[tokio::test]
async fn settled_turn_persists_to_disk() {
    let (mut client, _requests, dir) = client_with(vec![Scripted::Reply("hello")]);

    client.send_message("hi").await;

    let reloaded = HistoryStore::open(dir.path().join("history.json"));
    assert_eq!(reloaded.len(), 1);
    let id = client.session().active_conversation_id.clone().unwrap();
    assert_eq!(reloaded.get(&id).unwrap().messages.len(), 2);
}
