use super::base_client::BaseApiClient;
use super::{CompletionBackend, OutboundMessage};
use crate::error::ChatError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1";

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [OutboundMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

/// Completion backend for the OpenRouter chat completions API.
pub struct OpenRouterBackend {
    client: BaseApiClient,
}

impl OpenRouterBackend {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(OPENROUTER_ENDPOINT.to_string(), api_key)
    }

    pub fn with_endpoint(endpoint: String, api_key: String) -> Self {
        Self {
            client: BaseApiClient::new(endpoint, api_key),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    async fn complete(
        &self,
        model: &str,
        messages: &[OutboundMessage],
    ) -> Result<String, ChatError> {
        let payload = ChatCompletionRequest { model, messages };
        let response = self.client.send_request("chat/completions", &payload).await?;

        // Rate limiting is interpreted before any other non-success status.
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ChatError::RateLimited {
                model: model.to_string(),
            });
        }
        if !status.is_success() {
            let text = status
                .canonical_reason()
                .map(|reason| reason.to_string())
                .unwrap_or_else(|| status.to_string());
            return Err(ChatError::Upstream(text));
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        match parsed.choices.first() {
            Some(choice) => Ok(choice.message.content.clone()),
            None => Err(ChatError::Upstream("No choices in API response".to_string())),
        }
    }
}
