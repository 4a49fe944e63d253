use crate::error::ChatError;
use reqwest::{Client, Response};
use serde::Serialize;

/// Minimal JSON POST client with static bearer authorization.
pub struct BaseApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl BaseApiClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    pub async fn send_request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ChatError> {
        let url = format!("{}/{}", self.endpoint, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;
        Ok(response)
    }
}
