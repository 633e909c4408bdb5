use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolanaAgentChatError};
use crate::gateway::PRIVATE_KEY_HEADER;
use crate::interfaces::gateway::{ChatGateway, GatewayReply};

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Deserialize, Default)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
}

/// HTTP client for a running agent gateway.
#[derive(Clone)]
pub struct GatewayClient {
    endpoint: String,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatGateway for GatewayClient {
    async fn send(&self, private_key_base58: &str, message: &str) -> Result<GatewayReply> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(PRIVATE_KEY_HEADER, private_key_base58)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: ChatResponse = response.json().await.map_err(|e| {
                SolanaAgentChatError::Serialization(format!("unexpected gateway reply: {e}"))
            })?;
            return Ok(GatewayReply::Reply(body.response));
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorResponse = serde_json::from_str(&text).unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "Gateway rejected chat request");
        Ok(GatewayReply::Rejected {
            status: status.as_u16(),
            message: body.message,
        })
    }
}
