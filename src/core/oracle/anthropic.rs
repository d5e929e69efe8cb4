use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{extract_code_block, RepairOracle};
use crate::core::prompts::build_repair_prompt;
use crate::error::OracleError;
use crate::models::OracleConfig;

/// API version header value expected by the messages endpoint
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic messages API
pub struct AnthropicOracle {
    client: Client,
    config: OracleConfig,
    api_key: String,
}

/// Chat message in a messages request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Request body for the messages endpoint
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

/// Response from the messages endpoint
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first content block
    fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(|b| b.text.as_deref())
    }
}

impl AnthropicOracle {
    /// Create a new client with the given configuration and API key
    pub fn new(config: OracleConfig, api_key: String) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        Ok(Self { client, config, api_key })
    }

    fn request_body(&self, prompt: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage::user(prompt)],
        }
    }

    /// Send one prompt and return the completion text
    pub async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        debug!("Sending messages request to {} (model {})", self.config.url, self.config.model);

        let response = self
            .client
            .post(&self.config.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    OracleError::Unavailable(format!("Could not connect to {}", self.config.url))
                } else if e.is_timeout() {
                    OracleError::Timeout(self.config.timeout_seconds)
                } else {
                    OracleError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::HttpError { status, message });
        }

        let body = response.text().await.map_err(OracleError::from)?;
        parse_completion(&body)
    }
}

fn parse_completion(body: &str) -> Result<String, OracleError> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| OracleError::MalformedResponse(format!("Failed to parse API response: {}", e)))?;

    if let Some(block) = parsed.content.first() {
        debug!("First content block type: {}", block.kind);
    }
    parsed
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| OracleError::MalformedResponse("response has no text content".to_string()))
}

#[async_trait]
impl RepairOracle for AnthropicOracle {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn repair(
        &self,
        file_path: &str,
        file_content: &str,
        diagnostic_text: &str,
    ) -> Result<Option<String>, OracleError> {
        let prompt = build_repair_prompt(file_path, diagnostic_text, file_content);
        let completion = self.complete(&prompt).await?;
        let code = extract_code_block(&completion);
        if code.trim().is_empty() {
            return Err(OracleError::MalformedResponse(
                "response contained no code".to_string(),
            ));
        }
        Ok(Some(code))
    }
}
