// src/llm/anthropic_client.rs
use super::types::{Message, MessagesRequest, MessagesResponse};
use super::LanguageModel;
use crate::core::config_manager::LlmConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};

pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    version: String,
    timeout: Duration,
}

impl AnthropicClient {
    pub fn new(config: &LlmConfig, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, config, api_key))
    }

    /// Reuse an existing connection pool; the request timeout is applied per call
    pub fn with_client(client: Client, config: &LlmConfig, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            version: config.version.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        info!("Sending request to Anthropic API ({} max tokens)", max_tokens);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.version)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Anthropic API error {}: {}", status, error_text);
            anyhow::bail!("Anthropic API returned error {}: {}", status, error_text);
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        let text = parsed
            .first_text()
            .context("Anthropic API response contained no text content")?;

        info!("Successfully received response from Anthropic API");
        Ok(text)
    }
}
