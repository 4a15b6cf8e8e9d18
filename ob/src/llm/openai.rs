//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for the Chat Completions API. Any gateway
//! that speaks the same protocol works by pointing `base-url` at it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage};
use crate::config::ResolvedLlmConfig;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    /// `None` means every call fails with a configuration error
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a new client from resolved configuration
    ///
    /// A missing credential does not prevent construction; it is reported on
    /// each call instead.
    pub fn from_config(config: &ResolvedLlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        if config.api_key.is_none() {
            warn!(
                api_key_env = %config.api_key_env,
                "LLM API key missing or placeholder; plan generation will fail until it is set"
            );
        }

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
            base_url: config.base_url.clone(),
            http,
            timeout,
        })
    }

    /// Full URL of the chat completions endpoint
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        serde_json::json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            debug!(timeout = ?self.timeout, "map_send_error: request timed out");
            LlmError::Timeout(self.timeout)
        } else {
            debug!(error = %e, "map_send_error: network error");
            LlmError::Network(e)
        }
    }
}

/// Turn a raw HTTP reply into a completion or a typed error
///
/// An `error` object in the body wins over the status code, so providers that
/// report failures with a 200 are still caught.
fn interpret_response(status: u16, body: &str) -> Result<CompletionResponse, LlmError> {
    debug!(status, body_len = body.len(), "interpret_response: called");
    let success = (200..300).contains(&status);

    let parsed: OpenAIResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if success => {
            debug!(error = %e, "interpret_response: undecodable success body");
            return Err(LlmError::InvalidResponse(format!("failed to decode completion response: {}", e)));
        }
        Err(_) => {
            debug!(status, "interpret_response: undecodable error body");
            return Err(LlmError::ApiError {
                status,
                message: body.trim().to_string(),
            });
        }
    };

    if let Some(error) = parsed.error {
        debug!(status, error_type = ?error.r#type, "interpret_response: provider reported error");
        return Err(LlmError::ApiError {
            status,
            message: error.message,
        });
    }

    if !success {
        debug!(status, "interpret_response: non-success status without error payload");
        return Err(LlmError::ApiError {
            status,
            message: body.trim().to_string(),
        });
    }

    let choice = parsed.choices.into_iter().next().ok_or(LlmError::EmptyChoices)?;
    let usage = parsed.usage.unwrap_or_default();

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        finish_reason: choice.finish_reason,
        usage: TokenUsage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        },
    })
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let api_key = self.api_key.as_deref().ok_or_else(|| LlmError::MissingApiKey {
            env_var: self.api_key_env.clone(),
        })?;

        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        let completion = interpret_response(status, &text)?;
        debug!(
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            total_tokens = completion.usage.total(),
            finish_reason = ?completion.finish_reason,
            "complete: success"
        );
        if completion.is_truncated() {
            warn!("complete: response hit the max token limit and may be cut off");
        }
        Ok(completion)
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
    error: Option<OpenAIError>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    #[serde(default)]
    message: String,
    r#type: Option<String>,
}
