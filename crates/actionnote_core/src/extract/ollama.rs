//! Ollama HTTP chat client.
//!
//! # Responsibility
//! - Send one blocking `/api/chat` request per prompt.
//! - Ask for a JSON-schema constrained `{"items": [string]}` answer.
//! - Map transport and status failures to `LlmError`.
//!
//! # Invariants
//! - No retries; the configured timeout bounds every call.

use crate::config::LlmConfig;
use crate::extract::llm::{ChatClient, LlmError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Blocking client for a local or remote Ollama server.
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    /// Creates a client for `base_url` using `model`.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            timeout_secs,
            client,
        })
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::new(&config.base_url, config.model.clone(), config.timeout_secs)
    }

    /// Model name sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_send_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_connect() {
            LlmError::Connection(self.base_url.clone())
        } else if err.is_timeout() {
            LlmError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    format: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

fn action_items_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "items": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["items"]
    })
}

impl ChatClient for OllamaClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            format: action_items_schema(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|err| self.map_send_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|err| LlmError::MalformedResponse(err.to_string()))?;
        Ok(parsed.message.content)
    }
}
