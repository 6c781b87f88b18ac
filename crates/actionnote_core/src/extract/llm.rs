//! Chat-model action-item extraction with heuristic fallback.
//!
//! # Responsibility
//! - Define the `ChatClient` seam used to reach an external model.
//! - Build the extraction prompt and decode the model's structured answer.
//! - Resolve every model failure to the heuristic extractor.
//!
//! # Invariants
//! - Blank input never reaches the client.
//! - Failures are logged and resolved locally; callers always get a list.
//! - Log events carry error metadata only, never note text.

use crate::extract::{dedupe_case_insensitive, extract_action_items};
use log::{debug, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error produced while talking to the chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Server could not be reached at the given base URL.
    Connection(String),
    /// Request exceeded the configured timeout.
    Timeout { timeout_secs: u64 },
    /// Server answered with a non-success status.
    Http { status: u16, body: String },
    /// Any other client/transport failure.
    Transport(String),
    /// Model output could not be decoded into a list of strings.
    MalformedResponse(String),
}

impl Display for LlmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(url) => write!(f, "cannot connect to chat model at {url}"),
            Self::Timeout { timeout_secs } => {
                write!(f, "chat request timed out after {timeout_secs}s")
            }
            Self::Http { status, body } => write!(f, "chat model returned {status}: {body}"),
            Self::Transport(message) => write!(f, "chat transport failure: {message}"),
            Self::MalformedResponse(message) => {
                write!(f, "malformed chat model response: {message}")
            }
        }
    }
}

impl Error for LlmError {}

impl LlmError {
    /// Stable metadata code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "llm_connection",
            Self::Timeout { .. } => "llm_timeout",
            Self::Http { .. } => "llm_http",
            Self::Transport(_) => "llm_transport",
            Self::MalformedResponse(_) => "llm_malformed_response",
        }
    }
}

/// Minimal chat-completion capability.
///
/// Implementations send one user prompt and return the raw assistant
/// message content.
pub trait ChatClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Result of one model-backed extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmOutcome {
    /// Model answered with a decodable list (already deduplicated).
    Model(Vec<String>),
    /// Model failed; the heuristic must be used instead.
    Fallback { reason: LlmError },
}

impl LlmOutcome {
    /// Returns whether the heuristic branch is required.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Resolves the outcome into items, running the heuristic on `text` for
    /// a fallback.
    pub fn resolve(self, text: &str) -> Vec<String> {
        match self {
            Self::Model(items) => items,
            Self::Fallback { reason } => {
                warn!(
                    "event=llm_extract module=extract status=fallback error_code={} error={}",
                    reason.code(),
                    reason
                );
                extract_action_items(text)
            }
        }
    }
}

#[derive(Deserialize)]
struct ActionItemsPayload {
    items: Vec<String>,
}

/// Builds the extraction prompt for `text`.
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are an assistant that extracts action items from notes.\n\
         Given the following text, identify all actionable tasks and return them as a JSON \
         object of the form {{\"items\": [\"...\"]}}.\n\
         Each action item should be concise and in imperative form (e.g., \"Set up database\", \
         \"Write tests\").\n\n\
         Text:\n{text}\n\n\
         Extract all action items from the text above. If there are no clear action items, \
         return an empty list."
    )
}

/// Decodes a model answer of the form `{"items": [...]}`.
///
/// Tolerates a surrounding markdown code fence. Items are trimmed, blank
/// items dropped, then deduplicated case-insensitively.
pub fn parse_items(raw: &str) -> Result<Vec<String>, LlmError> {
    let body = strip_code_fence(raw.trim());
    let payload: ActionItemsPayload = serde_json::from_str(body)
        .map_err(|err| LlmError::MalformedResponse(err.to_string()))?;

    let items = payload
        .items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty());
    Ok(dedupe_case_insensitive(items))
}

fn strip_code_fence(value: &str) -> &str {
    let Some(inner) = value.strip_prefix("```") else {
        return value;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Asks the model for action items without resolving failures.
///
/// Blank input yields `Model(vec![])` without calling `client`.
pub fn try_extract_action_items_llm(text: &str, client: &dyn ChatClient) -> LlmOutcome {
    if text.trim().is_empty() {
        return LlmOutcome::Model(Vec::new());
    }

    let prompt = build_prompt(text);
    match client.complete(&prompt).and_then(|raw| parse_items(&raw)) {
        Ok(items) => {
            debug!(
                "event=llm_extract module=extract status=ok item_count={}",
                items.len()
            );
            LlmOutcome::Model(items)
        }
        Err(reason) => LlmOutcome::Fallback { reason },
    }
}

/// Extracts action items through the chat model.
///
/// Never fails: any model error degrades to [`extract_action_items`] on the
/// same text.
pub fn extract_action_items_llm(text: &str, client: &dyn ChatClient) -> Vec<String> {
    try_extract_action_items_llm(text, client).resolve(text)
}
