//! Outbound calls to the local provider.
//!
//! [`ChatBackend`] is the seam between the chat service and the network; the
//! service never sees a `reqwest` type. [`HttpChatBackend`] speaks both wire
//! formats, and every failure comes back as a [`ProviderError`] whose
//! [`ErrorCategory`] decides the text shown in the transcript.

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::api::{ChatMessage, ChatRequest, ChatResponse, GenerateRequest, GenerateResponse};
use crate::core::providers::Provider;

const ERROR_PREFIX: &str = "Sorry, I encountered an error. ";
const ERROR_BODY_LIMIT: usize = 200;
const REASONING_TAGS: [&str; 2] = ["think", "reasoning"];

/// Everything needed to perform one exchange with a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRequest {
    pub provider: Provider,
    pub endpoint: String,
    pub model: String,
    /// Latest user message; the whole request for single-prompt providers.
    pub prompt: String,
    /// Full turn history including `prompt`, for chat-completions providers.
    pub history: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Unreachable,
    NotFound,
    ServerError,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The endpoint URL for the provider is empty.
    NotConfigured { provider: Provider },
    /// The endpoint URL could not be used to build a request.
    InvalidUrl { url: String, message: String },
    /// No connection could be established.
    Unreachable { url: String, message: String },
    /// The server answered with a non-success status.
    Status {
        provider: Provider,
        status: u16,
        reason: String,
        body: String,
    },
    /// The connection broke after it was established.
    Transport { provider: Provider, message: String },
    /// The response body was not the expected JSON.
    Decode { provider: Provider, message: String },
    /// A chat-completions response carried no choices.
    EmptyResponse { provider: Provider },
    /// A chat-completions request was built without any messages.
    EmptyHistory,
}

impl ProviderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProviderError::Unreachable { .. } => ErrorCategory::Unreachable,
            ProviderError::Status { status, .. } => {
                let status = StatusCode::from_u16(*status).ok();
                match status {
                    Some(StatusCode::NOT_FOUND) => ErrorCategory::NotFound,
                    Some(code) if code.is_server_error() => ErrorCategory::ServerError,
                    _ => ErrorCategory::Other,
                }
            }
            _ => ErrorCategory::Other,
        }
    }

    /// Text of the assistant message that replaces a failed reply.
    pub fn transcript_message(&self) -> String {
        let detail = match (self.category(), self) {
            (ErrorCategory::Unreachable, ProviderError::Unreachable { url, .. }) => format!(
                "Unable to connect to the API. Please ensure your LLM server is running at {url}"
            ),
            (ErrorCategory::NotFound, _) => {
                "API endpoint not found. Please check your API URL configuration.".to_string()
            }
            (ErrorCategory::ServerError, _) => {
                "Server error. The LLM server may be experiencing issues.".to_string()
            }
            _ => format!("Error: {self}"),
        };
        format!("{ERROR_PREFIX}{detail}")
    }

    /// Anything that fails before a response status arrives counts as
    /// unreachable, including connections dropped mid-request.
    fn from_reqwest(provider: Provider, url: &str, err: reqwest::Error) -> Self {
        if err.is_builder() {
            ProviderError::InvalidUrl {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ProviderError::Decode {
                provider,
                message: err.to_string(),
            }
        } else if err.is_connect() || (err.is_request() && err.status().is_none()) {
            ProviderError::Unreachable {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            ProviderError::Transport {
                provider,
                message: err.to_string(),
            }
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NotConfigured { provider } => {
                write!(f, "{} API URL is not configured", provider.display_name())
            }
            ProviderError::InvalidUrl { url, message } => {
                write!(f, "Invalid API URL '{url}': {message}")
            }
            ProviderError::Unreachable { url, .. } => {
                write!(
                    f,
                    "Network error: Unable to reach {url}. Is your LLM server running?"
                )
            }
            ProviderError::Status {
                provider,
                status,
                reason,
                body,
            } => {
                write!(f, "{} API error: {status}", provider.display_name())?;
                if !reason.is_empty() {
                    write!(f, " {reason}")?;
                }
                if !body.is_empty() {
                    write!(f, " - {body}")?;
                }
                Ok(())
            }
            ProviderError::Transport { provider, message } => {
                write!(f, "{} API request failed: {message}", provider.display_name())
            }
            ProviderError::Decode { provider, message } => {
                write!(
                    f,
                    "Invalid response from {} API: {message}",
                    provider.display_name()
                )
            }
            ProviderError::EmptyResponse { provider } => {
                write!(f, "No response from {} API", provider.display_name())
            }
            ProviderError::EmptyHistory => write!(f, "Messages array cannot be empty"),
        }
    }
}

impl std::error::Error for ProviderError {}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Perform one request/response round-trip and return the normalized
    /// assistant text.
    async fn complete(&self, request: &ExchangeRequest) -> Result<String, ProviderError>;
}

#[derive(Clone, Default)]
pub struct HttpChatBackend {
    client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn generate(&self, request: &ExchangeRequest) -> Result<String, ProviderError> {
        let provider = request.provider;
        let body = GenerateRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            stream: false,
        };
        debug!(url = %request.endpoint, model = %request.model, "sending generate request");

        let response = self
            .client
            .post(&request.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(provider, &request.endpoint, e))?;
        let response = check_status(provider, response).await?;
        let data = response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| ProviderError::from_reqwest(provider, &request.endpoint, e))?;
        Ok(data.response.unwrap_or_default())
    }

    async fn chat(&self, request: &ExchangeRequest) -> Result<String, ProviderError> {
        let provider = request.provider;
        if request.history.is_empty() {
            return Err(ProviderError::EmptyHistory);
        }
        let body = ChatRequest {
            model: request.model.clone(),
            messages: request.history.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        debug!(
            url = %request.endpoint,
            model = %request.model,
            message_count = body.messages.len(),
            "sending chat completions request"
        );

        let response = self
            .client
            .post(&request.endpoint)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(provider, &request.endpoint, e))?;
        let response = check_status(provider, response).await?;
        let data = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::from_reqwest(provider, &request.endpoint, e))?;

        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse { provider })?;
        let content = choice
            .message
            .and_then(|message| message.content)
            .unwrap_or_default();
        Ok(strip_reasoning(&content))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(&self, request: &ExchangeRequest) -> Result<String, ProviderError> {
        if request.endpoint.trim().is_empty() {
            return Err(ProviderError::NotConfigured {
                provider: request.provider,
            });
        }
        match request.provider {
            Provider::Ollama => self.generate(request).await,
            Provider::LmStudio => self.chat(request).await,
        }
    }
}

async fn check_status(
    provider: Provider,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        provider,
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body: summarize_body(&body),
    })
}

fn summarize_body(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let head: String = chars.by_ref().take(ERROR_BODY_LIMIT).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Remove `<think>…</think>` and `<reasoning>…</reasoning>` blocks emitted by
/// reasoning models, then trim surrounding whitespace.
///
/// Tags match case-insensitively and each block ends at the nearest closing
/// tag. An opening tag without a closing tag is left in place.
pub fn strip_reasoning(content: &str) -> String {
    let mut cleaned = content.to_string();
    for tag in REASONING_TAGS {
        cleaned = strip_tag_blocks(&cleaned, tag);
    }
    cleaned.trim().to_string()
}

fn strip_tag_blocks(content: &str, tag: &str) -> String {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    // ASCII lowercasing keeps byte offsets aligned with `content`.
    let lowered = content.to_ascii_lowercase();

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    while let Some(start) = lowered[cursor..].find(&open).map(|i| cursor + i) {
        let search_from = start + open.len();
        let Some(end) = lowered[search_from..]
            .find(&close)
            .map(|i| search_from + i + close.len())
        else {
            break;
        };
        out.push_str(&content[cursor..start]);
        cursor = end;
    }
    out.push_str(&content[cursor..]);
    out
}
