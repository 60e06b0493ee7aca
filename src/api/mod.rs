//! Wire payloads for the two local provider APIs.
//!
//! Ollama is addressed through its single-prompt generate endpoint, LM Studio
//! through the OpenAI-compatible chat-completions endpoint.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponseChoice {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub message: Option<ChatResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatResponseChoice>,
}

/// Entry from LM Studio's `/v1/models`.
#[derive(Deserialize, Debug)]
pub struct ModelInfo {
    pub id: String,
    pub created: Option<u64>,
    pub owned_by: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ModelsResponse {
    pub data: Vec<ModelInfo>,
}

/// Entry from Ollama's `/api/tags`.
#[derive(Deserialize, Debug)]
pub struct OllamaModel {
    pub name: String,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Deserialize, Debug)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModel>,
}

pub mod models;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_disables_streaming() {
        let request = GenerateRequest {
            model: "llama2".to_string(),
            prompt: "hi".to_string(),
            stream: false,
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"model": "llama2", "prompt": "hi", "stream": false})
        );
    }

    #[test]
    fn chat_response_tolerates_missing_fields() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
                .expect("parse");
        let content = parsed.choices[0]
            .message
            .as_ref()
            .and_then(|m| m.content.as_deref());
        assert_eq!(content, Some("ok"));

        let empty: ChatResponse = serde_json::from_str("{}").expect("parse");
        assert!(empty.choices.is_empty());
    }

    #[test]
    fn generate_response_without_text_defaults_to_none() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"model":"llama2","done":true}"#).expect("parse");
        assert!(parsed.done);
        assert!(parsed.response.is_none());
    }
}
