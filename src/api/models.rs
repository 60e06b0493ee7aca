use std::error::Error;

use tracing::debug;

use crate::api::{ModelsResponse, OllamaTagsResponse};
use crate::core::providers::Provider;
use crate::utils::url::sibling_endpoint;

/// A model offered by a provider, normalized across both listing formats.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedModel {
    pub id: String,
    pub owned_by: Option<String>,
    pub size: Option<u64>,
    pub modified_at: Option<String>,
}

/// Listing URL for `provider`, derived from its configured chat endpoint.
///
/// Ollama's `/api/generate` maps to `/api/tags`; LM Studio's
/// `/v1/chat/completions` maps to `/v1/models`.
pub fn models_url(provider: Provider, endpoint: &str) -> Option<String> {
    match provider {
        Provider::Ollama => sibling_endpoint(endpoint, 1, "tags"),
        Provider::LmStudio => sibling_endpoint(endpoint, 2, "models"),
    }
}

pub async fn fetch_models(
    client: &reqwest::Client,
    provider: Provider,
    endpoint: &str,
) -> Result<Vec<ListedModel>, Box<dyn Error>> {
    let url = models_url(provider, endpoint).ok_or_else(|| {
        format!(
            "Invalid {} endpoint URL: {endpoint}",
            provider.display_name()
        )
    })?;
    debug!(%url, %provider, "fetching model list");

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("API request failed with status {status}: {error_text}").into());
    }

    let models = match provider {
        Provider::Ollama => response
            .json::<OllamaTagsResponse>()
            .await?
            .models
            .into_iter()
            .map(|model| ListedModel {
                id: model.name,
                owned_by: None,
                size: model.size,
                modified_at: model.modified_at,
            })
            .collect(),
        Provider::LmStudio => response
            .json::<ModelsResponse>()
            .await?
            .data
            .into_iter()
            .map(|model| ListedModel {
                id: model.id,
                owned_by: model.owned_by,
                size: None,
                modified_at: None,
            })
            .collect(),
    };
    Ok(models)
}

/// Sort by name, case-insensitively.
pub fn sort_models(models: &mut [ListedModel]) {
    models.sort_by(|a, b| {
        a.id.to_lowercase()
            .cmp(&b.id.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Human-readable byte count, e.g. `3.8 GB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::one_shot_server;

    #[test]
    fn listing_urls_are_siblings_of_chat_endpoints() {
        assert_eq!(
            models_url(Provider::Ollama, "http://localhost:11434/api/generate").as_deref(),
            Some("http://localhost:11434/api/tags")
        );
        assert_eq!(
            models_url(
                Provider::LmStudio,
                "http://localhost:1234/v1/chat/completions/"
            )
            .as_deref(),
            Some("http://localhost:1234/v1/models")
        );
        assert_eq!(models_url(Provider::Ollama, "not a url"), None);
    }

    #[tokio::test]
    async fn fetches_ollama_tags() {
        let (base, captured) = one_shot_server(
            "200 OK",
            r#"{"models":[{"name":"mistral:latest","size":4100000000},{"name":"llama2"}]}"#,
        )
        .await;
        let client = reqwest::Client::new();
        let models = fetch_models(&client, Provider::Ollama, &format!("{base}/api/generate"))
            .await
            .expect("models");

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].id, "mistral:latest");
        assert_eq!(models[0].size, Some(4_100_000_000));
        assert_eq!(models[1].size, None);

        let (request_line, _) = captured.await.expect("captured");
        assert!(request_line.starts_with("GET /api/tags"));
    }

    #[tokio::test]
    async fn fetches_lm_studio_models() {
        let (base, captured) = one_shot_server(
            "200 OK",
            r#"{"object":"list","data":[{"id":"qwen2.5-7b","object":"model","owned_by":"organization_owner"}]}"#,
        )
        .await;
        let client = reqwest::Client::new();
        let models = fetch_models(
            &client,
            Provider::LmStudio,
            &format!("{base}/v1/chat/completions"),
        )
        .await
        .expect("models");

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "qwen2.5-7b");
        assert_eq!(models[0].owned_by.as_deref(), Some("organization_owner"));

        let (request_line, _) = captured.await.expect("captured");
        assert!(request_line.starts_with("GET /v1/models"));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (base, _captured) = one_shot_server("404 Not Found", r#"{"error":"nope"}"#).await;
        let client = reqwest::Client::new();
        let err = fetch_models(&client, Provider::Ollama, &format!("{base}/api/generate"))
            .await
            .expect_err("should fail");
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn sorts_case_insensitively() {
        let model = |id: &str| ListedModel {
            id: id.to_string(),
            owned_by: None,
            size: None,
            modified_at: None,
        };
        let mut models = vec![model("phi3"), model("Llama3"), model("gemma")];
        sort_models(&mut models);
        let ids: Vec<_> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["gemma", "Llama3", "phi3"]);
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(4_100_000_000), "4.1 GB");
    }
}
