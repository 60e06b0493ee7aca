//! Model listing functionality
//!
//! Lists the models the selected provider reports as installed or loaded.

use std::error::Error;
use std::time::Duration;

use crate::api::models::{fetch_models, format_size, sort_models, ListedModel};
use crate::core::config::ChatSettings;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn list_models(settings: &ChatSettings) -> Result<(), Box<dyn Error>> {
    let provider = settings.provider;
    let endpoint = settings.endpoint_for(provider);

    println!("🤖 Available Models for {}", provider.display_name());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("🎯 Configured model: {}", settings.model);
    println!();

    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    let mut models = fetch_models(&client, provider, endpoint)
        .await
        .map_err(|e| format!("Could not list models from {endpoint}: {e}"))?;

    if models.is_empty() {
        println!("No models found for this provider.");
        return Ok(());
    }

    sort_models(&mut models);
    println!("Found {} models:", models.len());
    println!();
    for line in describe_models(&models, &settings.model) {
        println!("{line}");
    }
    Ok(())
}

fn describe_models(models: &[ListedModel], current: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for model in models {
        if model.id == current {
            lines.push(format!("  • {} (configured)", model.id));
        } else {
            lines.push(format!("  • {}", model.id));
        }
        if let Some(size) = model.size {
            lines.push(format!("    Size: {}", format_size(size)));
        }
        if let Some(modified) = model.modified_at.as_deref().filter(|m| !m.is_empty()) {
            lines.push(format!("    Modified: {modified}"));
        }
        if let Some(owner) = model
            .owned_by
            .as_deref()
            .filter(|o| !o.is_empty() && *o != "system")
        {
            lines.push(format!("    Owner: {owner}"));
        }
        lines.push(String::new());
    }
    lines
}
