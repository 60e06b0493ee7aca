//! Effective chat settings.
//!
//! Values are resolved once at startup with the precedence
//! command line > environment > config file > built-in default.

use tracing::warn;

use crate::core::config::data::{
    is_valid_max_tokens, is_valid_temperature, Config, DEFAULT_LMSTUDIO_URL,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_TEMPERATURE,
};
use crate::core::providers::{Provider, ProviderParseError};

pub const ENV_PROVIDER: &str = "LOCALCHAT_PROVIDER";
pub const ENV_MODEL: &str = "LOCALCHAT_MODEL";
pub const ENV_OLLAMA_URL: &str = "OLLAMA_URL";
pub const ENV_LMSTUDIO_URL: &str = "LMSTUDIO_URL";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub ollama_url: Option<String>,
    pub lmstudio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub provider: Provider,
    pub model: String,
    pub ollama_url: String,
    pub lmstudio_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: DEFAULT_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            lmstudio_url: DEFAULT_LMSTUDIO_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ChatSettings {
    /// Resolve settings from the process environment.
    pub fn resolve(
        config: &Config,
        overrides: &SettingsOverrides,
    ) -> Result<Self, ProviderParseError> {
        Self::resolve_with_env(config, overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve_with_env<F>(
        config: &Config,
        overrides: &SettingsOverrides,
        env: F,
    ) -> Result<Self, ProviderParseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let provider = match overrides.provider {
            Some(provider) => provider,
            None => match env(ENV_PROVIDER) {
                Some(value) => value.parse()?,
                None => config.default_provider.unwrap_or_default(),
            },
        };

        let model = overrides
            .model
            .clone()
            .or_else(|| env(ENV_MODEL))
            .or_else(|| config.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let ollama_url = overrides
            .ollama_url
            .clone()
            .or_else(|| env(ENV_OLLAMA_URL))
            .or_else(|| config.ollama_url.clone())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        let lmstudio_url = overrides
            .lmstudio_url
            .clone()
            .or_else(|| env(ENV_LMSTUDIO_URL))
            .or_else(|| config.lmstudio_url.clone())
            .unwrap_or_else(|| DEFAULT_LMSTUDIO_URL.to_string());

        // Hand-edited files bypass `set`; out-of-range values fall back.
        let temperature = match config.temperature {
            Some(value) if is_valid_temperature(value) => value,
            Some(value) => {
                warn!(value, "ignoring out-of-range temperature from config");
                DEFAULT_TEMPERATURE
            }
            None => DEFAULT_TEMPERATURE,
        };
        let max_tokens = match config.max_tokens {
            Some(value) if is_valid_max_tokens(value) => value,
            Some(value) => {
                warn!(value, "ignoring non-positive max_tokens from config");
                DEFAULT_MAX_TOKENS
            }
            None => DEFAULT_MAX_TOKENS,
        };

        Ok(Self {
            provider,
            model,
            ollama_url,
            lmstudio_url,
            temperature,
            max_tokens,
        })
    }

    pub fn endpoint_for(&self, provider: Provider) -> &str {
        match provider {
            Provider::Ollama => &self.ollama_url,
            Provider::LmStudio => &self.lmstudio_url,
        }
    }
}
