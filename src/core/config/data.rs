use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::config::io::ConfigError;
use crate::core::providers::Provider;

pub const DEFAULT_MODEL: &str = "llama2";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_LMSTUDIO_URL: &str = "http://localhost:1234/v1/chat/completions";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Keys accepted by `localchat set` / `localchat unset`.
pub const CONFIG_KEYS: [&str; 8] = [
    "default-provider",
    "default-model",
    "ollama-url",
    "lmstudio-url",
    "temperature",
    "max-tokens",
    "theme",
    "sidebar",
];

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Provider used when `-p` is not given
    pub default_provider: Option<Provider>,
    /// Model name sent with every request
    pub default_model: Option<String>,
    /// Full URL of Ollama's generate endpoint
    pub ollama_url: Option<String>,
    /// Full URL of LM Studio's chat-completions endpoint
    pub lmstudio_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
    /// Whether the conversation sidebar starts open
    pub sidebar: Option<bool>,
}

impl Config {
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };
        if value.is_empty() {
            return Err(invalid("value must not be empty".to_string()));
        }

        match key {
            "default-provider" => {
                self.default_provider =
                    Some(value.parse().map_err(|e: crate::core::providers::ProviderParseError| {
                        invalid(e.to_string())
                    })?);
            }
            "default-model" => self.default_model = Some(value.to_string()),
            "ollama-url" => self.ollama_url = Some(value.to_string()),
            "lmstudio-url" => self.lmstudio_url = Some(value.to_string()),
            "temperature" => {
                let parsed: f32 = value
                    .parse()
                    .map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?;
                if !is_valid_temperature(parsed) {
                    return Err(invalid("expected a number between 0 and 2".to_string()));
                }
                self.temperature = Some(parsed);
            }
            "max-tokens" => {
                let parsed: u32 = value
                    .parse()
                    .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
                if !is_valid_max_tokens(parsed) {
                    return Err(invalid("expected a positive integer".to_string()));
                }
                self.max_tokens = Some(parsed);
            }
            "theme" => {
                let normalized = value.to_ascii_lowercase();
                if normalized != "dark" && normalized != "light" {
                    return Err(invalid("expected 'dark' or 'light'".to_string()));
                }
                self.theme = Some(normalized);
            }
            "sidebar" => {
                self.sidebar = Some(parse_bool(value).ok_or_else(|| {
                    invalid("expected on/off, true/false or yes/no".to_string())
                })?);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "default-provider" => self.default_provider = None,
            "default-model" => self.default_model = None,
            "ollama-url" => self.ollama_url = None,
            "lmstudio-url" => self.lmstudio_url = None,
            "temperature" => self.temperature = None,
            "max-tokens" => self.max_tokens = None,
            "theme" => self.theme = None,
            "sidebar" => self.sidebar = None,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

/// Sampling temperatures accepted by the chat-completions provider.
pub fn is_valid_temperature(value: f32) -> bool {
    (0.0..=2.0).contains(&value)
}

pub fn is_valid_max_tokens(value: u32) -> bool {
    value > 0
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
