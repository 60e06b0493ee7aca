use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Local LLM server a message is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Ollama's single-prompt `/api/generate` endpoint.
    #[default]
    Ollama,
    /// LM Studio's OpenAI-compatible `/v1/chat/completions` endpoint.
    #[serde(rename = "lmstudio", alias = "lm-studio", alias = "lm_studio")]
    LmStudio,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Ollama, Provider::LmStudio];

    pub fn id(self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::LmStudio => "lmstudio",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Ollama => "Ollama",
            Provider::LmStudio => "LM Studio",
        }
    }

    /// Whether requests carry the whole conversation rather than only the
    /// latest prompt.
    pub fn sends_history(self) -> bool {
        matches!(self, Provider::LmStudio)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderParseError {
    input: String,
}

impl fmt::Display for ProviderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Provider::ALL.iter().map(|p| p.id()).collect();
        write!(
            f,
            "Unknown provider '{}'. Expected one of: {}",
            self.input,
            known.join(", ")
        )
    }
}

impl std::error::Error for ProviderParseError {}

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "ollama" => Ok(Provider::Ollama),
            "lmstudio" | "lm-studio" | "lm_studio" | "lm studio" => Ok(Provider::LmStudio),
            _ => Err(ProviderParseError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ids_case_insensitively() {
        assert_eq!("ollama".parse::<Provider>(), Ok(Provider::Ollama));
        assert_eq!("LMStudio".parse::<Provider>(), Ok(Provider::LmStudio));
        assert_eq!(" lm-studio ".parse::<Provider>(), Ok(Provider::LmStudio));
    }

    #[test]
    fn unknown_provider_lists_alternatives() {
        let err = "openai".parse::<Provider>().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("openai"));
        assert!(text.contains("ollama, lmstudio"));
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        #[derive(Deserialize, Serialize)]
        struct Wrapper {
            provider: Provider,
        }

        let parsed: Wrapper = toml::from_str("provider = \"lmstudio\"").expect("parse");
        assert_eq!(parsed.provider, Provider::LmStudio);
        let rendered = toml::to_string(&Wrapper {
            provider: Provider::Ollama,
        })
        .expect("serialize");
        assert!(rendered.contains("provider = \"ollama\""));
    }

    #[test]
    fn only_chat_completions_sends_history() {
        assert!(!Provider::Ollama.sends_history());
        assert!(Provider::LmStudio.sends_history());
    }
}
