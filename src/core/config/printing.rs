use crate::core::config::data::{path_display, Config};
use crate::core::config::settings::ChatSettings;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        if let Ok(path) = Self::get_config_path() {
            println!("  file: {}", path_display(path));
        }
        print_optional("default-provider", self.default_provider.map(|p| p.to_string()));
        print_optional("default-model", self.default_model.clone());
        print_optional("ollama-url", self.ollama_url.clone());
        print_optional("lmstudio-url", self.lmstudio_url.clone());
        print_optional("temperature", self.temperature.map(|t| t.to_string()));
        print_optional("max-tokens", self.max_tokens.map(|t| t.to_string()));
        print_optional("theme", self.theme.clone());
        match self.sidebar.unwrap_or(true) {
            true => println!("  sidebar: on"),
            false => println!("  sidebar: off"),
        }
    }
}

impl ChatSettings {
    pub fn print_effective(&self) {
        println!("Effective settings:");
        println!("  provider: {} ({})", self.provider, self.provider.display_name());
        println!("  model: {}", self.model);
        println!("  ollama-url: {}", self.ollama_url);
        println!("  lmstudio-url: {}", self.lmstudio_url);
        println!("  temperature: {}", self.temperature);
        println!("  max-tokens: {}", self.max_tokens);
    }
}

fn print_optional(key: &str, value: Option<String>) {
    match value {
        Some(value) => println!("  {key}: {value}"),
        None => println!("  {key}: (unset)"),
    }
}
