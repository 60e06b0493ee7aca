//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, resolves the effective chat
//! settings and dispatches to the chat screen or a one-shot command.

pub mod model_list;
pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::core::config::{ChatSettings, Config, SettingsOverrides};
use crate::core::providers::{Provider, ProviderParseError};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_logging, LogTarget};

#[derive(Parser)]
#[command(name = "localchat", version)]
#[command(about = "A terminal chat client for local Ollama and LM Studio servers")]
#[command(
    long_about = "localchat is a full-screen terminal chat client for language models served \
locally by Ollama or LM Studio. Conversations are kept in memory for the session and can be \
switched from the sidebar.\n\n\
Environment Variables:\n\
  LOCALCHAT_PROVIDER  Provider to use (ollama or lmstudio)\n\
  LOCALCHAT_MODEL     Model name sent with every request\n\
  OLLAMA_URL          Ollama generate endpoint\n\
  LMSTUDIO_URL        LM Studio chat-completions endpoint\n\
  LOCALCHAT_LOG       Log filter directives (e.g. debug)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  Ctrl+N            Start a new conversation\n\
  Ctrl+B            Show or hide the conversation sidebar\n\
  Tab               Switch focus between input and sidebar\n\
  Up/Down/Enter/d   Navigate, open and delete conversations in the sidebar\n\
  PgUp/PgDn/Mouse   Scroll through the transcript\n\
  Ctrl+C / Ctrl+Q   Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Provider to use (ollama or lmstudio)
    #[arg(short = 'p', long, global = true, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model to use for chat
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Ollama generate endpoint
    #[arg(long, global = true, value_name = "URL")]
    pub ollama_url: Option<String>,

    /// LM Studio chat-completions endpoint
    #[arg(long, global = true, value_name = "URL")]
    pub lmstudio_url: Option<String>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message to send
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the models available from the selected provider
    Models,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Remove a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the configuration file and the effective settings
    Config,
}

impl Args {
    pub fn overrides(&self) -> Result<SettingsOverrides, ProviderParseError> {
        let provider = self
            .provider
            .as_deref()
            .map(str::parse::<Provider>)
            .transpose()?;
        Ok(SettingsOverrides {
            provider,
            model: self.model.clone(),
            ollama_url: self.ollama_url.clone(),
            lmstudio_url: self.lmstudio_url.clone(),
        })
    }

    fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Chat))
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&LogTarget::for_command(
        args.is_interactive(),
        args.log.as_deref(),
    ))?;
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let overrides = args.overrides()?;

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let value = value.join(" ");
            config.set_value(&key, &value)?;
            config.save()?;
            println!("✅ Set {key} to: {}", value.trim());
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            config.unset_value(&key)?;
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            let config = Config::load()?;
            config.print_all();
            println!();
            ChatSettings::resolve(&config, &overrides)?.print_effective();
            Ok(())
        }
        Commands::Models => {
            let config = Config::load()?;
            let settings = ChatSettings::resolve(&config, &overrides)?;
            list_models(&settings).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let settings = ChatSettings::resolve(&config, &overrides)?;
            run_say(prompt, settings).await
        }
        Commands::Chat => {
            let config = Config::load()?;
            let settings = ChatSettings::resolve(&config, &overrides)?;
            run_chat(settings, &config).await
        }
    }
}

#[cfg(test)]
mod tests;
