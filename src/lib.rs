//! localchat is a terminal chat client for language models served locally by
//! Ollama or LM Studio.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state, the chat service that performs
//!   exchanges, provider selection and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the wire payloads of both provider APIs and the model
//!   listing calls.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves settings and dispatches into
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
