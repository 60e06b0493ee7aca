pub mod app;
pub mod chat_client;
pub mod chat_service;
pub mod config;
pub mod message;
pub mod providers;
pub mod text_wrapping;
