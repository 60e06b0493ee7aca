//! TUI-less "say" command

use std::error::Error;
use std::sync::Arc;

use crate::core::chat_client::HttpChatBackend;
use crate::core::chat_service::ChatService;
use crate::core::config::ChatSettings;

pub async fn run_say(prompt: Vec<String>, settings: ChatSettings) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err("Usage: localchat say <prompt>".into());
    }

    let backend = Arc::new(HttpChatBackend::new(reqwest::Client::new()));
    let mut service = ChatService::new(settings, backend);
    let reply = exchange_once(&mut service, &prompt).await?;
    println!("{reply}");
    Ok(())
}

/// Run one exchange through `service`.
///
/// On failure the error turn is printed to stderr and the provider error is
/// returned, so the process exits non-zero.
pub(crate) async fn exchange_once(
    service: &mut ChatService,
    prompt: &str,
) -> Result<String, Box<dyn Error>> {
    let pending = service
        .begin_exchange(prompt, None)
        .ok_or("Nothing to send")?;
    let result = service.backend().complete(&pending.request).await;
    let failure = result.as_ref().err().cloned();

    let message = service
        .finish_exchange(pending, result)
        .ok_or("Conversation closed before the reply arrived")?;

    match failure {
        Some(err) => {
            eprintln!("{}", message.content);
            Err(Box::new(err))
        }
        None => Ok(message.content),
    }
}
