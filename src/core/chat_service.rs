//! Conversation state and the message exchange.
//!
//! [`ChatService`] owns every conversation of the session and publishes the
//! current conversation's messages on a [`watch`] channel. The whole message
//! array is republished after each mutation, so subscribers only ever need the
//! latest value.
//!
//! An exchange runs in three steps so callers can release their locks while
//! the request is in flight:
//!
//! 1. [`ChatService::begin_exchange`] appends the user message and builds the
//!    outbound request.
//! 2. The caller awaits [`ChatBackend::complete`].
//! 3. [`ChatService::finish_exchange`] appends the assistant reply, or an
//!    assistant-role error message, to the conversation the exchange started
//!    in.
//!
//! [`ChatService::send_message`] performs all three in one call.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ChatMessage;
use crate::core::chat_client::{ChatBackend, ExchangeRequest, ProviderError};
use crate::core::config::ChatSettings;
use crate::core::message::{derive_title, Conversation, Message};
use crate::core::providers::Provider;

/// An exchange whose request has been built but whose reply has not yet been
/// recorded.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    pub conversation_id: String,
    pub request: ExchangeRequest,
}

pub struct ChatService {
    settings: ChatSettings,
    backend: Arc<dyn ChatBackend>,
    /// Newest first.
    conversations: Vec<Conversation>,
    current: usize,
    messages_tx: watch::Sender<Vec<Message>>,
}

impl ChatService {
    pub fn new(settings: ChatSettings, backend: Arc<dyn ChatBackend>) -> Self {
        let (messages_tx, _) = watch::channel(Vec::new());
        let mut service = Self {
            settings,
            backend,
            conversations: Vec::new(),
            current: 0,
            messages_tx,
        };
        service.create_new_conversation();
        service
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn backend(&self) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.backend)
    }

    /// Receiver that always holds the current conversation's messages.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.messages_tx.subscribe()
    }

    pub fn create_new_conversation(&mut self) -> &Conversation {
        let conversation = Conversation::new();
        debug!(id = %conversation.id, "created conversation");
        self.conversations.insert(0, conversation);
        self.current = 0;
        self.publish();
        &self.conversations[0]
    }

    pub fn current_conversation(&self) -> &Conversation {
        &self.conversations[self.current]
    }

    pub fn conversation_history(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Make the conversation with `id` current. Returns `false` when no such
    /// conversation exists.
    pub fn select_conversation(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.current = index;
                self.publish();
                true
            }
            None => false,
        }
    }

    /// Remove the conversation with `id` from the history.
    ///
    /// When it was current, the newest remaining conversation becomes current,
    /// or a fresh one is created if none remain.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let was_current = index == self.current;
        self.conversations.remove(index);
        debug!(id, "deleted conversation");

        if was_current {
            if self.conversations.is_empty() {
                self.create_new_conversation();
            } else {
                self.current = 0;
                self.publish();
            }
        } else if index < self.current {
            self.current -= 1;
        }
        true
    }

    /// Send `content` to the configured provider and record the reply.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the returned
    /// message is the assistant turn that was appended, which carries the
    /// error text when the request failed.
    pub async fn send_message(&mut self, content: &str) -> Option<Message> {
        self.send_message_with(content, None).await
    }

    pub async fn send_message_with(
        &mut self,
        content: &str,
        provider: Option<Provider>,
    ) -> Option<Message> {
        let pending = self.begin_exchange(content, provider)?;
        let backend = self.backend();
        let result = backend.complete(&pending.request).await;
        self.finish_exchange(pending, result)
    }

    /// Append the user message for `content` to the current conversation and
    /// build the request for it. Returns `None` for blank input.
    pub fn begin_exchange(
        &mut self,
        content: &str,
        provider: Option<Provider>,
    ) -> Option<PendingExchange> {
        if content.trim().is_empty() {
            return None;
        }
        let provider = provider.unwrap_or(self.settings.provider);

        let conversation = &mut self.conversations[self.current];
        conversation.push(Message::user(content));
        let conversation_id = conversation.id.clone();

        let history = if provider.sends_history() {
            conversation
                .messages
                .iter()
                .map(|message| ChatMessage {
                    role: message.role.as_str().to_string(),
                    content: message.content.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let request = ExchangeRequest {
            provider,
            endpoint: self.settings.endpoint_for(provider).to_string(),
            model: self.settings.model.clone(),
            prompt: content.to_string(),
            history,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        self.publish();

        Some(PendingExchange {
            conversation_id,
            request,
        })
    }

    /// Record the outcome of `pending` in the conversation it started in.
    ///
    /// Only the current conversation is republished. Returns `None` when the
    /// originating conversation was deleted in the meantime.
    pub fn finish_exchange(
        &mut self,
        pending: PendingExchange,
        result: Result<String, ProviderError>,
    ) -> Option<Message> {
        let Some(index) = self.position(&pending.conversation_id) else {
            warn!(
                conversation = %pending.conversation_id,
                "dropping reply for a deleted conversation"
            );
            return None;
        };
        let conversation = &mut self.conversations[index];

        let message = match result {
            Ok(text) => {
                let message = Message::assistant(text);
                conversation.push(message.clone());
                if conversation.messages.len() == 2 {
                    conversation.title = derive_title(&pending.request.prompt);
                    info!(title = %conversation.title, "titled conversation");
                }
                message
            }
            Err(err) => {
                warn!(
                    provider = %pending.request.provider,
                    error = %err,
                    "chat request failed"
                );
                let message = Message::assistant(err.transcript_message());
                conversation.push(message.clone());
                message
            }
        };

        if index == self.current {
            self.publish();
        }
        Some(message)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.conversations.iter().position(|c| c.id == id)
    }

    fn publish(&self) {
        self.messages_tx
            .send_replace(self.conversations[self.current].messages.clone());
    }
}
