//! Application state for the chat screen.
//!
//! [`App`] owns the [`ChatService`] and mirrors the latest published message
//! list from it. Key handling lives here so the event loop only has to route
//! events and carry out the returned [`KeyOutcome`].

use std::time::{Duration, Instant};

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::watch;

use crate::core::chat_client::ProviderError;
use crate::core::chat_service::{ChatService, PendingExchange};
use crate::core::message::Message;
use crate::ui::input::{ChatInput, InputEvent};
use crate::ui::messages::MessagesView;
use crate::ui::theme::Theme;

pub mod conversation;

const MOUSE_SCROLL_ROWS: u16 = 3;
pub const PENDING_HINT: &str = "Waiting for the current reply…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

/// What the event loop should do after a key press.
#[derive(Debug)]
pub enum KeyOutcome {
    Handled,
    Ignored,
    Send(PendingExchange),
    Quit,
}

pub struct App {
    pub service: ChatService,
    /// Latest list published by the service.
    pub messages: Vec<Message>,
    messages_rx: watch::Receiver<Vec<Message>>,
    pub loading_since: Option<Instant>,
    pub sidebar_open: bool,
    pub sidebar_selected: usize,
    pub focus: Focus,
    pub input: ChatInput,
    pub messages_view: MessagesView,
    pub theme: Theme,
    pub status: Option<String>,
    pub is_typing: bool,
    pub exit_requested: bool,
}

impl App {
    pub fn new(service: ChatService, theme: Theme, sidebar_open: bool) -> Self {
        let messages_rx = service.subscribe();
        let messages = messages_rx.borrow().clone();
        Self {
            service,
            messages,
            messages_rx,
            loading_since: None,
            sidebar_open,
            sidebar_selected: 0,
            focus: Focus::Input,
            input: ChatInput::new(),
            messages_view: MessagesView::new(),
            theme,
            status: None,
            is_typing: false,
            exit_requested: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading_since.is_some()
    }

    pub fn loading_elapsed(&self) -> Option<Duration> {
        self.loading_since.map(|start| start.elapsed())
    }

    /// Pull the newest published list, if any. Returns `true` when the
    /// transcript changed.
    pub fn sync_messages(&mut self) -> bool {
        if !self.messages_rx.has_changed().unwrap_or(false) {
            return false;
        }
        self.messages = self.messages_rx.borrow_and_update().clone();
        self.messages_view.mark_changed();
        true
    }

    /// Start an exchange for submitted text. Returns `None` for blank text or
    /// while another exchange is pending.
    pub fn on_send_message(&mut self, text: &str) -> Option<PendingExchange> {
        if text.trim().is_empty() {
            return None;
        }
        if self.is_loading() {
            self.status = Some(PENDING_HINT.to_string());
            return None;
        }
        let pending = self.service.begin_exchange(text, None)?;
        self.loading_since = Some(Instant::now());
        self.status = None;
        self.is_typing = false;
        self.sync_messages();
        Some(pending)
    }

    pub fn on_exchange_finished(
        &mut self,
        pending: PendingExchange,
        result: Result<String, ProviderError>,
    ) {
        self.loading_since = None;
        self.service.finish_exchange(pending, result);
        self.clamp_sidebar_selection();
        self.sync_messages();
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.request_exit();
                return KeyOutcome::Quit;
            }
            KeyCode::Char('n') if ctrl => {
                self.create_conversation();
                return KeyOutcome::Handled;
            }
            KeyCode::Char('b') if ctrl => {
                self.toggle_sidebar();
                return KeyOutcome::Handled;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_focus();
                return KeyOutcome::Handled;
            }
            KeyCode::PageUp => {
                self.messages_view.page_up();
                return KeyOutcome::Handled;
            }
            KeyCode::PageDown => {
                self.messages_view.page_down();
                return KeyOutcome::Handled;
            }
            _ => {}
        }

        match self.focus {
            Focus::Sidebar => self.handle_sidebar_key(key),
            Focus::Input => self.handle_input_key(key),
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Up => self.move_sidebar_selection(-1),
            KeyCode::Down => self.move_sidebar_selection(1),
            KeyCode::Enter => {
                self.select_conversation(self.sidebar_selected);
                self.focus = Focus::Input;
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                self.delete_conversation(self.sidebar_selected);
            }
            KeyCode::Esc => self.focus = Focus::Input,
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let plain_enter = key.code == KeyCode::Enter
            && !key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
        if plain_enter && self.is_loading() {
            // Leave the text in the field until the reply arrives.
            self.status = Some(PENDING_HINT.to_string());
            return KeyOutcome::Handled;
        }

        let single_line = !self.input.text().contains('\n');
        match key.code {
            KeyCode::Up if single_line => {
                self.messages_view.scroll_up(1);
                return KeyOutcome::Handled;
            }
            KeyCode::Down if single_line => {
                self.messages_view.scroll_down(1);
                return KeyOutcome::Handled;
            }
            _ => {}
        }

        match self.input.handle_key(key) {
            Some(InputEvent::Submit(text)) => match self.on_send_message(&text) {
                Some(pending) => KeyOutcome::Send(pending),
                None => KeyOutcome::Handled,
            },
            Some(InputEvent::Typing(typing)) => {
                self.on_typing(typing);
                KeyOutcome::Handled
            }
            None => KeyOutcome::Ignored,
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.focus = Focus::Input;
        if let Some(InputEvent::Typing(typing)) = self.input.insert_text(text) {
            self.on_typing(typing);
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::ScrollUp => self.messages_view.scroll_up(MOUSE_SCROLL_ROWS),
            MouseEventKind::ScrollDown => self.messages_view.scroll_down(MOUSE_SCROLL_ROWS),
            _ => return false,
        }
        true
    }

    fn on_typing(&mut self, typing: bool) {
        self.is_typing = typing;
        if !self.is_loading() {
            self.status = None;
        }
    }

    /// Header text: current conversation, provider and model.
    pub fn title(&self) -> String {
        let settings = self.service.settings();
        format!(
            "{} • {} ({})",
            self.service.current_conversation().title,
            settings.provider.display_name(),
            settings.model
        )
    }
}

#[cfg(test)]
mod tests;
