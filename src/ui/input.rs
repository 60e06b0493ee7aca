//! Message composer.
//!
//! Wraps a [`TextArea`] and turns key presses into [`InputEvent`]s: Enter
//! submits the trimmed text, Shift+Enter or Alt+Enter inserts a newline, and
//! every edit reports whether the field currently holds any text.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;
use tui_textarea::TextArea;

use crate::ui::theme::Theme;

const PLACEHOLDER: &str = "Type your message…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Non-blank text, already trimmed.
    Submit(String),
    /// The text changed; `true` when the field is non-empty.
    Typing(bool),
}

pub struct ChatInput {
    textarea: TextArea<'static>,
}

impl Default for ChatInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatInput {
    pub fn new() -> Self {
        Self {
            textarea: Self::fresh_textarea(),
        }
    }

    fn fresh_textarea() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(PLACEHOLDER);
        textarea
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.is_empty())
    }

    pub fn clear(&mut self) {
        self.textarea = Self::fresh_textarea();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<InputEvent> {
        match key.code {
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.textarea.insert_newline();
                Some(InputEvent::Typing(true))
            }
            KeyCode::Enter => self.submit(),
            _ => {
                if self.textarea.input(key) {
                    Some(InputEvent::Typing(!self.is_empty()))
                } else {
                    None
                }
            }
        }
    }

    /// Insert pasted text verbatim, newlines included.
    pub fn insert_text(&mut self, text: &str) -> Option<InputEvent> {
        if text.is_empty() {
            return None;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.textarea.insert_str(normalized);
        Some(InputEvent::Typing(!self.is_empty()))
    }

    /// Take the current text if it is not blank, leaving the field empty.
    pub fn submit(&mut self) -> Option<InputEvent> {
        let text = self.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let submitted = trimmed.to_string();
        self.clear();
        Some(InputEvent::Submit(submitted))
    }

    /// Rows needed to show every line of the input, clamped to `max_rows`.
    pub fn content_rows(&self, max_rows: u16) -> u16 {
        let rows = self.textarea.lines().len().max(1);
        (rows as u16).clamp(1, max_rows.max(1))
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        title: String,
        focused: bool,
        theme: &Theme,
    ) {
        let border_style = if focused {
            theme.focused_border_style
        } else {
            theme.border_style
        };
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title)
                .title_style(theme.title_style),
        );
        self.textarea.set_style(theme.input_text_style);
        self.textarea.set_placeholder_style(theme.placeholder_style);
        self.textarea
            .set_cursor_line_style(ratatui::style::Style::default());
        if focused {
            self.textarea.set_cursor_style(theme.input_cursor_style);
        } else {
            self.textarea.set_cursor_style(theme.input_text_style);
        }
        f.render_widget(&self.textarea, area);
    }
}
