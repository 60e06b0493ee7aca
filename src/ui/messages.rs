//! Transcript pane.
//!
//! Lines are pre-wrapped to the pane width before rendering, so the number of
//! visual rows is known exactly and the view can pin itself to the bottom
//! whenever the message list changes.

use std::time::Duration;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::message::{Message, Role};
use crate::core::text_wrapping::wrap_text;
use crate::ui::theme::Theme;

const EMPTY_PLACEHOLDER: &str = "Start a conversation by typing a message below.";

/// Scroll state of the transcript pane.
#[derive(Debug, Clone)]
pub struct MessagesView {
    scroll_offset: u16,
    max_offset: u16,
    viewport_height: u16,
    should_scroll: bool,
}

impl Default for MessagesView {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagesView {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            max_offset: 0,
            viewport_height: 0,
            // The first render starts at the bottom.
            should_scroll: true,
        }
    }

    /// Request a jump to the bottom on the next render.
    pub fn mark_changed(&mut self) {
        self.should_scroll = true;
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows).min(self.max_offset);
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_rows());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_rows());
    }

    fn page_rows(&self) -> u16 {
        self.viewport_height.saturating_sub(1).max(1)
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        messages: &[Message],
        loading: Option<Duration>,
        title: String,
        theme: &Theme,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style)
            .title(title)
            .title_style(theme.title_style);
        let inner = block.inner(area);

        let lines = build_lines(messages, loading, inner.width, theme);
        self.update_bounds(lines.len(), inner.height);

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((self.scroll_offset, 0));
        f.render_widget(paragraph, area);
    }

    fn update_bounds(&mut self, total_rows: usize, viewport_height: u16) {
        let total = u16::try_from(total_rows).unwrap_or(u16::MAX);
        self.viewport_height = viewport_height;
        self.max_offset = total.saturating_sub(viewport_height);
        if self.should_scroll {
            self.scroll_offset = self.max_offset;
            self.should_scroll = false;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_offset);
        }
    }
}

/// Build the wrapped transcript for a pane `width` columns wide.
///
/// `loading` is the time since the pending request started, if any.
pub fn build_lines(
    messages: &[Message],
    loading: Option<Duration>,
    width: u16,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let width = width as usize;
    let mut lines = Vec::new();

    if messages.is_empty() && loading.is_none() {
        for row in wrap_text(EMPTY_PLACEHOLDER, width) {
            lines.push(Line::from(Span::styled(row, theme.placeholder_style)));
        }
        return lines;
    }

    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        let (label, label_style, text_style) = match message.role {
            Role::User => ("You", theme.user_prefix_style, theme.user_text_style),
            Role::Assistant => (
                "Assistant",
                theme.assistant_prefix_style,
                theme.assistant_text_style,
            ),
        };
        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::raw(" "),
            Span::styled(
                message.timestamp.format("%H:%M").to_string(),
                theme.timestamp_style,
            ),
        ]));
        for row in wrap_text(&message.content, width) {
            lines.push(Line::from(Span::styled(row, text_style)));
        }
    }

    if let Some(elapsed) = loading {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled("Assistant", theme.assistant_prefix_style),
            Span::raw(" "),
            Span::styled(
                format!("is thinking {}", pulse_symbol(elapsed)),
                theme.loading_indicator_style,
            ),
        ]));
    }

    lines
}

/// Pulse glyph cycling twice per second.
pub fn pulse_symbol(elapsed: Duration) -> &'static str {
    let phase = (elapsed.as_secs_f32() * 2.0) % 2.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}
