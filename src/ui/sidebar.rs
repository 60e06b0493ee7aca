use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::core::message::Conversation;
use crate::ui::theme::Theme;

pub const SIDEBAR_WIDTH: u16 = 30;

/// Conversation list, newest first. The current conversation is marked and
/// `selected` is highlighted while the sidebar has focus.
pub fn render_sidebar(
    f: &mut Frame,
    area: Rect,
    conversations: &[Conversation],
    current: usize,
    selected: usize,
    focused: bool,
    theme: &Theme,
) {
    let items: Vec<ListItem> = conversations
        .iter()
        .enumerate()
        .map(|(i, conversation)| {
            let (marker, style) = if i == current {
                ("▸ ", theme.sidebar_current_style)
            } else {
                ("  ", theme.sidebar_item_style)
            };
            let stamp = conversation.updated_at.format("%H:%M").to_string();
            ListItem::new(vec![
                Line::from(Span::styled(format!("{marker}{}", conversation.title), style)),
                Line::from(Span::styled(format!("  {stamp}"), theme.timestamp_style)),
            ])
        })
        .collect();

    let border_style = if focused {
        theme.focused_border_style
    } else {
        theme.border_style
    };
    let mut list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Conversations")
            .title_style(theme.title_style),
    );
    if focused {
        list = list.highlight_style(theme.sidebar_highlight_style);
    }

    let mut state = ListState::default();
    state.select(Some(selected.min(conversations.len().saturating_sub(1))));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn marks_current_conversation() {
        let mut first = Conversation::new();
        first.title = "Rust questions".to_string();
        let second = Conversation::new();
        let conversations = vec![second, first];
        let theme = Theme::dark_default();

        let mut terminal = Terminal::new(TestBackend::new(SIDEBAR_WIDTH, 8)).expect("terminal");
        terminal
            .draw(|f| render_sidebar(f, f.area(), &conversations, 1, 1, false, &theme))
            .expect("draw");

        assert!(row_text(&terminal, 0).contains("Conversations"));
        assert!(row_text(&terminal, 1).contains("  New Conversation"));
        assert!(row_text(&terminal, 3).contains("▸ Rust questions"));
    }
}
