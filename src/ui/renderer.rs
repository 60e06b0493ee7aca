use crate::core::app::{App, Focus};
use crate::ui::sidebar::{render_sidebar, SIDEBAR_WIDTH};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

const MAX_INPUT_ROWS: u16 = 6;
const KEY_HINTS: &str =
    "Enter send • Alt+Enter newline • Ctrl+N new • Ctrl+B sidebar • Tab focus • Ctrl+Q quit";

pub fn ui(f: &mut Frame, app: &mut App) {
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        f.area(),
    );

    let main_area = if app.sidebar_open {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(f.area());
        render_sidebar(
            f,
            columns[0],
            app.service.conversation_history(),
            app.current_conversation_index(),
            app.sidebar_selected,
            app.focus == Focus::Sidebar,
            &app.theme,
        );
        columns[1]
    } else {
        f.area()
    };

    let input_rows = app.input.content_rows(MAX_INPUT_ROWS);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(input_rows + 2), // +2 for borders
        ])
        .split(main_area);

    let title = app.title();
    let loading = app.loading_elapsed();
    app.messages_view
        .render(f, chunks[0], &app.messages, loading, title, &app.theme);

    let status = match &app.status {
        Some(status) => Line::from(Span::styled(status.clone(), app.theme.status_style)),
        None => Line::from(Span::styled(KEY_HINTS, app.theme.timestamp_style)),
    };
    f.render_widget(Paragraph::new(status), chunks[1]);

    let input_title = if app.is_loading() {
        "Message (waiting for reply)".to_string()
    } else {
        "Message".to_string()
    };
    let focused = app.focus == Focus::Input;
    app.input
        .render(f, chunks[2], input_title, focused, &app.theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::PENDING_HINT;
    use crate::utils::test_utils::create_test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn draws_sidebar_transcript_and_input() {
        let mut app = create_test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        terminal.draw(|f| ui(f, &mut app)).expect("draw");

        let rows = screen(&terminal);
        assert!(rows[0].contains("Conversations"));
        assert!(rows[0].contains("New Conversation • Ollama (test-model)"));
        assert!(rows
            .iter()
            .any(|row| row.contains("Start a conversation by typing a message below.")));
        assert!(rows[17].contains("Message"));
    }

    #[test]
    fn hidden_sidebar_gives_transcript_full_width() {
        let mut app = create_test_app();
        app.toggle_sidebar();
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).expect("terminal");
        terminal.draw(|f| ui(f, &mut app)).expect("draw");

        let rows = screen(&terminal);
        assert!(!rows[0].contains("Conversations"));
        assert!(rows[0].starts_with("┌New Conversation"));
    }

    #[test]
    fn status_replaces_key_hints() {
        let mut app = create_test_app();
        app.status = Some(PENDING_HINT.to_string());
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).expect("terminal");
        terminal.draw(|f| ui(f, &mut app)).expect("draw");

        let rows = screen(&terminal);
        assert!(rows[8].contains(PENDING_HINT));
    }
}
