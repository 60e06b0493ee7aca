use super::*;
use crate::core::message::{Role, DEFAULT_CONVERSATION_TITLE};
use crate::utils::test_utils::{
    create_test_app, create_test_app_with, server_error, ScriptedBackend,
};
use ratatui::crossterm::event::KeyEventState;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

fn submit(app: &mut App, text: &str) -> PendingExchange {
    type_text(app, text);
    match app.handle_key(key(KeyCode::Enter)) {
        KeyOutcome::Send(pending) => pending,
        other => panic!("expected a send, got {other:?}"),
    }
}

#[test]
fn enter_starts_exchange_and_shows_user_message() {
    let mut app = create_test_app();
    let pending = submit(&mut app, "Hello");

    assert!(app.is_loading());
    assert_eq!(pending.request.prompt, "Hello");
    assert_eq!(app.messages.len(), 1);
    assert_eq!(app.messages[0].role, Role::User);
    assert!(app.input.is_empty());
}

#[test]
fn blank_input_does_not_send() {
    let mut app = create_test_app();
    type_text(&mut app, "   ");
    assert!(matches!(
        app.handle_key(key(KeyCode::Enter)),
        KeyOutcome::Ignored
    ));
    assert!(app.messages.is_empty());
    assert!(!app.is_loading());
}

#[test]
fn enter_while_pending_keeps_text_and_shows_hint() {
    let mut app = create_test_app();
    submit(&mut app, "first");
    type_text(&mut app, "second");

    assert!(matches!(
        app.handle_key(key(KeyCode::Enter)),
        KeyOutcome::Handled
    ));
    assert_eq!(app.input.text(), "second");
    assert_eq!(app.status.as_deref(), Some(PENDING_HINT));
    assert_eq!(app.messages.len(), 1);
}

#[test]
fn finished_exchange_publishes_reply_and_title() {
    let mut app = create_test_app();
    let pending = submit(&mut app, "What is Rust?");
    app.on_exchange_finished(pending, Ok("A language.".to_string()));

    assert!(!app.is_loading());
    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.messages[1].content, "A language.");
    assert_eq!(app.service.current_conversation().title, "What is Rust?");
    assert!(app.title().starts_with("What is Rust? • Ollama (test-model)"));
}

#[test]
fn failed_exchange_shows_error_turn() {
    let mut app = create_test_app();
    let pending = submit(&mut app, "hi");
    app.on_exchange_finished(pending, Err(server_error()));

    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.messages[1].role, Role::Assistant);
    assert!(app.messages[1].content.contains("Server error"));
    assert_eq!(
        app.service.current_conversation().title,
        DEFAULT_CONVERSATION_TITLE
    );
}

#[test]
fn typing_tracks_input_state() {
    let mut app = create_test_app();
    type_text(&mut app, "a");
    assert!(app.is_typing);
    app.handle_key(key(KeyCode::Backspace));
    assert!(!app.is_typing);
}

#[test]
fn ctrl_n_creates_and_selects_new_conversation() {
    let mut app = create_test_app();
    let pending = submit(&mut app, "hi");
    app.on_exchange_finished(pending, Ok("hello".into()));

    app.handle_key(ctrl('n'));
    assert_eq!(app.service.conversation_history().len(), 2);
    assert!(app.messages.is_empty());
    assert_eq!(app.current_conversation_index(), 0);
}

#[test]
fn reply_for_other_conversation_is_not_shown() {
    let mut app = create_test_app();
    let pending = submit(&mut app, "slow question");
    app.handle_key(ctrl('n'));
    assert!(app.messages.is_empty());

    app.on_exchange_finished(pending, Ok("late answer".into()));
    assert!(app.messages.is_empty());

    // The reply landed in the older conversation.
    app.select_conversation(1);
    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.messages[1].content, "late answer");
}

#[test]
fn sidebar_navigation_selects_conversation() {
    let mut app = create_test_app();
    let pending = submit(&mut app, "first chat");
    app.on_exchange_finished(pending, Ok("ok".into()));
    app.handle_key(ctrl('n'));

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Sidebar);
    assert_eq!(app.sidebar_selected, 0);

    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.sidebar_selected, 1);

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.focus, Focus::Input);
    assert_eq!(app.service.current_conversation().title, "first chat");
    assert_eq!(app.messages.len(), 2);
}

#[test]
fn deleting_current_conversation_falls_back() {
    let mut app = create_test_app();
    let pending = submit(&mut app, "keep me");
    app.on_exchange_finished(pending, Ok("ok".into()));
    app.handle_key(ctrl('n'));

    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Char('d')));

    assert_eq!(app.service.conversation_history().len(), 1);
    assert_eq!(app.service.current_conversation().title, "keep me");
    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.sidebar_selected, 0);
}

#[test]
fn deleting_last_conversation_creates_fresh_one() {
    let mut app = create_test_app();
    let original = app.service.current_conversation().id.clone();
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Delete));

    assert_eq!(app.service.conversation_history().len(), 1);
    assert_ne!(app.service.current_conversation().id, original);
    assert!(app.messages.is_empty());
}

#[test]
fn ctrl_b_toggles_sidebar_and_returns_focus() {
    let mut app = create_test_app();
    assert!(app.sidebar_open);
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(ctrl('b'));
    assert!(!app.sidebar_open);
    assert_eq!(app.focus, Focus::Input);

    // Tab reopens the sidebar.
    app.handle_key(key(KeyCode::Tab));
    assert!(app.sidebar_open);
    assert_eq!(app.focus, Focus::Sidebar);
}

#[test]
fn quit_keys_request_exit() {
    let mut app = create_test_app();
    assert!(matches!(app.handle_key(ctrl('q')), KeyOutcome::Quit));
    assert!(app.exit_requested);

    let mut app = create_test_app();
    let ctrl_c = KeyEvent {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        kind: ratatui::crossterm::event::KeyEventKind::Press,
        state: KeyEventState::NONE,
    };
    assert!(matches!(app.handle_key(ctrl_c), KeyOutcome::Quit));
}

#[test]
fn paste_focuses_input() {
    let mut app = create_test_app();
    app.handle_key(key(KeyCode::Tab));
    app.handle_paste("line one\nline two");
    assert_eq!(app.focus, Focus::Input);
    assert_eq!(app.input.text(), "line one\nline two");
    assert!(app.is_typing);
}

#[tokio::test]
async fn pending_exchange_runs_against_backend() {
    let backend = ScriptedBackend::with(vec![Ok("pong".into())]);
    let mut app = create_test_app_with(backend.clone());
    let pending = submit(&mut app, "ping");

    let result = app.service.backend().complete(&pending.request).await;
    app.on_exchange_finished(pending, result);

    assert_eq!(backend.requests().len(), 1);
    assert_eq!(app.messages[1].content, "pong");
}
