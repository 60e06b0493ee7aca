use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::AppHandle;
use crate::core::app::{App, KeyOutcome};
use crate::core::chat_client::{ChatBackend, HttpChatBackend, ProviderError};
use crate::core::chat_service::{ChatService, PendingExchange};
use crate::core::config::{ChatSettings, Config};
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

type ExchangeOutcome = (PendingExchange, Result<String, ProviderError>);

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.exit_requested).await
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    app.update(|app| terminal_guard.draw(|f| ui(f, app)).map(|_| ()))
        .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

struct EventProcessingOutcome {
    events_processed: bool,
    exit_requested: bool,
}

async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    exchange_tx: &mpsc::UnboundedSender<ExchangeOutcome>,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        events_processed: false,
        exit_requested: false,
    };

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                match app.update(|app| app.handle_key(key)).await {
                    KeyOutcome::Send(pending) => {
                        let backend = app.read(|app| app.service.backend()).await;
                        spawn_exchange(backend, pending, exchange_tx.clone());
                    }
                    KeyOutcome::Quit => {
                        outcome.exit_requested = true;
                        break;
                    }
                    KeyOutcome::Handled | KeyOutcome::Ignored => {}
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                let sanitized = sanitize_pasted_text(&text);
                if !sanitized.is_empty() {
                    app.update(|app| app.handle_paste(&sanitized)).await;
                }
            }
            UiEvent::Crossterm(Event::Mouse(mouse)) => {
                app.update(|app| app.handle_mouse(mouse)).await;
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    outcome
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', "    ")
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

/// Run the request for `pending` off the UI task; the outcome comes back on
/// `tx` and is applied by [`process_exchange_results`].
fn spawn_exchange(
    backend: Arc<dyn ChatBackend>,
    pending: PendingExchange,
    tx: mpsc::UnboundedSender<ExchangeOutcome>,
) {
    debug!(conversation = %pending.conversation_id, "spawning exchange");
    tokio::spawn(async move {
        let result = backend.complete(&pending.request).await;
        let _ = tx.send((pending, result));
    });
}

async fn process_exchange_results(
    app: &AppHandle,
    rx: &mut mpsc::UnboundedReceiver<ExchangeOutcome>,
) -> bool {
    let mut received_any = false;
    while let Ok((pending, result)) = rx.try_recv() {
        app.update(|app| app.on_exchange_finished(pending, result))
            .await;
        received_any = true;
    }
    received_any
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub fn build_app(settings: ChatSettings, config: &Config) -> App {
    let backend = Arc::new(HttpChatBackend::new(reqwest::Client::new()));
    let service = ChatService::new(settings, backend);
    App::new(
        service,
        Theme::from_name(config.theme.as_deref()),
        config.sidebar.unwrap_or(true),
    )
}

pub async fn run_chat(settings: ChatSettings, config: &Config) -> Result<(), Box<dyn Error>> {
    info!(
        provider = %settings.provider,
        model = %settings.model,
        "starting chat session"
    );
    let app = AppHandle::new(Arc::new(Mutex::new(build_app(settings, config))));

    let terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);
    let (exchange_tx, mut exchange_rx) = mpsc::unbounded_channel::<ExchangeOutcome>();

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;
    let mut last_indicator_frame = Instant::now() - frame_duration;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if is_exit_requested(&app).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let event_outcome = process_ui_events(&app, &mut event_rx, &exchange_tx).await;
        if event_outcome.exit_requested {
            break 'main_loop Ok(());
        }
        if event_outcome.events_processed {
            request_redraw = true;
        }

        let received_any = process_exchange_results(&app, &mut exchange_rx).await;
        if received_any {
            request_redraw = true;
        }

        // Keep the thinking indicator animated.
        if app.read(|app| app.is_loading()).await {
            let now = Instant::now();
            if now.duration_since(last_indicator_frame) >= frame_duration {
                request_redraw = true;
                last_indicator_frame = now;
            }
        }

        let idle = !event_outcome.events_processed && !received_any && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&terminal).await?;
    info!("chat session ended");

    result
}
