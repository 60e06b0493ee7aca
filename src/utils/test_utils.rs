#[cfg(test)]
use crate::core::app::App;
#[cfg(test)]
use crate::core::chat_client::{ChatBackend, ExchangeRequest, ProviderError};
#[cfg(test)]
use crate::core::chat_service::ChatService;
#[cfg(test)]
use crate::core::config::ChatSettings;
#[cfg(test)]
use crate::core::providers::Provider;
#[cfg(test)]
use crate::ui::theme::Theme;
#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use tokio::io::{AsyncReadExt, AsyncWriteExt};
#[cfg(test)]
use tokio::net::TcpListener;
#[cfg(test)]
use tokio::sync::oneshot;

/// Backend that replays scripted results and records every request.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ExchangeRequest>>,
}

#[cfg(test)]
impl ScriptedBackend {
    pub fn with(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ExchangeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ExchangeRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("default reply".to_string()))
    }
}

#[cfg(test)]
pub fn create_test_service(backend: Arc<ScriptedBackend>, provider: Provider) -> ChatService {
    let settings = ChatSettings {
        provider,
        model: "test-model".to_string(),
        ..ChatSettings::default()
    };
    ChatService::new(settings, backend)
}

#[cfg(test)]
pub fn create_test_app() -> App {
    create_test_app_with(ScriptedBackend::with(vec![]))
}

#[cfg(test)]
pub fn create_test_app_with(backend: Arc<ScriptedBackend>) -> App {
    App::new(
        create_test_service(backend, Provider::Ollama),
        Theme::dark_default(),
        true,
    )
}

#[cfg(test)]
pub fn server_error() -> ProviderError {
    ProviderError::Status {
        provider: Provider::Ollama,
        status: 500,
        reason: "Internal Server Error".to_string(),
        body: String::new(),
    }
}

#[cfg(test)]
pub type CapturedRequest = (String, serde_json::Value);

/// Serve exactly one HTTP response and hand back the request line and JSON
/// body the client sent.
#[cfg(test)]
pub async fn one_shot_server(
    status_line: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut buffer = Vec::new();
        let mut header_end = None;
        while header_end.is_none() {
            let mut chunk = [0_u8; 1024];
            let read = stream.read(&mut chunk).await.expect("read");
            if read == 0 {
                return;
            }
            buffer.extend_from_slice(&chunk[..read]);
            header_end = buffer
                .windows(4)
                .position(|window| window == b"\r\n\r\n")
                .map(|index| index + 4);
        }
        let header_end = header_end.expect("header end should exist");
        let header_text = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let request_line = header_text.lines().next().unwrap_or_default().to_string();
        let content_length = header_text
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        let mut request_body = buffer[header_end..].to_vec();
        while request_body.len() < content_length {
            let mut chunk = [0_u8; 1024];
            let read = stream.read(&mut chunk).await.expect("read body");
            if read == 0 {
                break;
            }
            request_body.extend_from_slice(&chunk[..read]);
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let json = serde_json::from_slice(&request_body).unwrap_or(serde_json::Value::Null);
        let _ = tx.send((request_line, json));
    });

    (format!("http://{addr}"), rx)
}
