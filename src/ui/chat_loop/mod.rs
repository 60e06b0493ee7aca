//! Interactive chat screen.
//!
//! The event loop owns the terminal and shares the [`App`] with spawned
//! exchange tasks through an [`AppHandle`].

mod event_loop;
mod lifecycle;

pub use event_loop::run_chat;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::app::App;

/// Shared handle to the application state.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(inner: Arc<Mutex<App>>) -> Self {
        Self { inner }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
