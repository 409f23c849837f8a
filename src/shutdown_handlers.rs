use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, poll, read};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::shutdown::{ShutdownReceiver, ShutdownSender};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// One notification is all the channel ever carries.
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;
/// How often the raw-mode keyboard watcher checks for Ctrl+C.
const KEYBOARD_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

/// Tasks that turn Ctrl+C or SIGTERM into a shutdown notification.
///
/// Both tasks also subscribe to the channel and return once anything is sent
/// on it, so sending at the end of the run stops them.
pub struct ShutdownWatchers {
    handles: Vec<JoinHandle<()>>,
}

impl ShutdownWatchers {
    /// Starts the signal watcher, plus the keyboard watcher when the terminal
    /// is in raw mode and the OS no longer delivers Ctrl+C as a signal.
    #[must_use]
    pub fn spawn(shutdown_tx: &ShutdownSender, raw_terminal: bool) -> Self {
        let mut handles = vec![watch_signals(shutdown_tx)];
        if raw_terminal {
            handles.push(watch_keyboard(shutdown_tx));
        }
        Self { handles }
    }

    /// Waits for every watcher to return.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::debug!("Shutdown watcher ended abnormally: {}", err);
            }
        }
    }
}

fn watch_keyboard(shutdown_tx: &ShutdownSender) -> JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::task::spawn_blocking(move || {
        loop {
            match shutdown_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Closed | TryRecvError::Lagged(_)) => return,
                Err(TryRecvError::Empty) => {}
            }

            if !poll(KEYBOARD_POLL_INTERVAL).unwrap_or_default() {
                continue;
            }
            if let Ok(Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })) = read()
            {
                tracing::debug!("Ctrl+C read from terminal");
                drop(shutdown_tx.send(()));
                return;
            }
        }
    })
}

fn watch_signals(shutdown_tx: &ShutdownSender) -> JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_rx.recv() => {}
            () = interrupt_signal() => {
                tracing::debug!("Interrupt signal received");
                drop(shutdown_tx.send(()));
            }
        }
    })
}

#[cfg(unix)]
async fn interrupt_signal() {
    let mut term_signal = match signal(SignalKind::terminate()) {
        Ok(signal) => Some(signal),
        Err(err) => {
            tracing::warn!("Failed to register SIGTERM handler: {}", err);
            None
        }
    };
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::warn!("Failed to listen for Ctrl+C: {}", err);
                std::future::pending::<()>().await;
            }
        }
        () = async {
            match term_signal.as_mut() {
                Some(signal) => {
                    signal.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        } => {}
    }
}

#[cfg(not(unix))]
async fn interrupt_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", err);
        std::future::pending::<()>().await;
    }
}
