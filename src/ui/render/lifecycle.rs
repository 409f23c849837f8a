use tokio::sync::watch;

use crate::shutdown::ShutdownSender;
use crate::ui::model::UiData;

use super::dashboard::{Ui, UiActions};

/// Restores the terminal however the render task exits.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Ui::cleanup();
    }
}

/// Spawns the dashboard task. It redraws on every published `UiData` and
/// exits when the shutdown channel fires or the sender is dropped.
#[must_use]
pub fn setup_render_ui(
    shutdown_tx: &ShutdownSender,
    ui_tx: &watch::Sender<UiData>,
) -> tokio::task::JoinHandle<()> {
    let mut ui_rx = ui_tx.subscribe();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut terminal = match Ui::setup_terminal() {
            Ok(terminal) => terminal,
            Err(err) => {
                tracing::warn!("Failed to set up terminal, dashboard disabled: {}", err);
                return;
            }
        };
        let _guard = TerminalGuard;

        let initial = ui_rx.borrow_and_update().clone();
        Ui::render(&mut terminal, &initial);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                res = ui_rx.changed() => {
                    if res.is_err() {
                        break;
                    }
                    let data = ui_rx.borrow_and_update().clone();
                    Ui::render(&mut terminal, &data);
                }
            }
        }
    })
}
