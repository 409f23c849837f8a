use std::io::{IsTerminal, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::sync::watch;

use crate::shutdown::ShutdownSender;
use crate::ui::format_x100;
use crate::ui::model::UiData;

const BAR_WIDTH: usize = 30;

/// Single-line stderr progress used when the dashboard is off.
///
/// Redraws whenever a new tick is published and prints a final newline on
/// shutdown. Does nothing when stderr is not a terminal.
pub(crate) fn setup_progress_line(
    shutdown_tx: &ShutdownSender,
    ui_tx: &watch::Sender<UiData>,
) -> tokio::task::JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    let mut ui_rx = ui_tx.subscribe();

    tokio::spawn(async move {
        if !std::io::stderr().is_terminal() {
            return;
        }

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    if finish_progress_line().is_err() {
                        tracing::debug!("Failed to finish progress line");
                    }
                    break;
                }
                res = ui_rx.changed() => {
                    if res.is_err() {
                        break;
                    }
                    let data = ui_rx.borrow_and_update().clone();
                    if render_progress_line(&data).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn render_progress_line(data: &UiData) -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in progress_segments(data) {
        match segment.color {
            Some(color) if !data.no_color => {
                queue!(out, SetForegroundColor(color), Print(&segment.text), ResetColor)?;
            }
            Some(_) | None => queue!(out, Print(&segment.text))?,
        }
    }
    out.flush()
}

fn finish_progress_line() -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    out.write_all(b"\n")?;
    out.flush()
}

/// Percent of the target duration elapsed, in hundredths, capped at 100%.
pub(crate) fn progress_x100(data: &UiData) -> u64 {
    let target = data.target_duration.as_millis();
    let elapsed = data.elapsed_time.as_millis().min(target);
    let scaled = elapsed
        .saturating_mul(10_000)
        .checked_div(target)
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(10_000)
}

pub(crate) fn progress_segments(data: &UiData) -> Vec<ProgressSegment> {
    let percent = progress_x100(data);
    let filled = usize::try_from(
        u128::from(percent)
            .saturating_mul(u128::try_from(BAR_WIDTH).unwrap_or(0))
            .checked_div(10_000)
            .unwrap_or(0),
    )
    .unwrap_or(BAR_WIDTH)
    .min(BAR_WIDTH);

    let bar = format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH.saturating_sub(filled))
    );
    let elapsed_tenths = data.elapsed_time.as_millis().checked_div(100).unwrap_or(0);

    vec![
        ProgressSegment::plain(bar),
        ProgressSegment::colored(format!(" {}%", format_x100(percent)), Color::Cyan),
        ProgressSegment::colored(
            format!(
                " | {}.{}s / {}s",
                elapsed_tenths.checked_div(10).unwrap_or(0),
                elapsed_tenths.checked_rem(10).unwrap_or(0),
                data.target_duration.as_secs()
            ),
            Color::Yellow,
        ),
        ProgressSegment::plain(format!(
            " | {} req ({} failed) | {} rps",
            data.total_requests,
            data.failed_requests,
            format_x100(data.rps_x100)
        )),
    ]
}

#[derive(Debug)]
pub(crate) struct ProgressSegment {
    pub(crate) text: String,
    pub(crate) color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}
