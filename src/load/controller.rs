use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::virtual_user::VirtualUser;
use super::window::RunWindow;
use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, MetricsError};
use crate::http::RequestSender;
use crate::metrics::{MetricsAggregator, MetricsSnapshot, SummaryMode};
use crate::shutdown::ShutdownReceiver;

/// Interval between live statistics callbacks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);
/// How long an interrupted run waits for stragglers before reporting.
pub const INTERRUPT_REPORT_DELAY: Duration = Duration::from_secs(1);

/// Why the controller stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// Every virtual user returned.
    Completed,
    /// `duration + 2s` elapsed with users still outstanding.
    GraceExpired,
    /// A shutdown signal arrived.
    Interrupted,
}

/// Live view handed to the tick callback.
#[derive(Debug, Clone)]
pub struct TickUpdate {
    pub elapsed: Duration,
    pub snapshot: MetricsSnapshot,
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub end: RunEnd,
    pub snapshot: MetricsSnapshot,
}

impl RunReport {
    /// Completed requests per second, in hundredths.
    #[must_use]
    pub fn requests_per_sec_x100(&self) -> u64 {
        let millis = self.elapsed.as_millis();
        if millis == 0 {
            return 0;
        }
        let scaled = u128::from(self.snapshot.counters.total)
            .saturating_mul(100_000)
            .checked_div(millis)
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

/// Drives `vus` virtual users for the configured duration.
pub struct LoadController {
    config: Arc<RunConfig>,
    sender: Arc<dyn RequestSender>,
    aggregator: Arc<MetricsAggregator>,
}

impl LoadController {
    #[must_use]
    pub fn new(config: RunConfig, sender: Arc<dyn RequestSender>) -> Self {
        Self {
            config: Arc::new(config),
            sender,
            aggregator: Arc::new(MetricsAggregator::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub fn aggregator(&self) -> Arc<MetricsAggregator> {
        Arc::clone(&self.aggregator)
    }

    /// Runs the test and returns the final report.
    ///
    /// `on_tick` is called every [`TICK_INTERVAL`] while users are active. A
    /// message on `shutdown_rx` stops issuance and reports after at most
    /// [`INTERRUPT_REPORT_DELAY`]. Users still running when the report is
    /// produced are aborted.
    ///
    /// # Errors
    ///
    /// Returns an error when a virtual user task panics.
    pub async fn run<F>(
        &self,
        mut shutdown_rx: ShutdownReceiver,
        mut on_tick: F,
    ) -> AppResult<RunReport>
    where
        F: FnMut(&TickUpdate),
    {
        let window = Arc::new(RunWindow::open());
        let started = Instant::now();
        let mut users: JoinSet<u64> = JoinSet::new();
        for id in 0..self.config.vus.get() {
            let user = VirtualUser {
                id,
                sender: Arc::clone(&self.sender),
                aggregator: Arc::clone(&self.aggregator),
                window: Arc::clone(&window),
                duration: self.config.duration,
                request_cap: self.config.request_cap(),
            };
            users.spawn(user.run());
        }
        info!(
            "Started {} virtual users for {:?} against {}",
            self.config.vus.get(),
            self.config.duration,
            self.config.url
        );

        let deadline = tokio::time::sleep_until(instant_after(started, self.config.duration));
        let grace = tokio::time::sleep_until(instant_after(started, self.config.grace_period()));
        let interrupt_timer = tokio::time::sleep(Duration::MAX);
        tokio::pin!(deadline, grace, interrupt_timer);

        let mut ticker =
            tokio::time::interval_at(instant_after(started, TICK_INTERVAL), TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut deadline_armed = true;
        let mut listening = true;
        let mut interrupted = false;
        let mut issued: u64 = 0;

        let end = loop {
            tokio::select! {
                joined = users.join_next() => match joined {
                    Some(Ok(count)) => issued = issued.saturating_add(count),
                    Some(Err(err)) => {
                        window.close();
                        users.abort_all();
                        return Err(AppError::metrics(MetricsError::ControllerTask { source: err }));
                    }
                    None if interrupted => break RunEnd::Interrupted,
                    None => break RunEnd::Completed,
                },
                () = &mut deadline, if deadline_armed => {
                    deadline_armed = false;
                    window.stop();
                    debug!("Run duration elapsed; waiting for in-flight requests");
                }
                () = &mut grace => {
                    warn!("Grace period elapsed with {} virtual users still running", users.len());
                    break RunEnd::GraceExpired;
                }
                signal = shutdown_rx.recv(), if listening => match signal {
                    Ok(()) | Err(RecvError::Lagged(_)) => {
                        listening = false;
                        interrupted = true;
                        window.stop();
                        interrupt_timer
                            .as_mut()
                            .reset(instant_after(Instant::now(), INTERRUPT_REPORT_DELAY));
                        debug!("Shutdown requested; reporting within {:?}", INTERRUPT_REPORT_DELAY);
                    }
                    Err(RecvError::Closed) => listening = false,
                },
                () = &mut interrupt_timer, if interrupted => break RunEnd::Interrupted,
                _ = ticker.tick() => {
                    on_tick(&TickUpdate {
                        elapsed: window.elapsed(),
                        snapshot: self.aggregator.snapshot(SummaryMode::Live),
                    });
                }
            }
        };

        window.close();
        if !users.is_empty() {
            debug!("Aborting {} unfinished virtual users", users.len());
            users.abort_all();
        }

        let snapshot = self.aggregator.snapshot(SummaryMode::Exact);
        debug!(
            "Run finished ({:?}): issued {}, recorded {}",
            end, issued, snapshot.counters.total
        );
        Ok(RunReport {
            started_at: window.started_at(),
            ended_at: window.ended_at().unwrap_or_else(Utc::now),
            elapsed: window.elapsed(),
            end,
            snapshot,
        })
    }
}

/// Fallback offset for deadlines that would overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(31_536_000);

fn instant_after(base: Instant, offset: Duration) -> Instant {
    base.checked_add(offset)
        .or_else(|| base.checked_add(FAR_FUTURE))
        .unwrap_or(base)
}
