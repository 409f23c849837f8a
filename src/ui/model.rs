use std::time::Duration;

use crate::load::TickUpdate;
use crate::metrics::{StatusLabel, SummaryStats};

/// Status rows shown on the dashboard.
pub const STATUS_ROWS: usize = 10;

/// Everything the dashboard draws, published once per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiData {
    pub target: String,
    pub method: &'static str,
    pub vus: usize,
    pub no_color: bool,
    pub elapsed_time: Duration,
    pub target_duration: Duration,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate_x100: u64,
    pub rps_x100: u64,
    pub summary: Option<SummaryStats>,
    pub status_distribution: Vec<(StatusLabel, u64)>,
}

impl UiData {
    /// Copies the live counters and statistics of a tick.
    pub fn apply_tick(&mut self, update: &TickUpdate) {
        let counters = &update.snapshot.counters;
        self.elapsed_time = update.elapsed;
        self.total_requests = counters.total;
        self.successful_requests = counters.success;
        self.failed_requests = counters.failure;
        self.success_rate_x100 = counters.success_rate_x100();
        self.rps_x100 = rate_x100(counters.total, update.elapsed);
        self.summary = update.snapshot.summary;
        self.status_distribution = counters.status_distribution();
    }

    /// Remaining run time, zero once the target is reached.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.target_duration.saturating_sub(self.elapsed_time)
    }
}

fn rate_x100(total: u64, elapsed: Duration) -> u64 {
    let millis = elapsed.as_millis();
    if millis == 0 {
        return 0;
    }
    let scaled = u128::from(total)
        .saturating_mul(100_000)
        .checked_div(millis)
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
