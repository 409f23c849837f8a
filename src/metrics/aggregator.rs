use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::stats::{summarize_estimated, summarize_owned};
use super::{LatencyHistogram, RequestOutcome, StatusLabel, SummaryStats};

/// Above this many samples live ticks read percentiles from the histogram
/// instead of sorting a full copy of the latency sequence.
pub const EXACT_LIVE_SAMPLE_LIMIT: usize = 200_000;

/// Shared counters for a run. `total == success + failure` and the label
/// counts sum to `total` after every `record`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsState {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub status_counts: BTreeMap<StatusLabel, u64>,
    pub latencies: Vec<Duration>,
}

/// Aggregate counters without the latency sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsCounters {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub status_counts: BTreeMap<StatusLabel, u64>,
}

impl MetricsCounters {
    /// Status labels ordered by descending count, ties by label.
    #[must_use]
    pub fn status_distribution(&self) -> Vec<(StatusLabel, u64)> {
        let mut entries: Vec<(StatusLabel, u64)> = self
            .status_counts
            .iter()
            .map(|(label, count)| (*label, *count))
            .collect();
        entries.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
        entries
    }

    /// Success rate in hundredths of a percent (10_000 == 100%).
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        let scaled = u128::from(self.success)
            .saturating_mul(10_000)
            .checked_div(u128::from(self.total))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

impl From<&MetricsState> for MetricsCounters {
    fn from(state: &MetricsState) -> Self {
        Self {
            total: state.total,
            success: state.success,
            failure: state.failure,
            status_counts: state.status_counts.clone(),
        }
    }
}

/// Point-in-time view handed to the dashboard and the final report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: MetricsCounters,
    pub summary: Option<SummaryStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    /// Nearest-rank over a sorted copy of every recorded latency.
    Exact,
    /// Exact up to [`EXACT_LIVE_SAMPLE_LIMIT`] samples, histogram estimate beyond.
    Live,
}

#[derive(Debug)]
struct Inner {
    state: MetricsState,
    latency_sum: Duration,
    min_latency: Option<Duration>,
    max_latency: Option<Duration>,
    histogram: Option<LatencyHistogram>,
}

#[derive(Debug)]
pub struct MetricsAggregator {
    inner: Mutex<Inner>,
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregator {
    #[must_use]
    pub fn new() -> Self {
        let histogram = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                tracing::warn!("Failed to initialize latency histogram: {}", err);
                None
            }
        };
        Self {
            inner: Mutex::new(Inner {
                state: MetricsState::default(),
                latency_sum: Duration::ZERO,
                min_latency: None,
                max_latency: None,
                histogram,
            }),
        }
    }

    /// Records one outcome. Holds the lock for constant work only.
    pub fn record(&self, outcome: &RequestOutcome) {
        let mut inner = self.lock();
        let Inner {
            state,
            latency_sum,
            min_latency,
            max_latency,
            histogram,
        } = &mut *inner;

        state.total = state.total.saturating_add(1);
        if outcome.kind.is_success() {
            state.success = state.success.saturating_add(1);
        } else {
            state.failure = state.failure.saturating_add(1);
        }
        let count = state.status_counts.entry(outcome.label()).or_insert(0);
        *count = count.saturating_add(1);
        state.latencies.push(outcome.latency);
        *latency_sum = latency_sum.saturating_add(outcome.latency);
        *min_latency = Some(min_latency.map_or(outcome.latency, |min| min.min(outcome.latency)));
        *max_latency = Some(max_latency.map_or(outcome.latency, |max| max.max(outcome.latency)));

        if let Some(hist) = histogram.as_mut()
            && let Err(err) = hist.record(outcome.latency)
        {
            tracing::warn!("Disabling latency histogram after error: {}", err);
            *histogram = None;
        }
    }

    #[must_use]
    pub fn counters(&self) -> MetricsCounters {
        MetricsCounters::from(&self.lock().state)
    }

    /// Full copy of the state, mostly useful for tests and exports.
    #[must_use]
    pub fn state(&self) -> MetricsState {
        self.lock().state.clone()
    }

    /// Counters plus summary statistics. Sorting happens after the lock is released.
    #[must_use]
    pub fn snapshot(&self, mode: SummaryMode) -> MetricsSnapshot {
        let (counters, source) = {
            let inner = self.lock();
            let counters = MetricsCounters::from(&inner.state);
            let source = match (mode, inner.histogram.as_ref()) {
                (SummaryMode::Live, Some(histogram))
                    if inner.state.latencies.len() > EXACT_LIVE_SAMPLE_LIMIT =>
                {
                    SummarySource::Estimated {
                        histogram: histogram.clone(),
                        latency_sum: inner.latency_sum,
                        min: inner.min_latency,
                        max: inner.max_latency,
                    }
                }
                (SummaryMode::Live | SummaryMode::Exact, _) => {
                    SummarySource::Exact(inner.state.latencies.clone())
                }
            };
            (counters, source)
        };

        let summary = match source {
            SummarySource::Exact(latencies) => summarize_owned(latencies),
            SummarySource::Estimated {
                histogram,
                latency_sum,
                min: Some(min),
                max: Some(max),
            } => summarize_estimated(&histogram, latency_sum, min, max),
            SummarySource::Estimated { .. } => None,
        };

        MetricsSnapshot { counters, summary }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum SummarySource {
    Exact(Vec<Duration>),
    Estimated {
        histogram: LatencyHistogram,
        latency_sum: Duration,
        min: Option<Duration>,
        max: Option<Duration>,
    },
}
