use std::time::Duration;

use super::LatencyHistogram;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryStats {
    pub avg: Duration,
    pub min: Duration,
    pub max: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p95: Duration,
    pub p99: Duration,
}

impl SummaryStats {
    /// Rows for tabular output: label and value, in report order.
    #[must_use]
    pub const fn rows(&self) -> [(&'static str, Duration); 7] {
        [
            ("Average", self.avg),
            ("Minimum", self.min),
            ("Maximum", self.max),
            ("50th percentile", self.p50),
            ("90th percentile", self.p90),
            ("95th percentile", self.p95),
            ("99th percentile", self.p99),
        ]
    }
}

/// Summarizes a latency sample. Returns `None` for an empty sample.
///
/// The input is copied before sorting so callers can pass a borrowed view.
#[must_use]
pub fn summarize(latencies: &[Duration]) -> Option<SummaryStats> {
    summarize_owned(latencies.to_vec())
}

/// Same as [`summarize`] but sorts the provided snapshot in place.
#[must_use]
pub fn summarize_owned(mut latencies: Vec<Duration>) -> Option<SummaryStats> {
    latencies.sort_unstable();
    let min = *latencies.first()?;
    let max = *latencies.last()?;
    let avg = mean(&latencies)?;

    Some(SummaryStats {
        avg,
        min,
        max,
        p50: nearest_rank(&latencies, 50)?,
        p90: nearest_rank(&latencies, 90)?,
        p95: nearest_rank(&latencies, 95)?,
        p99: nearest_rank(&latencies, 99)?,
    })
}

/// Summary built from running totals plus histogram percentiles.
///
/// Used for live ticks once the sample is too large to sort every 500ms.
#[must_use]
pub fn summarize_estimated(
    histogram: &LatencyHistogram,
    latency_sum: Duration,
    min: Duration,
    max: Duration,
) -> Option<SummaryStats> {
    let avg_nanos = latency_sum
        .as_nanos()
        .checked_div(u128::from(histogram.count()))?;
    let avg = duration_from_nanos(avg_nanos);
    Some(SummaryStats {
        avg,
        min,
        max,
        p50: histogram.percentile(50)?.clamp(min, max),
        p90: histogram.percentile(90)?.clamp(min, max),
        p95: histogram.percentile(95)?.clamp(min, max),
        p99: histogram.percentile(99)?.clamp(min, max),
    })
}

/// Element at index `floor(percent * n / 100)` of an ascending sample, clamped
/// to the last element. No interpolation.
#[must_use]
pub fn nearest_rank(sorted: &[Duration], percent: u8) -> Option<Duration> {
    let last = sorted.len().checked_sub(1)?;
    let len = u128::try_from(sorted.len()).unwrap_or(u128::MAX);
    let index = len
        .saturating_mul(u128::from(percent))
        .checked_div(100)
        .unwrap_or(0);
    let index = usize::try_from(index).unwrap_or(last).min(last);
    sorted.get(index).copied()
}

fn mean(latencies: &[Duration]) -> Option<Duration> {
    let count = u128::try_from(latencies.len()).ok()?;
    let total_nanos = latencies
        .iter()
        .fold(0u128, |acc, latency| acc.saturating_add(latency.as_nanos()));
    let avg_nanos = total_nanos.checked_div(count)?;
    Some(duration_from_nanos(avg_nanos))
}

pub(crate) fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = nanos.checked_div(1_000_000_000).unwrap_or(0);
    let subsec = nanos.checked_rem(1_000_000_000).unwrap_or(0);
    Duration::new(
        u64::try_from(secs).unwrap_or(u64::MAX),
        u32::try_from(subsec).unwrap_or(0),
    )
}
