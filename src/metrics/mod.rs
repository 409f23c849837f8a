//! Outcome types, the shared aggregator, and latency statistics.
mod aggregator;
mod histogram;
mod stats;
mod types;


pub use aggregator::{
    EXACT_LIVE_SAMPLE_LIMIT, MetricsAggregator, MetricsCounters, MetricsSnapshot, MetricsState,
    SummaryMode,
};
pub use histogram::LatencyHistogram;
pub use stats::{SummaryStats, nearest_rank, summarize, summarize_owned};
pub use types::{ERROR_LABEL, OutcomeKind, RequestOutcome, StatusLabel, TIMEOUT_LABEL};
