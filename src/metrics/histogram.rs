use std::time::Duration;

use hdrhistogram::Histogram;

use crate::error::MetricsError;

/// Microsecond-resolution latency histogram used for cheap live percentiles.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, MetricsError> {
        let hist = Histogram::<u64>::new(3).map_err(|err| MetricsError::Histogram {
            context: "create",
            source: Box::new(err),
        })?;
        Ok(Self { hist })
    }

    /// Record a latency value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency: Duration) -> Result<(), MetricsError> {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX).max(1);
        self.hist
            .record(micros)
            .map_err(|err| MetricsError::Histogram {
                context: "record",
                source: Box::new(err),
            })
    }

    /// Value at `percent` (0-100), or `None` when nothing was recorded.
    #[must_use]
    pub fn percentile(&self, percent: u8) -> Option<Duration> {
        if self.count() == 0 {
            return None;
        }
        let value = self.hist.value_at_percentile(f64::from(percent.min(100)));
        Some(Duration::from_micros(value))
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
