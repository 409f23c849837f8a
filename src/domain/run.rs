use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use crate::args::{HttpMethod, PositiveU64, PositiveUsize, REQUEST_TIMEOUT};

/// Added to the run duration before the controller stops waiting on users.
pub const GRACE_PERIOD_EXTRA: Duration = Duration::from_secs(2);

/// Immutable description of one load test.
///
/// Header keys are kept exactly as configured, so `X-Id` and `x-id` are
/// distinct entries here even though both map to the same wire header.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub vus: PositiveUsize,
    pub duration: Duration,
    pub requests_per_user: PositiveU64,
    pub enforce_requests: bool,
    pub request_timeout: Duration,
}

impl RunConfig {
    #[must_use]
    pub const fn new(url: Url, vus: PositiveUsize, duration: Duration) -> Self {
        Self {
            url,
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            vus,
            duration,
            requests_per_user: PositiveU64::DEFAULT_REQUESTS,
            enforce_requests: false,
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// `vus * requests_per_user`, the figure shown in the run header.
    #[must_use]
    pub fn planned_requests(&self) -> u64 {
        u64::try_from(self.vus.get())
            .unwrap_or(u64::MAX)
            .saturating_mul(self.requests_per_user.get())
    }

    /// Hard upper bound on how long the controller waits for users.
    #[must_use]
    pub fn grace_period(&self) -> Duration {
        self.duration.saturating_add(GRACE_PERIOD_EXTRA)
    }

    /// Per-user cap, only when the cap is enforced.
    #[must_use]
    pub const fn request_cap(&self) -> Option<u64> {
        if self.enforce_requests {
            Some(self.requests_per_user.get())
        } else {
            None
        }
    }
}
