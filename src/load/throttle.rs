use std::time::Duration;

use tokio::time::Instant;

/// Per-user issuance ceiling, in requests per second.
pub const MAX_USER_RPS: u64 = 100;
/// Pause inserted while a user is above the ceiling.
pub const THROTTLE_PAUSE: Duration = Duration::from_millis(10);

/// Self-regulation for one virtual user.
///
/// Compares the user's own average issue rate against [`MAX_USER_RPS`] after
/// every request. Approximate on purpose: no token bucket, no catch-up.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Throttle {
    started: Instant,
}

impl Throttle {
    pub(crate) fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Sleeps for [`THROTTLE_PAUSE`] when above the ceiling, otherwise yields.
    pub(crate) async fn pace(&self, issued: u64) {
        if exceeds_ceiling(issued, self.elapsed()) {
            tokio::time::sleep(THROTTLE_PAUSE).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

/// `issued / elapsed > MAX_USER_RPS`, in integer milliseconds.
pub(crate) fn exceeds_ceiling(issued: u64, elapsed: Duration) -> bool {
    let issued_scaled = u128::from(issued).saturating_mul(1_000);
    let allowed_scaled = u128::from(MAX_USER_RPS).saturating_mul(elapsed.as_millis());
    issued_scaled > allowed_scaled
}
