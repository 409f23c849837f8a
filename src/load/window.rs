use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Start/end timestamps of a run plus the cooperative stop flag.
#[derive(Debug)]
pub struct RunWindow {
    start: Instant,
    started_at: DateTime<Utc>,
    end: OnceLock<Instant>,
    running: AtomicBool,
}

impl RunWindow {
    /// Opens the window now with the running flag set.
    #[must_use]
    pub fn open() -> Self {
        Self {
            start: Instant::now(),
            started_at: Utc::now(),
            end: OnceLock::new(),
            running: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Clears the running flag. Returns `true` for the call that flipped it.
    pub fn stop(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }

    /// Stops the run and records the end instant. Later calls keep the first end.
    pub fn close(&self) {
        self.stop();
        let _end = self.end.get_or_init(Instant::now);
    }

    #[must_use]
    pub const fn start(&self) -> Instant {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<Instant> {
        self.end.get().copied()
    }

    /// Time since start, frozen once the window is closed.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.end()
            .map_or_else(|| self.start.elapsed(), |end| end.duration_since(self.start))
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Wall-clock end derived from the monotonic elapsed time.
    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        let elapsed = chrono::Duration::from_std(self.end()?.duration_since(self.start)).ok()?;
        self.started_at.checked_add_signed(elapsed)
    }
}
