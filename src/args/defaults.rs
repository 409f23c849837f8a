use std::time::Duration;

/// Sent on every request unless a custom `User-Agent` header replaces it.
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("hyperload/", env!("CARGO_PKG_VERSION"));

/// Fixed per-request deadline. Not configurable.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
