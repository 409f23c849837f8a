use std::fmt;
use std::time::Duration;

/// Label recorded for connection-level failures.
pub const ERROR_LABEL: &str = "ERR";
/// Label recorded for requests that exceeded the request timeout.
pub const TIMEOUT_LABEL: &str = "TIMEOUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    HttpError,
    TransportError,
    Timeout,
}

impl OutcomeKind {
    /// Classifies a received status code; anything in `[200, 400)` is a success.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status >= 200 && status < 400 {
            OutcomeKind::Success
        } else {
            OutcomeKind::HttpError
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, OutcomeKind::Success)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::HttpError => "http_error",
            OutcomeKind::TransportError => "transport_error",
            OutcomeKind::Timeout => "timeout",
        }
    }
}

/// Key of the status-code distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusLabel {
    Code(u16),
    Error,
    Timeout,
}

impl StatusLabel {
    /// Response class used for colouring: 2, 3, 4, 5 or `None` for sentinels.
    #[must_use]
    pub const fn class(self) -> Option<u16> {
        match self {
            StatusLabel::Code(code) => code.checked_div(100),
            StatusLabel::Error | StatusLabel::Timeout => None,
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLabel::Code(code) => write!(f, "{}", code),
            StatusLabel::Error => f.write_str(ERROR_LABEL),
            StatusLabel::Timeout => f.write_str(TIMEOUT_LABEL),
        }
    }
}

/// Result of a single request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub latency: Duration,
    pub kind: OutcomeKind,
    pub status: Option<u16>,
}

impl RequestOutcome {
    #[must_use]
    pub const fn from_status(status: u16, latency: Duration) -> Self {
        Self {
            latency,
            kind: OutcomeKind::from_status(status),
            status: Some(status),
        }
    }

    #[must_use]
    pub const fn transport_error(latency: Duration) -> Self {
        Self {
            latency,
            kind: OutcomeKind::TransportError,
            status: None,
        }
    }

    #[must_use]
    pub const fn timeout(latency: Duration) -> Self {
        Self {
            latency,
            kind: OutcomeKind::Timeout,
            status: None,
        }
    }

    #[must_use]
    pub const fn label(&self) -> StatusLabel {
        match (self.kind, self.status) {
            (OutcomeKind::Timeout, _) => StatusLabel::Timeout,
            (OutcomeKind::TransportError, _) => StatusLabel::Error,
            (OutcomeKind::Success | OutcomeKind::HttpError, Some(code)) => StatusLabel::Code(code),
            (OutcomeKind::Success | OutcomeKind::HttpError, None) => StatusLabel::Error,
        }
    }
}
