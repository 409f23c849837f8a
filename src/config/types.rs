use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, parse_duration_value};
use crate::error::ValidationError;

/// Every key is optional; command-line values take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub vus: Option<usize>,
    pub duration: Option<DurationValue>,
    pub requests: Option<u64>,
    pub enforce_requests: Option<bool>,
    pub method: Option<String>,
    pub headers: Option<Vec<String>>,
    pub no_ui: Option<bool>,
    pub no_color: Option<bool>,
    pub no_banner: Option<bool>,
    pub output_format: Option<OutputFormat>,
}

/// `30` or `1.5` (seconds), or a suffixed string such as `"500ms"` or `"2m"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    FractionalSeconds(f64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::FractionalSeconds(secs) => parse_duration_value(&secs.to_string()),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
