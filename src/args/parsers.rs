use std::time::Duration;

use url::Url;

use super::types::{PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};

/// Splits `Key: Value` at the first colon and trims both halves.
pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    let Some((key, value)) = s.split_once(':') else {
        return Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::HeaderNameEmpty {
            value: s.to_owned(),
        });
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

/// Accepts `<n>`, `<n>ms`, `<n>s`, `<n>m` or `<n>h`. A bare number is seconds.
/// The number may carry a fraction (`1.5`, `0.25m`); the result is truncated
/// to whole milliseconds.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::from)
}

pub(crate) fn parse_duration_value(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let number_len = value
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
        .unwrap_or(value.len());
    let (num_part, unit_part) = value.split_at(number_len);
    let (whole_part, frac_part) = num_part.split_once('.').unwrap_or((num_part, ""));
    if (whole_part.is_empty() && frac_part.is_empty()) || frac_part.contains('.') {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let unit_ms: u64 = match unit {
        "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    let whole: u64 = if whole_part.is_empty() {
        0
    } else {
        whole_part
            .parse()
            .map_err(|err| ValidationError::InvalidDurationNumber {
                value: value.to_owned(),
                source: err,
            })?
    };
    let fraction_ms = fraction_millis(frac_part, unit_ms, value)?;
    let millis = whole
        .checked_mul(unit_ms)
        .and_then(|ms| ms.checked_add(fraction_ms))
        .ok_or(ValidationError::DurationOverflow)?;

    let duration = Duration::from_millis(millis);
    if duration.is_zero() {
        return Err(ValidationError::DurationZero);
    }

    Ok(duration)
}

/// Milliseconds contributed by the digits after the decimal point.
fn fraction_millis(digits: &str, unit_ms: u64, value: &str) -> Result<u64, ValidationError> {
    // Nine digits are already below millisecond resolution for every unit.
    let digits = digits.get(..9).unwrap_or(digits);
    if digits.is_empty() {
        return Ok(0);
    }
    let numerator: u64 = digits
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;
    let scale = u32::try_from(digits.len())
        .ok()
        .and_then(|len| 10u128.checked_pow(len))
        .ok_or(ValidationError::DurationOverflow)?;
    let millis = u128::from(numerator)
        .saturating_mul(u128::from(unit_ms))
        .checked_div(scale)
        .unwrap_or(0);
    u64::try_from(millis)
        .ok()
        .ok_or(ValidationError::DurationOverflow)
}

/// Target URLs must be absolute `http`/`https` URLs with a host.
pub(crate) fn parse_target_url(s: &str) -> Result<Url, ValidationError> {
    let value = s.trim();
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ValidationError::UrlSchemeUnsupported {
            url: value.to_owned(),
        });
    }
    let url = Url::parse(value).map_err(|err| ValidationError::InvalidUrl {
        url: value.to_owned(),
        source: err,
    })?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::UrlMissingHost);
    }
    Ok(url)
}
