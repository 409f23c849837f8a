use std::time::Duration;

pub(super) const MS_PER_SEC: u64 = 1_000;
pub(super) const TENTHS_DIVISOR: u64 = 100;

/// Milliseconds with two decimals, rounded half up: `12.35`.
pub(crate) fn format_millis(duration: Duration) -> String {
    let hundredths = duration
        .as_nanos()
        .saturating_add(5_000)
        .checked_div(10_000)
        .unwrap_or(0);
    let whole = hundredths.checked_div(100).unwrap_or(0);
    let frac = hundredths.checked_rem(100).unwrap_or(0);
    format!("{}.{:02}", whole, frac)
}

/// A value stored in hundredths, printed with two decimals.
pub(crate) fn format_x100(value: u64) -> String {
    format!(
        "{}.{:02}",
        value.checked_div(100).unwrap_or(0),
        value.checked_rem(100).unwrap_or(0)
    )
}

pub(super) fn format_ms_as_tenths(ms: u128) -> String {
    let sec_divisor = u128::from(MS_PER_SEC);
    let tenth_divisor = u128::from(TENTHS_DIVISOR);
    let secs = ms.checked_div(sec_divisor).unwrap_or(0);
    let rem = ms.checked_rem(sec_divisor).unwrap_or(0);
    let tenths = rem.checked_div(tenth_divisor).unwrap_or(0);
    format!("{}.{}s", secs, tenths)
}

pub(super) fn format_count_compact(value: u64) -> String {
    let (scale, suffix) = select_count_scale(value);
    if suffix.is_empty() {
        return value.to_string();
    }
    let whole = value.checked_div(scale).unwrap_or(0);
    let rem = value.checked_rem(scale).unwrap_or(0);

    if whole < 10 {
        let frac = rem.saturating_mul(100).checked_div(scale).unwrap_or(0);
        format!("{whole}.{frac:02}{suffix}")
    } else if whole < 100 {
        let frac = rem.saturating_mul(10).checked_div(scale).unwrap_or(0);
        format!("{whole}.{frac:01}{suffix}")
    } else {
        format!("{whole}{suffix}")
    }
}

const fn select_count_scale(value: u64) -> (u64, &'static str) {
    if value >= 1_000_000_000 {
        (1_000_000_000, "g")
    } else if value >= 1_000_000 {
        (1_000_000, "m")
    } else if value >= 10_000 {
        (1_000, "k")
    } else {
        (1, "")
    }
}
