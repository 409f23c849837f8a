use std::io::IsTerminal;
use std::time::Duration;

use crossterm::style::{Color, Stylize};

use crate::args::OutputFormat;
use crate::domain::RunConfig;
use crate::error::AppResult;
use crate::load::{RunEnd, RunReport};
use crate::ui::render::theme::status_rgb;
use crate::ui::{format_millis, format_x100};

/// Status rows listed in the text report.
pub(crate) const REPORT_STATUS_ROWS: usize = 10;
/// Success rates below this (in hundredths of a percent) are printed in red.
const HEALTHY_SUCCESS_RATE_X100: u64 = 9_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportLine {
    pub(crate) text: String,
    pub(crate) color: Option<Color>,
}

impl ReportLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

/// Writes the final report to stdout in the requested format.
///
/// # Errors
///
/// Returns an error when the JSON document cannot be serialized.
pub(crate) fn print_report(
    report: &RunReport,
    config: &RunConfig,
    format: OutputFormat,
    no_color: bool,
) -> AppResult<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&json_report(report, config))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let use_color = !no_color && std::io::stdout().is_terminal();
            for line in text_report_lines(report) {
                match line.color {
                    Some(color) if use_color => println!("{}", line.text.with(color)),
                    Some(_) | None => println!("{}", line.text),
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn text_report_lines(report: &RunReport) -> Vec<ReportLine> {
    let counters = &report.snapshot.counters;
    let success_rate = counters.success_rate_x100();
    let rate_color = if success_rate >= HEALTHY_SUCCESS_RATE_X100 {
        Color::Green
    } else {
        Color::Red
    };

    let mut lines = vec![
        ReportLine::plain(""),
        ReportLine::colored("Test Results Summary", Color::Cyan),
        ReportLine::plain(""),
        ReportLine::colored("Performance Summary:", Color::Cyan),
        metric_row("Total Requests", counters.total.to_string(), None),
        metric_row(
            "Successful Requests",
            counters.success.to_string(),
            Some(Color::Green),
        ),
        metric_row(
            "Failed Requests",
            counters.failure.to_string(),
            Some(Color::Red),
        ),
        metric_row(
            "Success Rate",
            format!("{}%", format_x100(success_rate)),
            Some(rate_color),
        ),
        metric_row(
            "Test Duration",
            format!("{}s", format_seconds(report.elapsed)),
            None,
        ),
        metric_row(
            "Requests/sec",
            format_x100(report.requests_per_sec_x100()),
            None,
        ),
        ReportLine::plain(""),
    ];

    match report.snapshot.summary {
        Some(stats) => {
            lines.push(ReportLine::colored(
                "Response Time Statistics (ms):",
                Color::Cyan,
            ));
            for (label, value) in stats.rows() {
                lines.push(ReportLine::plain(format!(
                    "  {:<20}{:>12}",
                    label,
                    format_millis(value)
                )));
            }
        }
        None => lines.push(ReportLine::colored("No responses recorded.", Color::Yellow)),
    }

    let distribution = counters.status_distribution();
    if !distribution.is_empty() {
        let label_total = distribution
            .iter()
            .fold(0u64, |acc, (_, count)| acc.saturating_add(*count));
        lines.push(ReportLine::plain(""));
        lines.push(ReportLine::colored("Status Code Distribution:", Color::Cyan));
        for (label, count) in distribution.iter().take(REPORT_STATUS_ROWS) {
            let (r, g, b) = status_rgb(*label);
            lines.push(ReportLine::colored(
                format!(
                    "  {:<10}{:>10} ({}%)",
                    label.to_string(),
                    count,
                    format_x100(share_x100(*count, label_total))
                ),
                Color::Rgb { r, g, b },
            ));
        }
    }

    lines
}

fn metric_row(label: &str, value: String, color: Option<Color>) -> ReportLine {
    ReportLine {
        text: format!("  {:<22}{}", label, value),
        color,
    }
}

/// `part / whole` in hundredths of a percent.
fn share_x100(part: u64, whole: u64) -> u64 {
    let scaled = u128::from(part)
        .saturating_mul(10_000)
        .checked_div(u128::from(whole))
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

fn format_seconds(elapsed: Duration) -> String {
    let hundredths = elapsed.as_millis().checked_div(10).unwrap_or(0);
    format_x100(u64::try_from(hundredths).unwrap_or(u64::MAX))
}

const fn end_label(end: RunEnd) -> &'static str {
    match end {
        RunEnd::Completed => "completed",
        RunEnd::GraceExpired => "grace_expired",
        RunEnd::Interrupted => "interrupted",
    }
}

fn micros(value: Duration) -> u64 {
    u64::try_from(value.as_micros()).unwrap_or(u64::MAX)
}

/// The final report as one JSON document. Latencies are in microseconds and
/// rates in hundredths.
pub(crate) fn json_report(report: &RunReport, config: &RunConfig) -> serde_json::Value {
    let counters = &report.snapshot.counters;
    let latency = report.snapshot.summary.map_or(serde_json::Value::Null, |stats| {
        serde_json::json!({
            "avg_us": micros(stats.avg),
            "min_us": micros(stats.min),
            "max_us": micros(stats.max),
            "p50_us": micros(stats.p50),
            "p90_us": micros(stats.p90),
            "p95_us": micros(stats.p95),
            "p99_us": micros(stats.p99)
        })
    });
    let status_counts: serde_json::Map<String, serde_json::Value> = counters
        .status_counts
        .iter()
        .map(|(label, count)| (label.to_string(), serde_json::json!(count)))
        .collect();

    serde_json::json!({
        "target": {
            "url": config.url.as_str(),
            "method": config.method.as_str(),
            "vus": config.vus.get(),
            "duration_ms": u64::try_from(config.duration.as_millis()).unwrap_or(u64::MAX),
            "requests_per_user": config.requests_per_user.get(),
            "enforce_requests": config.enforce_requests
        },
        "started_at": report.started_at.to_rfc3339(),
        "ended_at": report.ended_at.to_rfc3339(),
        "elapsed_ms": u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        "end": end_label(report.end),
        "total_requests": counters.total,
        "successful_requests": counters.success,
        "failed_requests": counters.failure,
        "success_rate_x100": counters.success_rate_x100(),
        "requests_per_sec_x100": report.requests_per_sec_x100(),
        "latency": latency,
        "status_counts": status_counts
    })
}
