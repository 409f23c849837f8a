use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::{Backend, Frame},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::model::{STATUS_ROWS, UiData};

use super::formatting::{format_count_compact, format_millis, format_ms_as_tenths, format_x100};
use super::progress::progress_bar_line;
use super::theme::{
    ACCENT_LATENCY_RGB, ACCENT_RATE_RGB, FOOTER_HEIGHT, HEADER_HEIGHT, PANEL_TEXT_RGB,
    PROGRESS_HEIGHT, STATS_HEIGHT, STATUS_MIN_HEIGHT, UI_MARGIN, app_background_style,
    muted_style, panel_border_style, rgb, status_rgb, style_color,
};

pub fn draw_frame<B: Backend>(f: &mut Frame<'_, B>, data: &UiData) {
    let size = f.size();
    f.render_widget(
        Block::default().style(app_background_style(data.no_color)),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(UI_MARGIN)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(PROGRESS_HEIGHT),
            Constraint::Length(STATS_HEIGHT),
            Constraint::Min(STATUS_MIN_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(size);

    let [header, progress, stats, status, footer] = chunks.as_ref() else {
        return;
    };

    render_header(f, data, *header);
    render_progress(f, data, *progress);
    render_stats(f, data, *stats);
    render_status(f, data, *status);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Press Ctrl+C to stop the test",
            muted_style(data.no_color),
        ))),
        *footer,
    );
}

fn panel(title: &str, no_color: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border_style(no_color))
        .title(Span::styled(
            format!(" {} ", title),
            style_color(no_color, rgb(PANEL_TEXT_RGB)),
        ))
}

fn render_header<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let line = Line::from(vec![
        Span::styled(data.method, style_color(data.no_color, rgb(ACCENT_RATE_RGB))),
        Span::raw(" "),
        Span::raw(data.target.clone()),
        Span::styled(
            format!("  |  {} virtual users", data.vus),
            muted_style(data.no_color),
        ),
    ]);
    f.render_widget(
        Paragraph::new(line).block(panel("hyperload live dashboard", data.no_color)),
        area,
    );
}

fn render_progress<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let elapsed_ms = data.elapsed_time.as_millis();
    let target_ms = data.target_duration.as_millis();
    let label = format!(
        "{} / {} ({} left)",
        format_ms_as_tenths(elapsed_ms),
        format_ms_as_tenths(target_ms),
        format_ms_as_tenths(data.remaining().as_millis())
    );
    let inner_width = area.width.saturating_sub(2);
    let line = progress_bar_line(elapsed_ms, target_ms, inner_width, data.no_color, &label);
    f.render_widget(
        Paragraph::new(line).block(panel("Progress", data.no_color)),
        area,
    );
}

fn render_stats<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);
    let [requests, latency, percentiles] = columns.as_ref() else {
        return;
    };
    let no_color = data.no_color;

    let request_lines = vec![
        stat_line("Total", format_count_compact(data.total_requests), no_color),
        stat_line(
            "Success",
            format_count_compact(data.successful_requests),
            no_color,
        ),
        stat_line("Failed", format_count_compact(data.failed_requests), no_color),
        stat_line(
            "Rate",
            format!("{}%", format_x100(data.success_rate_x100)),
            no_color,
        ),
        stat_line("RPS", format_x100(data.rps_x100), no_color),
    ];
    f.render_widget(
        Paragraph::new(request_lines).block(panel("Requests", no_color)),
        *requests,
    );

    let latency_rows: [(&str, Option<std::time::Duration>); 3] = [
        ("Min", data.summary.map(|stats| stats.min)),
        ("Avg", data.summary.map(|stats| stats.avg)),
        ("Max", data.summary.map(|stats| stats.max)),
    ];
    f.render_widget(
        Paragraph::new(latency_lines(&latency_rows, no_color)).block(panel("Latency", no_color)),
        *latency,
    );

    let percentile_rows: [(&str, Option<std::time::Duration>); 3] = [
        ("p50", data.summary.map(|stats| stats.p50)),
        ("p90", data.summary.map(|stats| stats.p90)),
        ("p99", data.summary.map(|stats| stats.p99)),
    ];
    f.render_widget(
        Paragraph::new(latency_lines(&percentile_rows, no_color))
            .block(panel("Percentiles", no_color)),
        *percentiles,
    );
}

fn stat_line(label: &str, value: String, no_color: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<8}", label), muted_style(no_color)),
        Span::styled(value, style_color(no_color, rgb(PANEL_TEXT_RGB))),
    ])
}

fn latency_lines(
    rows: &[(&str, Option<std::time::Duration>)],
    no_color: bool,
) -> Vec<Line<'static>> {
    rows.iter()
        .map(|(label, value)| {
            let text = value.map_or_else(|| "-".to_owned(), |latency| {
                format!("{} ms", format_millis(latency))
            });
            Line::from(vec![
                Span::styled(format!("{:<8}", label), muted_style(no_color)),
                Span::styled(text, style_color(no_color, rgb(ACCENT_LATENCY_RGB))),
            ])
        })
        .collect()
}

fn render_status<B: Backend>(f: &mut Frame<'_, B>, data: &UiData, area: Rect) {
    let no_color = data.no_color;
    let visible = usize::from(area.height.saturating_sub(2)).min(STATUS_ROWS);
    let lines: Vec<Line<'static>> = if data.status_distribution.is_empty() {
        vec![Line::from(Span::styled(
            "Waiting for responses...",
            muted_style(no_color),
        ))]
    } else {
        data.status_distribution
            .iter()
            .take(visible)
            .map(|(label, count)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<8}", label.to_string()),
                        style_color(no_color, rgb(status_rgb(*label))),
                    ),
                    Span::raw(format_count_compact(*count)),
                ])
            })
            .collect()
    };
    f.render_widget(
        Paragraph::new(lines).block(panel("Status codes", no_color)),
        area,
    );
}
