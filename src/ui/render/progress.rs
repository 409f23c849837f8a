use ratatui::text::{Line, Span};

use super::theme::{ACCENT_PROGRESS_RGB, PANEL_TEXT_RGB, rgb, style_color};

const PARTIAL_BLOCKS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

/// Number of eighth-cells filled for `elapsed / target` over `cells` cells.
pub(super) fn filled_eighths(elapsed_ms: u128, target_ms: u128, cells: usize) -> u128 {
    if target_ms == 0 {
        return 0;
    }
    let total = u128::try_from(cells).unwrap_or(u128::MAX).saturating_mul(8);
    elapsed_ms
        .min(target_ms)
        .saturating_mul(total)
        .checked_div(target_ms)
        .unwrap_or(0)
}

/// Bracketed bar with `label` centred over the fill.
pub(super) fn progress_bar_line(
    elapsed_ms: u128,
    target_ms: u128,
    width: u16,
    no_color: bool,
    label: &str,
) -> Line<'static> {
    let cells = usize::from(width.saturating_sub(2)).max(1);
    let eighths = filled_eighths(elapsed_ms, target_ms, cells);
    let full = usize::try_from(eighths.checked_div(8).unwrap_or(0))
        .unwrap_or(cells)
        .min(cells);
    let partial = usize::try_from(eighths.checked_rem(8).unwrap_or(0)).unwrap_or(0);

    let label: Vec<char> = label.chars().take(cells).collect();
    let label_start = cells.saturating_sub(label.len()) / 2;

    let fill_style = style_color(no_color, rgb(ACCENT_PROGRESS_RGB));
    let label_style = style_color(no_color, rgb(PANEL_TEXT_RGB));

    let mut spans = Vec::with_capacity(cells.saturating_add(2));
    spans.push(Span::raw("["));
    for cell in 0..cells {
        let label_char = cell
            .checked_sub(label_start)
            .and_then(|offset| label.get(offset).copied());
        let span = match label_char {
            Some(ch) => Span::styled(ch.to_string(), label_style),
            None if cell < full => Span::styled("█", fill_style),
            None if cell == full && partial > 0 => Span::styled(
                PARTIAL_BLOCKS
                    .get(partial)
                    .copied()
                    .unwrap_or(' ')
                    .to_string(),
                fill_style,
            ),
            None => Span::raw(" "),
        };
        spans.push(span);
    }
    spans.push(Span::raw("]"));
    Line::from(spans)
}
