use ratatui::style::{Color, Style};

use crate::metrics::StatusLabel;

pub(super) const UI_MARGIN: u16 = 1;
pub(super) const HEADER_HEIGHT: u16 = 3;
pub(super) const PROGRESS_HEIGHT: u16 = 3;
pub(super) const STATS_HEIGHT: u16 = 7;
pub(super) const FOOTER_HEIGHT: u16 = 1;
pub(super) const STATUS_MIN_HEIGHT: u16 = 4;
pub(super) const PANEL_BG_RGB: (u8, u8, u8) = (0x0a, 0x0a, 0x0a);
pub(super) const PANEL_BORDER_RGB: (u8, u8, u8) = (0xe5, 0xe7, 0xeb);
pub(super) const PANEL_TEXT_RGB: (u8, u8, u8) = (0xff, 0xff, 0xff);
pub(super) const PANEL_MUTED_RGB: (u8, u8, u8) = (0xd1, 0xd5, 0xdb);
pub(super) const ACCENT_PROGRESS_RGB: (u8, u8, u8) = (0x22, 0xd3, 0xee);
pub(super) const ACCENT_RATE_RGB: (u8, u8, u8) = (0x60, 0xa5, 0xfa);
pub(super) const ACCENT_LATENCY_RGB: (u8, u8, u8) = (0xf4, 0x72, 0xb6);
pub(super) const ACCENT_GREEN_RGB: (u8, u8, u8) = (0x22, 0xc5, 0x5e);
pub(super) const ACCENT_CYAN_RGB: (u8, u8, u8) = (0x06, 0xb6, 0xd4);
pub(super) const ACCENT_AMBER_RGB: (u8, u8, u8) = (0xf5, 0x9e, 0x0b);
pub(super) const ACCENT_RED_RGB: (u8, u8, u8) = (0xef, 0x44, 0x44);

pub(super) fn style_color(no_color: bool, color: Color) -> Style {
    if no_color {
        Style::default()
    } else {
        Style::default().fg(color)
    }
}

pub(super) const fn rgb(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub(super) fn panel_border_style(no_color: bool) -> Style {
    if no_color {
        Style::default()
    } else {
        Style::default().fg(rgb(PANEL_BORDER_RGB))
    }
}

pub(super) fn app_background_style(no_color: bool) -> Style {
    if no_color {
        Style::default()
    } else {
        Style::default().bg(rgb(PANEL_BG_RGB))
    }
}

pub(super) fn muted_style(no_color: bool) -> Style {
    style_color(no_color, rgb(PANEL_MUTED_RGB))
}

/// 2xx green, 3xx cyan, 4xx amber, everything else red.
pub(crate) const fn status_rgb(label: StatusLabel) -> (u8, u8, u8) {
    match label.class() {
        Some(2) => ACCENT_GREEN_RGB,
        Some(3) => ACCENT_CYAN_RGB,
        Some(4) => ACCENT_AMBER_RGB,
        Some(_) | None => ACCENT_RED_RGB,
    }
}
