use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::aggregator::LogId;
use crate::style;
use crate::types::*;

pub fn is_dialog_open(mode: &Mode) -> bool {
    matches!(mode, Mode::ConfirmReset)
}

pub fn get_block_style(
    current: FocusedBlock,
    target: FocusedBlock,
    mode: &Mode,
) -> ratatui::style::Style {
    use ratatui::style::Style;
    if !is_dialog_open(mode) && current == target {
        Style::default().fg(style::BLUE)
    } else {
        Style::default()
    }
}

pub fn get_dimmed_style(mode: &Mode) -> ratatui::style::Style {
    use ratatui::style::Style;
    if is_dialog_open(mode) {
        Style::default().fg(style::GRAY_DIM)
    } else {
        Style::default()
    }
}

pub fn centered_rect_fixed_height(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical_pad = r.height.saturating_sub(height) / 2;

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(vertical_pad),
            Constraint::Length(height),
            Constraint::Length(vertical_pad),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Distance as written in the catalog: `2` for `2.0`, `1.125` stays `1.125`.
pub fn format_km(km: f64) -> String {
    km.to_string()
}

/// Summed distance, rounded to two decimals to hide float noise.
pub fn format_total_km(km: f64) -> String {
    if km.fract() == 0.0 {
        format!("{km:.0}")
    } else {
        let s = format!("{km:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Digit keys that pick a block directly, e.g. `1-6`.
pub fn quick_pick_keys(blocks: usize) -> String {
    match blocks.min(9) {
        0 => String::new(),
        1 => "1".to_string(),
        n => format!("1-{n}"),
    }
}

pub fn format_log_time(id: LogId) -> String {
    id.timestamp()
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "??:??:??".to_string())
}

/// First visible row of a single-line-item list that keeps `selected` in view.
pub fn list_offset(selected: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    (selected + 1).saturating_sub(height)
}

/// Move a cursor by `delta`, staying inside `0..len`.
pub fn step_cursor(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
