use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph};

use crate::aggregator::ChartSeries;
use crate::app::AppState;
use crate::style;
use crate::types::*;
use crate::utils::*;

// Bars carry one decimal of distance.
const BAR_SCALE: u64 = 10;

// ── Layout ───────────────────────────────────────────────────────────────

/// Screen areas, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    pub blocks: Rect,
    pub chart: Rect,
    pub log: Rect,
    pub footer: Rect,
}

pub fn app_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Header
            Constraint::Percentage(55), // Blocks + chart
            Constraint::Min(5),         // Log
            Constraint::Length(1),      // Status
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(67)])
        .split(chunks[1]);

    AppLayout {
        header: chunks[0],
        blocks: top[0],
        chart: top[1],
        log: chunks[2],
        footer: chunks[3],
    }
}

// ── Main UI ──────────────────────────────────────────────────────────────

/// Render the entire UI.
///
/// `header_text` is the text shown in the header bar (e.g. "Catalog: built-in").
pub fn ui(f: &mut ratatui::Frame, state: &AppState, header_text: &str) {
    let layout = app_layout(f.area());
    let dimmed = get_dimmed_style(&state.mode);

    let header = Paragraph::new(Line::from(header_text.to_string()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Workout Planner")
                .style(dimmed),
        )
        .style(dimmed);
    f.render_widget(header, layout.header);

    render_blocks_panel(f, state, layout.blocks);
    render_chart_panel(f, state, layout.chart);
    render_log_panel(f, state, layout.log);
    render_status_line(f, state, layout.footer);
    render_reset_dialog(f, state);
}

fn item_style(highlight: bool) -> Style {
    if highlight {
        Style::default()
            .fg(style::BLUE)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn hint(text: impl Into<String>) -> Span<'static> {
    Span::styled(text.into(), Style::default().fg(style::GRAY_DIM))
}

fn render_blocks_panel(f: &mut ratatui::Frame, state: &AppState, area: Rect) {
    let dimmed = get_dimmed_style(&state.mode);
    let focused = state.focused_block == FocusedBlock::Blocks && !is_dialog_open(&state.mode);

    let items: Vec<ListItem> = state
        .catalog
        .blocks()
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let is_selected = i == state.block_selected;
            let dragging = state.drag.is_some_and(|d| d.source_index == i);
            let prefix = if i < 9 {
                format!("{}. ", i + 1)
            } else {
                "   ".to_string()
            };
            let mut spans = vec![Span::styled(
                format!("{prefix}{}", block.label()),
                item_style((is_selected && focused) || dragging),
            )];
            if dragging {
                spans.push(hint(" (drop on graph)"));
            } else if is_selected && focused {
                spans.push(hint(" (Enter: add)"));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let panel = Block::default()
        .borders(Borders::ALL)
        .title("Workout Blocks (↑↓ move • Tab focus)")
        .style(dimmed)
        .border_style(get_block_style(
            state.focused_block,
            FocusedBlock::Blocks,
            &state.mode,
        ));

    let list = List::new(items).block(panel).style(dimmed);
    let mut stateful = ListState::default();
    if !state.catalog.is_empty() {
        stateful.select(Some(state.block_selected.min(state.catalog.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut stateful);
}

fn chart_title(state: &AppState) -> String {
    let selections = state.aggregator.total_selections();
    if selections == 0 {
        return "Workout Graph".to_string();
    }
    let noun = if selections == 1 {
        "selection"
    } else {
        "selections"
    };
    format!(
        "Workout Graph ({selections} {noun} • {} km total)",
        format_total_km(state.aggregator.total_km())
    )
}

fn bar_groups(series: &ChartSeries) -> Vec<BarGroup<'static>> {
    series
        .labels
        .iter()
        .zip(&series.counts)
        .zip(&series.distances)
        .map(|((label, count), km)| {
            let bars = [
                Bar::default()
                    .value(u64::from(*count) * BAR_SCALE)
                    .text_value(count.to_string())
                    .style(Style::default().fg(style::COUNT_BAR))
                    .value_style(Style::default().fg(Color::Black).bg(style::COUNT_BAR)),
                Bar::default()
                    .value((km * BAR_SCALE as f64).round() as u64)
                    .text_value(format_km(*km))
                    .style(Style::default().fg(style::DISTANCE_BAR))
                    .value_style(Style::default().fg(Color::Black).bg(style::DISTANCE_BAR)),
            ];
            BarGroup::default()
                .label(Line::from(label.clone()))
                .bars(&bars)
        })
        .collect()
}

fn render_chart_panel(f: &mut ratatui::Frame, state: &AppState, area: Rect) {
    let dimmed = get_dimmed_style(&state.mode);
    let hovering = state.drag.is_some_and(|d| d.hovering);
    let border_style = if hovering {
        Style::default().fg(style::YELLOW)
    } else {
        dimmed
    };

    let legend = Line::from(vec![
        Span::styled("■ count", Style::default().fg(style::COUNT_BAR)),
        Span::raw("  "),
        Span::styled("■ distance (km)", Style::default().fg(style::DISTANCE_BAR)),
    ]);
    let panel = Block::default()
        .borders(Borders::ALL)
        .title(chart_title(state))
        .title_bottom(legend)
        .style(dimmed)
        .border_style(border_style);

    let series = state.aggregator.chart_series();
    if series.is_empty() {
        let placeholder = Paragraph::new("No blocks added yet.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(style::GRAY_DIM))
            .block(panel);
        f.render_widget(placeholder, area);
        return;
    }

    let groups = series.labels.len() as u16;
    let (bar_width, group_gap) = chart_dimensions(area.width.saturating_sub(2), groups);

    let mut chart = BarChart::default()
        .block(panel)
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(group_gap);
    for group in bar_groups(&series) {
        chart = chart.data(group);
    }
    f.render_widget(chart, area);
}

/// Bar width and group gap that fit every group in `inner_width`, giving up the gap first.
fn chart_dimensions(inner_width: u16, groups: u16) -> (u16, u16) {
    let groups = groups.max(1);
    for gap in [2u16, 1, 0] {
        let spare = inner_width.saturating_sub(gap.saturating_mul(groups - 1));
        let bar_width = spare / groups.saturating_mul(2);
        if bar_width >= 1 {
            return (bar_width.min(9), gap);
        }
    }
    (1, 0)
}

fn render_log_panel(f: &mut ratatui::Frame, state: &AppState, area: Rect) {
    let dimmed = get_dimmed_style(&state.mode);
    let focused = state.focused_block == FocusedBlock::Log && !is_dialog_open(&state.mode);
    let log = state.aggregator.log();

    let panel = Block::default()
        .borders(Borders::ALL)
        .title(format!("Workout Log ({})", log.len()))
        .style(dimmed)
        .border_style(get_block_style(
            state.focused_block,
            FocusedBlock::Log,
            &state.mode,
        ));

    if log.is_empty() {
        let placeholder = Paragraph::new("No workouts logged yet.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(style::GRAY_DIM))
            .block(panel);
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = log
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let highlight = focused && i == state.log_selected;
            let mut spans = vec![
                Span::styled(
                    format!("{}  ", format_log_time(entry.id)),
                    Style::default().fg(style::GRAY_DIM),
                ),
                Span::styled(entry.content.clone(), item_style(highlight)),
            ];
            if highlight {
                spans.push(hint(" (d: delete)"));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(panel).style(dimmed);
    let mut stateful = ListState::default();
    stateful.select(Some(state.log_selected.min(log.len() - 1)));
    f.render_stateful_widget(list, area, &mut stateful);
}

fn render_status_line(f: &mut ratatui::Frame, state: &AppState, area: Rect) {
    let mut spans = Vec::new();
    if let Some(status) = &state.status {
        spans.push(Span::styled(
            format!("{status} "),
            Style::default().fg(style::YELLOW),
        ));
    }
    let keys = quick_pick_keys(state.catalog.len());
    #[cfg(feature = "web")]
    let help_text = format!("Enter/{keys}: add • Tab: focus • d: delete • r: reset");
    #[cfg(not(feature = "web"))]
    let help_text =
        format!("Enter/{keys}: add • drag block to graph • d: delete • r: reset • q: quit");
    spans.push(hint(help_text));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Dialogs ──────────────────────────────────────────────────────────────

fn render_reset_dialog(f: &mut ratatui::Frame, state: &AppState) {
    if !matches!(state.mode, Mode::ConfirmReset) {
        return;
    }

    let area = centered_rect_fixed_height(60, 4, f.area());
    f.render_widget(ratatui::widgets::Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Reset workout?")
        .border_style(Style::default().fg(style::RED));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Message
            Constraint::Min(1),    // Help
        ])
        .split(inner);

    let entries = state.aggregator.log().len();
    f.render_widget(
        Paragraph::new(format!("Clear the graph and {entries} log entries")),
        layout[0],
    );
    f.render_widget(
        Paragraph::new("y/Enter: reset • n/Esc: cancel").style(Style::default().fg(style::GRAY_DIM)),
        layout[1],
    );
}
