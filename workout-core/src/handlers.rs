use ratatui::layout::{Margin, Position, Rect};

use crate::app::AppState;
use crate::key_event::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::selection::{DropTarget, SelectionEvent};
use crate::types::*;
use crate::ui::{app_layout, AppLayout};
use crate::utils::{list_offset, step_cursor};

/// Returns true if the app should quit.
pub fn handle_view_key(state: &mut AppState, key: &AppKeyEvent) -> bool {
    match key.code {
        AppKeyCode::Char('q') => return true,
        AppKeyCode::Tab
        | AppKeyCode::BackTab
        | AppKeyCode::Left
        | AppKeyCode::Right
        | AppKeyCode::Char('h')
        | AppKeyCode::Char('l') => {
            state.focused_block = state.focused_block.toggled();
        }
        AppKeyCode::Up | AppKeyCode::Char('k') => move_cursor(state, -1),
        AppKeyCode::Down | AppKeyCode::Char('j') => move_cursor(state, 1),
        AppKeyCode::Home | AppKeyCode::Char('g') => move_cursor(state, isize::MIN),
        AppKeyCode::End | AppKeyCode::Char('G') => move_cursor(state, isize::MAX),
        AppKeyCode::Enter | AppKeyCode::Char(' ') => {
            if state.focused_block == FocusedBlock::Blocks {
                select_block_at(state, state.block_selected);
            }
        }
        AppKeyCode::Char(c @ '1'..='9') => {
            let idx = c as usize - '1' as usize;
            if idx < state.catalog.len() {
                state.block_selected = idx;
                select_block_at(state, idx);
            }
        }
        AppKeyCode::Char('d') | AppKeyCode::Delete | AppKeyCode::Backspace => {
            if state.focused_block == FocusedBlock::Log {
                delete_selected_log_entry(state);
            }
        }
        AppKeyCode::Char('r') => {
            state.drag = None;
            state.mode = Mode::ConfirmReset;
        }
        _ => {}
    }
    false
}

pub fn handle_confirm_reset_key(state: &mut AppState, key: &AppKeyEvent) {
    match key.code {
        AppKeyCode::Char('y') | AppKeyCode::Enter => {
            state.reset();
            state.mode = Mode::View;
        }
        AppKeyCode::Char('n') | AppKeyCode::Esc => {
            state.mode = Mode::View;
            state.status = Some("Reset cancelled".to_string());
        }
        _ => {}
    }
}

fn move_cursor(state: &mut AppState, delta: isize) {
    match state.focused_block {
        FocusedBlock::Blocks => {
            state.block_selected = step_cursor(state.block_selected, delta, state.catalog.len());
        }
        FocusedBlock::Log => {
            let len = state.aggregator.log().len();
            state.log_selected = step_cursor(state.log_selected, delta, len);
        }
    }
}

fn select_block_at(state: &mut AppState, index: usize) {
    if let Some(block) = state.catalog.get(index) {
        let event = SelectionEvent::click(block);
        state.apply_selection(event);
    }
}

pub fn delete_selected_log_entry(state: &mut AppState) {
    let Some((log_id, block_id)) = state
        .aggregator
        .log()
        .get(state.log_selected)
        .map(|e| (e.id, e.block_id.clone()))
    else {
        return;
    };
    if let Some(removed) = state.aggregator.delete_log_entry(log_id, &block_id) {
        state.status = Some(format!("Deleted {}", removed.content));
    }
    state.log_selected = step_cursor(state.log_selected, 0, state.aggregator.log().len());
}

// ── Mouse ────────────────────────────────────────────────────────────────

pub fn handle_mouse_event(state: &mut AppState, event: AppMouseEvent, area: Rect) {
    let layout = app_layout(area);
    let pos = Position::new(event.column, event.row);
    match event.kind {
        AppMouseKind::LeftDown => {
            if let Some(idx) = block_row_at(state, &layout, pos) {
                state.focused_block = FocusedBlock::Blocks;
                state.block_selected = idx;
                state.drag = Some(DragState {
                    source_index: idx,
                    hovering: false,
                });
            } else if let Some(idx) = log_row_at(state, &layout, pos) {
                state.focused_block = FocusedBlock::Log;
                state.log_selected = idx;
            }
        }
        AppMouseKind::Drag => {
            if let Some(drag) = state.drag.as_mut() {
                drag.hovering = drop_target_at(&layout, pos).is_some();
            }
        }
        AppMouseKind::LeftUp => {
            let Some(drag) = state.drag.take() else {
                return;
            };
            if block_row_at(state, &layout, pos) == Some(drag.source_index) {
                select_block_at(state, drag.source_index);
                return;
            }
            let target = drop_target_at(&layout, pos);
            if let Some(event) = SelectionEvent::from_drag(&state.catalog, drag.source_index, target)
            {
                state.apply_selection(event);
            }
        }
        AppMouseKind::Other => {}
    }
}

fn drop_target_at(layout: &AppLayout, pos: Position) -> Option<DropTarget> {
    if layout.chart.contains(pos) {
        Some(DropTarget::Chart)
    } else if layout.log.contains(pos) {
        Some(DropTarget::Log)
    } else if layout.blocks.contains(pos) {
        Some(DropTarget::Blocks)
    } else {
        None
    }
}

fn row_in_list(panel: Rect, pos: Position, selected: usize, len: usize) -> Option<usize> {
    let inner = panel.inner(Margin::new(1, 1));
    if !inner.contains(pos) {
        return None;
    }
    let offset = list_offset(selected, inner.height as usize);
    let idx = offset + (pos.y - inner.y) as usize;
    (idx < len).then_some(idx)
}

fn block_row_at(state: &AppState, layout: &AppLayout, pos: Position) -> Option<usize> {
    row_in_list(
        layout.blocks,
        pos,
        state.block_selected,
        state.catalog.len(),
    )
}

fn log_row_at(state: &AppState, layout: &AppLayout, pos: Position) -> Option<usize> {
    row_in_list(
        layout.log,
        pos,
        state.log_selected,
        state.aggregator.log().len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn state() -> AppState {
        AppState::new(Catalog::builtin(), "built-in".to_string())
    }

    fn press(state: &mut AppState, code: AppKeyCode) -> bool {
        state.handle_key(AppKeyEvent::plain(code))
    }

    fn mouse(state: &mut AppState, kind: AppMouseKind, pos: Position, area: Rect) {
        state.handle_mouse(
            AppMouseEvent {
                kind,
                column: pos.x,
                row: pos.y,
            },
            area,
        );
    }

    #[test]
    fn enter_selects_highlighted_block() {
        let mut s = state();
        press(&mut s, AppKeyCode::Down);
        press(&mut s, AppKeyCode::Enter);
        press(&mut s, AppKeyCode::Char(' '));
        let series = s.aggregator.chart_series();
        assert_eq!(series.labels, vec!["Active"]);
        assert_eq!(series.counts, vec![2]);
        assert_eq!(s.log_selected, 1);
        assert_eq!(s.status.as_deref(), Some("Added Active - 5 km"));
    }

    #[test]
    fn digit_keys_pick_blocks_directly() {
        let mut s = state();
        press(&mut s, AppKeyCode::Char('6'));
        press(&mut s, AppKeyCode::Char('9'));
        assert_eq!(s.aggregator.log().len(), 1);
        assert_eq!(s.aggregator.log()[0].content, "Ramp Down - 4 km");
        assert_eq!(s.block_selected, 5);
    }

    #[test]
    fn delete_only_acts_in_log_focus() {
        let mut s = state();
        press(&mut s, AppKeyCode::Enter);
        press(&mut s, AppKeyCode::Char('d'));
        assert_eq!(s.aggregator.log().len(), 1);

        press(&mut s, AppKeyCode::Tab);
        assert_eq!(s.focused_block, FocusedBlock::Log);
        press(&mut s, AppKeyCode::Char('d'));
        assert!(s.aggregator.is_empty());
        assert_eq!(s.status.as_deref(), Some("Deleted Warm-up - 2 km"));
        press(&mut s, AppKeyCode::Delete);
        assert!(s.aggregator.is_empty());
    }

    #[test]
    fn log_cursor_is_clamped_after_delete() {
        let mut s = state();
        for c in ['1', '2', '3'] {
            press(&mut s, AppKeyCode::Char(c));
        }
        press(&mut s, AppKeyCode::Tab);
        assert_eq!(s.log_selected, 2);
        press(&mut s, AppKeyCode::Char('d'));
        assert_eq!(s.log_selected, 1);
        assert_eq!(
            s.aggregator.chart_series().labels,
            vec!["Warm-up", "Active"]
        );
        press(&mut s, AppKeyCode::Home);
        press(&mut s, AppKeyCode::Char('d'));
        assert_eq!(s.aggregator.log()[0].content, "Active - 5 km");
        assert_eq!(s.log_selected, 0);
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut s = state();
        press(&mut s, AppKeyCode::Char('1'));
        press(&mut s, AppKeyCode::Char('r'));
        assert_eq!(s.mode, Mode::ConfirmReset);
        press(&mut s, AppKeyCode::Char('1'));
        assert_eq!(s.aggregator.log().len(), 1);
        press(&mut s, AppKeyCode::Esc);
        assert_eq!(s.mode, Mode::View);
        assert_eq!(s.aggregator.log().len(), 1);

        press(&mut s, AppKeyCode::Char('r'));
        press(&mut s, AppKeyCode::Char('y'));
        assert_eq!(s.mode, Mode::View);
        assert!(s.aggregator.is_empty());
        assert!(s.aggregator.chart_series().is_empty());
    }

    #[test]
    fn quit_keys() {
        let mut s = state();
        assert!(press(&mut s, AppKeyCode::Char('q')));
        assert!(s.handle_key(AppKeyEvent {
            code: AppKeyCode::Char('c'),
            ctrl: true,
            alt: false,
            shift: false,
        }));
        assert!(!press(&mut s, AppKeyCode::Char('x')));
    }

    #[test]
    fn cursor_moves_within_focused_list() {
        let mut s = state();
        press(&mut s, AppKeyCode::End);
        assert_eq!(s.block_selected, 5);
        press(&mut s, AppKeyCode::Down);
        assert_eq!(s.block_selected, 5);
        press(&mut s, AppKeyCode::Char('k'));
        assert_eq!(s.block_selected, 4);
        press(&mut s, AppKeyCode::Right);
        press(&mut s, AppKeyCode::Down);
        assert_eq!(s.log_selected, 0);
        assert_eq!(s.block_selected, 4);
    }

    #[test]
    fn click_on_block_row_selects_it() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = app_layout(area);
        let mut s = state();
        let row = Position::new(layout.blocks.x + 2, layout.blocks.y + 1 + 2);
        mouse(&mut s, AppMouseKind::LeftDown, row, area);
        assert!(s.drag.is_some());
        mouse(&mut s, AppMouseKind::LeftUp, row, area);
        assert!(s.drag.is_none());
        assert_eq!(s.aggregator.log()[0].content, "Cool-down - 3 km");
    }

    #[test]
    fn drag_onto_chart_selects_and_drop_elsewhere_does_not() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = app_layout(area);
        let mut s = state();
        let source = Position::new(layout.blocks.x + 2, layout.blocks.y + 1);
        let chart = Position::new(layout.chart.x + 5, layout.chart.y + 5);

        mouse(&mut s, AppMouseKind::LeftDown, source, area);
        mouse(&mut s, AppMouseKind::Drag, chart, area);
        assert!(s.drag.map(|d| d.hovering).unwrap_or(false));
        mouse(&mut s, AppMouseKind::LeftUp, chart, area);
        assert_eq!(s.aggregator.chart_series().labels, vec!["Warm-up"]);

        mouse(&mut s, AppMouseKind::LeftDown, source, area);
        mouse(&mut s, AppMouseKind::LeftUp, Position::new(layout.header.x, layout.header.y), area);
        assert_eq!(s.aggregator.log().len(), 1);
    }

    #[test]
    fn drag_to_another_block_row_selects_the_source() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = app_layout(area);
        let mut s = state();
        let first = Position::new(layout.blocks.x + 2, layout.blocks.y + 1);
        let fourth = Position::new(layout.blocks.x + 2, layout.blocks.y + 1 + 3);

        mouse(&mut s, AppMouseKind::LeftDown, first, area);
        mouse(&mut s, AppMouseKind::Drag, fourth, area);
        assert!(s.drag.map(|d| d.hovering).unwrap_or(false));
        mouse(&mut s, AppMouseKind::LeftUp, fourth, area);
        assert!(s.drag.is_none());
        assert_eq!(s.aggregator.log().len(), 1);
        assert_eq!(s.aggregator.log()[0].content, "Warm-up - 2 km");
    }

    #[test]
    fn mouse_is_ignored_while_dialog_is_open() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = app_layout(area);
        let mut s = state();
        press(&mut s, AppKeyCode::Char('r'));
        let row = Position::new(layout.blocks.x + 2, layout.blocks.y + 1);
        mouse(&mut s, AppMouseKind::LeftDown, row, area);
        mouse(&mut s, AppMouseKind::LeftUp, row, area);
        assert!(s.aggregator.is_empty());
    }
}
