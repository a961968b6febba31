use ratatui::layout::Rect;
use tracing::info;

use crate::aggregator::Aggregator;
use crate::catalog::Catalog;
use crate::handlers::*;
use crate::key_event::{AppKeyEvent, AppMouseEvent};
use crate::selection::SelectionEvent;
use crate::types::*;

/// Central application state shared by the terminal and web front ends.
pub struct AppState {
    pub catalog: Catalog,
    pub catalog_label: String,
    pub aggregator: Aggregator,
    pub mode: Mode,
    pub focused_block: FocusedBlock,
    pub block_selected: usize,
    pub log_selected: usize,
    pub drag: Option<DragState>,
    pub status: Option<String>,
}

impl AppState {
    pub fn new(catalog: Catalog, catalog_label: String) -> Self {
        Self {
            catalog,
            catalog_label,
            aggregator: Aggregator::new(),
            mode: Mode::View,
            focused_block: FocusedBlock::Blocks,
            block_selected: 0,
            log_selected: 0,
            drag: None,
            status: None,
        }
    }

    /// Dispatch a key event to the appropriate handler.
    /// Returns true if the app should quit (only for CLI).
    pub fn handle_key(&mut self, key: AppKeyEvent) -> bool {
        if key.is_ctrl_c() {
            return true;
        }
        match self.mode {
            Mode::View => handle_view_key(self, &key),
            Mode::ConfirmReset => {
                handle_confirm_reset_key(self, &key);
                false
            }
        }
    }

    /// Dispatch a mouse event. `area` is the full frame the UI was drawn into.
    pub fn handle_mouse(&mut self, event: AppMouseEvent, area: Rect) {
        if matches!(self.mode, Mode::View) {
            handle_mouse_event(self, event, area);
        }
    }

    /// Feed a selection into the aggregator and move the log cursor to it.
    pub fn apply_selection(&mut self, event: SelectionEvent) {
        let label = event.block.label();
        self.aggregator.apply(event);
        self.log_selected = self.aggregator.log().len().saturating_sub(1);
        self.status = Some(format!("Added {label}"));
    }

    pub fn reset(&mut self) {
        info!(
            selections = self.aggregator.total_selections(),
            "workout reset"
        );
        self.aggregator.reset();
        self.log_selected = 0;
        self.drag = None;
        self.status = Some("Workout reset".to_string());
    }
}
