// ── Enums ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    View,
    ConfirmReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedBlock {
    #[default]
    Blocks,
    Log,
}

impl FocusedBlock {
    pub fn toggled(self) -> Self {
        match self {
            FocusedBlock::Blocks => FocusedBlock::Log,
            FocusedBlock::Log => FocusedBlock::Blocks,
        }
    }
}

// ── Drag ─────────────────────────────────────────────────────────────────

/// A block row that was pressed and not yet released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub source_index: usize,
    pub hovering: bool,
}
