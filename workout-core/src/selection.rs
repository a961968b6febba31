use crate::catalog::{Block, Catalog};

/// Panel a dragged block was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Another row of the block list, the drop zone of the web page.
    Blocks,
    Chart,
    Log,
}

/// A block chosen by the user, either clicked or dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub block: Block,
}

impl SelectionEvent {
    pub fn click(block: &Block) -> Self {
        Self {
            block: block.clone(),
        }
    }

    /// A completed drag of the block at `source_index`. Drops without a target yield nothing.
    pub fn from_drag(
        catalog: &Catalog,
        source_index: usize,
        destination: Option<DropTarget>,
    ) -> Option<Self> {
        destination?;
        catalog.get(source_index).map(Self::click)
    }
}
