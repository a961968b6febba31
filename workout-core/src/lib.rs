pub mod aggregator;
pub mod app;
pub mod catalog;
pub mod handlers;
pub mod key_event;
pub mod selection;
pub mod style;
pub mod types;
pub mod ui;
pub mod utils;

pub use aggregator::{Aggregator, ChartSeries, LogEntry, LogId, TallyEntry};
pub use catalog::{Block, Catalog, CatalogError};
pub use selection::{DropTarget, SelectionEvent};
