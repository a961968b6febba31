//! Tally and log bookkeeping for selected workout blocks.
//!
//! The tally groups selections by block name; the log keeps one entry per
//! selection. Every log entry is counted in exactly one tally entry, so
//! deleting a log entry always decrements the tally it was counted in.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::Block;
use crate::selection::SelectionEvent;

/// Time-derived log entry id, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LogId(i64);

impl LogId {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    pub fn timestamp(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyEntry {
    /// Id of the block that created this entry.
    pub block_id: String,
    pub content: String,
    pub km: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub id: LogId,
    /// Display text, e.g. `Warm-up - 2 km`.
    pub content: String,
    pub block_id: String,
    /// Name of the block, the key of the tally entry this selection counts in.
    pub block_content: String,
}

/// Chart-ready view of the tally, one element per entry in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub counts: Vec<u32>,
    pub distances: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    tally: Vec<TallyEntry>,
    log: Vec<LogEntry>,
    last_id: Option<LogId>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: SelectionEvent) -> LogId {
        self.select_block(&event.block)
    }

    /// Count one selection of `block` and append it to the log.
    pub fn select_block(&mut self, block: &Block) -> LogId {
        self.select_block_at(block, Utc::now().timestamp_millis())
    }

    pub(crate) fn select_block_at(&mut self, block: &Block, now_millis: i64) -> LogId {
        match self.tally.iter_mut().find(|e| e.content == block.content) {
            Some(entry) => entry.count += 1,
            None => self.tally.push(TallyEntry {
                block_id: block.id.clone(),
                content: block.content.clone(),
                km: block.km,
                count: 1,
            }),
        }

        let id = self.next_id(now_millis);
        self.log.push(LogEntry {
            id,
            content: block.label(),
            block_id: block.id.clone(),
            block_content: block.content.clone(),
        });
        debug!(block_id = %block.id, log_id = %id, "block selected");
        id
    }

    /// Remove one log entry and uncount it from the tally.
    ///
    /// Unknown ids are ignored. The tally entry is found through the removed
    /// entry's block name; `block_id` only serves as a consistency check.
    pub fn delete_log_entry(&mut self, log_id: LogId, block_id: &str) -> Option<LogEntry> {
        let Some(pos) = self.log.iter().position(|e| e.id == log_id) else {
            debug!(%log_id, block_id, "delete ignored: no such log entry");
            return None;
        };
        let removed = self.log.remove(pos);
        if removed.block_id != block_id {
            warn!(
                %log_id,
                expected = %removed.block_id,
                got = block_id,
                "block id does not match deleted log entry"
            );
        }

        match self
            .tally
            .iter()
            .position(|e| e.content == removed.block_content)
        {
            Some(idx) => {
                let entry = &mut self.tally[idx];
                entry.count = entry.count.saturating_sub(1);
                if entry.count == 0 {
                    self.tally.remove(idx);
                }
            }
            None => warn!(%log_id, content = %removed.block_content, "no tally entry for deleted log entry"),
        }
        Some(removed)
    }

    pub fn reset(&mut self) {
        debug!(
            tally = self.tally.len(),
            log = self.log.len(),
            "aggregator reset"
        );
        self.tally.clear();
        self.log.clear();
    }

    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries {
            labels: self.tally.iter().map(|e| e.content.clone()).collect(),
            counts: self.tally.iter().map(|e| e.count).collect(),
            distances: self.tally.iter().map(|e| e.km).collect(),
        }
    }

    pub fn tally(&self) -> &[TallyEntry] {
        &self.tally
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn is_empty(&self) -> bool {
        self.tally.is_empty() && self.log.is_empty()
    }

    pub fn total_selections(&self) -> u32 {
        self.tally.iter().map(|e| e.count).sum()
    }

    pub fn total_km(&self) -> f64 {
        self.tally.iter().map(|e| e.km * f64::from(e.count)).sum()
    }

    // Ids stay strictly increasing across resets, even if the clock repeats or steps back.
    fn next_id(&mut self, now_millis: i64) -> LogId {
        let id = match self.last_id {
            Some(LogId(last)) if now_millis <= last => LogId(last + 1),
            _ => LogId(now_millis),
        };
        self.last_id = Some(id);
        id
    }
}
