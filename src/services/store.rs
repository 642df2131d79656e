//! Review store: the active snapshot and its lifecycle
//!
//! Owned by the top-level initializer and passed to whoever needs it.
//! Everything derived from the snapshot is recomputed on demand, so a
//! `load` or `clear` leaves no stale state behind.

use serde_json::Value;

use crate::services::aggregator::{Aggregator, GroupOptions};
use crate::types::{PublisherView, ReviewRecord};

/// Convert a raw snapshot document into records.
///
/// Non-array input yields an empty snapshot; non-object entries are dropped.
pub fn records_from_json(value: &Value) -> Vec<ReviewRecord> {
    let Some(entries) = value.as_array() else {
        tracing::debug!("snapshot is not an array, treating as empty");
        return Vec::new();
    };

    let records: Vec<ReviewRecord> = entries.iter().filter_map(ReviewRecord::from_value).collect();

    let dropped = entries.len() - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped non-object snapshot entries");
    }

    records
}

/// Holds the current review snapshot
#[derive(Debug, Clone, Default)]
pub struct ReviewStore {
    snapshot: Vec<ReviewRecord>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot wholesale (last load wins)
    pub fn load(&mut self, records: Vec<ReviewRecord>) {
        tracing::debug!(records = records.len(), "snapshot loaded");
        self.snapshot = records;
    }

    /// Replace the snapshot from a raw JSON document
    pub fn load_json(&mut self, value: &Value) {
        self.load(records_from_json(value));
    }

    /// Active snapshot
    pub fn current(&self) -> &[ReviewRecord] {
        &self.snapshot
    }

    /// True iff the snapshot is non-empty
    pub fn is_loaded(&self) -> bool {
        !self.snapshot.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshot.clear();
    }

    /// Distinct non-null location ids in the snapshot
    pub fn distinct_location_count(&self) -> usize {
        Aggregator::distinct_location_count(&self.snapshot)
    }

    /// Publisher views over the current snapshot
    pub fn publisher_views(&self, options: &GroupOptions) -> Vec<PublisherView> {
        Aggregator::to_publisher_views(&self.snapshot, options)
    }

    /// Number of distinct publishers in the snapshot
    pub fn publisher_count(&self) -> usize {
        Aggregator::group_by_publisher(&self.snapshot, &GroupOptions::raw()).len()
    }
}
