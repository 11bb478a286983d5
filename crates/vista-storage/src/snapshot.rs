use vista_core::models::report::ReportRecord;
use vista_core::slot_keys;

use crate::error::StorageError;
use crate::slot::KeyValueSlot;
use crate::state::{load_json, save_json};

/// Snapshot persistence for the report collection.
///
/// The whole collection is written as one JSON array under
/// [`slot_keys::REPORTS`] on every save. There are no incremental writes.
#[derive(Debug, Clone)]
pub struct ReportSnapshot<S> {
    slots: S,
}

impl<S: KeyValueSlot> ReportSnapshot<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Load every persisted record.
    ///
    /// Never fails: a missing, unreadable or corrupt snapshot loads as an
    /// empty collection and is logged.
    pub fn load(&self) -> Vec<ReportRecord> {
        match load_json::<Vec<ReportRecord>>(&self.slots, slot_keys::REPORTS) {
            Ok(Some(records)) => {
                tracing::info!(count = records.len(), "loaded reports from storage");
                records
            }
            Ok(None) => {
                tracing::debug!("no persisted reports");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load reports, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the snapshot with `records`.
    ///
    /// On failure the previously persisted snapshot is left as it was and
    /// the error is returned after being logged.
    pub fn save(&self, records: &[ReportRecord]) -> Result<(), StorageError> {
        match save_json(&self.slots, slot_keys::REPORTS, records) {
            Ok(()) => {
                tracing::debug!(count = records.len(), "saved reports to storage");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, count = records.len(), "failed to save reports");
                Err(e)
            }
        }
    }
}
