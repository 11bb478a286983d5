use indexmap::IndexMap;
use uuid::Uuid;

use vista_core::models::report::{ReportPatch, ReportRecord};
use vista_storage::slot::KeyValueSlot;
use vista_storage::snapshot::ReportSnapshot;

use crate::clock::{Clock, SystemClock};
use crate::seed;

/// Whether the persisted snapshot matches the in-memory collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    InSync,
    /// The last save failed. In-memory changes are live but will not
    /// survive a restart until a later save succeeds.
    Diverged { error: String },
}

impl SyncState {
    pub fn is_diverged(&self) -> bool {
        matches!(self, SyncState::Diverged { .. })
    }
}

/// Owner of every report record.
///
/// Construct one per process with [`ReportStore::open`] and hand it to
/// whatever needs it. Reads return clones; every mutation stamps
/// `lastUpdated` (except deletion) and writes the full collection back
/// through the snapshot adapter.
pub struct ReportStore<S> {
    reports: IndexMap<String, ReportRecord>,
    snapshot: ReportSnapshot<S>,
    clock: Box<dyn Clock>,
    sync: SyncState,
}

impl<S: KeyValueSlot> ReportStore<S> {
    /// Load the persisted collection and seed the sample record if it is empty.
    pub fn open(slots: S) -> Self {
        Self::open_with_clock(slots, Box::new(SystemClock))
    }

    pub fn open_with_clock(slots: S, clock: Box<dyn Clock>) -> Self {
        let mut store = Self::open_unseeded_with_clock(slots, clock);
        if store.reports.is_empty() {
            let sample = seed::sample_report();
            tracing::info!(report_id = %sample.id, "seeding empty report store");
            store.reports.insert(sample.id.clone(), sample);
            store.persist();
        }
        store
    }

    /// Load the persisted collection as is, even when it is empty.
    pub fn open_unseeded(slots: S) -> Self {
        Self::open_unseeded_with_clock(slots, Box::new(SystemClock))
    }

    pub fn open_unseeded_with_clock(slots: S, clock: Box<dyn Clock>) -> Self {
        let snapshot = ReportSnapshot::new(slots);
        let mut reports = IndexMap::new();
        for record in snapshot.load() {
            if reports.contains_key(&record.id) {
                tracing::warn!(report_id = %record.id, "duplicate report id in snapshot, keeping the later one");
            }
            reports.insert(record.id.clone(), record);
        }

        Self {
            reports,
            snapshot,
            clock,
            sync: SyncState::InSync,
        }
    }

    pub fn get_report(&self, id: &str) -> Option<ReportRecord> {
        self.reports.get(id).cloned()
    }

    /// Every record in insertion order. No role or status filtering.
    pub fn get_all_reports(&self) -> Vec<ReportRecord> {
        self.reports.values().cloned().collect()
    }

    /// Insert or fully replace a record.
    ///
    /// An empty id is replaced with a fresh UUID. Replacing keeps the
    /// record's position in the collection. Returns the stored copy.
    pub fn save_report(&mut self, mut record: ReportRecord) -> ReportRecord {
        if record.id.trim().is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        record.last_updated = self.clock.stamp();

        let replaced = self
            .reports
            .insert(record.id.clone(), record.clone())
            .is_some();
        tracing::info!(report_id = %record.id, replaced, "report saved");

        self.persist();
        record
    }

    /// Merge `patch` onto an existing record.
    ///
    /// Returns `None` and writes nothing when `id` is unknown.
    pub fn update_report(&mut self, id: &str, patch: ReportPatch) -> Option<ReportRecord> {
        let stamp = self.clock.stamp();
        let Some(existing) = self.reports.get_mut(id) else {
            tracing::debug!(report_id = %id, "update of unknown report ignored");
            return None;
        };

        patch.apply_to(existing);
        existing.last_updated = stamp;
        let updated = existing.clone();
        tracing::info!(report_id = %id, "report updated");

        self.persist();
        Some(updated)
    }

    /// Flip `isActive`. Returns the new value, or `None` for an unknown id.
    pub fn toggle_report_status(&mut self, id: &str) -> Option<bool> {
        let stamp = self.clock.stamp();
        let existing = self.reports.get_mut(id)?;

        existing.is_active = !existing.is_active;
        existing.last_updated = stamp;
        let is_active = existing.is_active;
        tracing::info!(report_id = %id, is_active, "report status toggled");

        self.persist();
        Some(is_active)
    }

    /// Remove a record. Returns whether one was removed.
    pub fn delete_report(&mut self, id: &str) -> bool {
        if self.reports.shift_remove(id).is_none() {
            return false;
        }
        tracing::info!(report_id = %id, "report deleted");
        self.persist();
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.reports.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    /// Retry writing the snapshot, e.g. after storage was freed up.
    pub fn flush(&mut self) -> &SyncState {
        self.persist();
        &self.sync
    }

    fn persist(&mut self) {
        let records: Vec<ReportRecord> = self.reports.values().cloned().collect();
        self.sync = match self.snapshot.save(&records) {
            Ok(()) => SyncState::InSync,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "report changes are only held in memory until the next successful save"
                );
                SyncState::Diverged {
                    error: e.to_string(),
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use vista_storage::slot::MemorySlots;

    use super::*;
    use crate::clock::FixedClock;

    fn store() -> ReportStore<MemorySlots> {
        ReportStore::open_unseeded_with_clock(
            MemorySlots::new(),
            Box::new(FixedClock::new("2030-01-01 09:00 AM")),
        )
    }

    #[test]
    fn save_assigns_an_id_when_missing() {
        let mut store = store();
        let saved = store.save_report(ReportRecord {
            name: "Untitled".to_string(),
            ..Default::default()
        });
        assert!(Uuid::parse_str(&saved.id).is_ok());
        assert_eq!(store.get_report(&saved.id), Some(saved));
    }

    #[test]
    fn stamps_come_from_the_injected_clock() {
        struct Ticks(std::cell::Cell<u32>);

        impl Clock for Ticks {
            fn stamp(&self) -> String {
                self.0.set(self.0.get() + 1);
                format!("tick {}", self.0.get())
            }
        }

        let mut store =
            ReportStore::open_unseeded_with_clock(MemorySlots::new(), Box::new(Ticks(0.into())));
        let saved = store.save_report(ReportRecord {
            id: "a".to_string(),
            ..Default::default()
        });
        assert_eq!(saved.last_updated, "tick 1");
        assert_eq!(store.toggle_report_status("a"), Some(true));
        assert_eq!(store.get_report("a").unwrap().last_updated, "tick 2");
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = store();
        for id in ["a", "b", "c"] {
            store.save_report(ReportRecord {
                id: id.to_string(),
                ..Default::default()
            });
        }
        store.save_report(ReportRecord {
            id: "a".to_string(),
            name: "renamed".to_string(),
            ..Default::default()
        });

        let ids: Vec<String> = store.get_all_reports().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(store.get_report("a").unwrap().name, "renamed");
    }

    #[test]
    fn delete_preserves_order_of_the_rest() {
        let mut store = store();
        for id in ["a", "b", "c"] {
            store.save_report(ReportRecord {
                id: id.to_string(),
                ..Default::default()
            });
        }
        assert!(store.delete_report("b"));
        let ids: Vec<String> = store.get_all_reports().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn failed_write_marks_store_diverged_until_flushed() {
        let slots = MemorySlots::new();
        let mut store = ReportStore::open(slots.clone());
        assert_eq!(store.sync_state(), &SyncState::InSync);

        slots.set_fail_writes(true);
        assert_eq!(store.toggle_report_status("report1"), Some(false));
        assert!(store.sync_state().is_diverged());
        // in-memory state is still updated
        assert!(!store.get_report("report1").unwrap().is_active);

        slots.set_fail_writes(false);
        assert_eq!(store.flush(), &SyncState::InSync);
        let reopened = ReportStore::open(slots);
        assert!(!reopened.get_report("report1").unwrap().is_active);
    }
}
