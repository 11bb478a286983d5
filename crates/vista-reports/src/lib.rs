//! vista-reports
//!
//! The report configuration store: an ordered in-memory collection keyed by
//! report id, persisted as a full snapshot after every mutation.

pub mod clock;
pub mod seed;
pub mod store;

pub use store::{ReportStore, SyncState};
