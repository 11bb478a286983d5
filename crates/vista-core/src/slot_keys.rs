//! Storage slot key conventions.
//!
//! Every durable value lives in exactly one slot. These names are shared by
//! the front end and the storage adapters, so changing one orphans the data
//! already stored under the old name.

/// JSON array of every report record.
pub const REPORTS: &str = "powerbi_reports";

/// The signed-in user, restored on the next start.
pub const CURRENT_USER: &str = "currentUser";
