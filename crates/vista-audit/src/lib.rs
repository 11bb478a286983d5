//! vista-audit
//!
//! Structured audit events for portal actions.

pub mod events;

pub use events::{AuditAction, AuditEvent};
