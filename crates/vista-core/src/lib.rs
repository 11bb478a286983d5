//! vista-core
//!
//! Pure domain types and storage slot conventions.
//! No I/O. This is the shared vocabulary of the Vista portal.

pub mod error;
pub mod models;
pub mod slot_keys;
