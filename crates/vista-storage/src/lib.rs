//! vista-storage
//!
//! Durable key-value slots and the report snapshot adapter built on them.

pub mod error;
pub mod slot;
pub mod snapshot;
pub mod state;
