//! vista-cli library root.
//!
//! Re-exports internal modules so integration tests can drive commands
//! directly without spawning the binary.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
