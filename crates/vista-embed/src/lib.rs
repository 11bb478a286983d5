//! vista-embed
//!
//! Report viewer on top of an opaque embedding widget.

pub mod config;
pub mod error;
pub mod viewer;
pub mod widget;
