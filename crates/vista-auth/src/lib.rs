//! vista-auth
//!
//! Session and credential boundaries: who is signed in, what they may see,
//! and where embed tokens come from.

pub mod directory;
pub mod error;
pub mod gate;
pub mod session;
pub mod tokens;
