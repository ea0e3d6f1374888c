//! Shared plumbing for the certdeck crates.

pub mod error;
pub mod id;
pub mod paths;
pub mod persist;
