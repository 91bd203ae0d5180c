//! CLI-specific output implementations
//!
//! This module turns the coordinator's view state into numbered, colored
//! terminal sections.

pub mod renderer;

pub use renderer::{Entry, EntryKind, ViewRenderer};
