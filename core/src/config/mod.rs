//! Minimal configuration module for scrap core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{ProjectConfig, DEFAULT_BASE_URL, DEFAULT_DEBOUNCE_MS};
