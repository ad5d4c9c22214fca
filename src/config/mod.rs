//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (platform config dir)
//! 3. Project config (.venue-assist/config.toml)
//! 4. Environment variables (VENUE_ASSIST_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
