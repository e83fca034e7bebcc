//! Configuration for the demo shell binary.
//!
//! Loaded once at startup from a TOML file; the running engine never reads
//! it again.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, EngineConfig, ShellConfig};
