//! Shared utilities for reversion-rs
//!
//! Logging setup and process-level configuration used by the binaries in
//! this workspace. Library crates only emit `tracing` events; installing a
//! subscriber is left to the executable.

pub mod config;
pub mod logging;

pub use config::{Config, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
