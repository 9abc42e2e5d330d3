//! Sitcom Simulator Common Utilities
//!
//! Shared infrastructure for all Sitcom Simulator crates:
//! - Error taxonomy and result aliases
//! - Clock/sleep abstraction for paced provider polling
//! - Scoped per-run work directories
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod workdir;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use workdir::WorkDir;
