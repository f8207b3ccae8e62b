//! Process-local rotating file logger
//!
//! This library selects a writable log directory (falling back through a
//! fixed candidate list when the caller's choice is unusable), rotates a
//! bounded set of numbered history files, and appends timestamped log lines
//! through a re-entrant, thread-safe writer.

pub mod config;
pub mod directory;
pub mod error;
pub mod global;
pub mod logger;
pub mod rotation;

pub use config::LogConfig;
pub use directory::{Placement, Selection};
pub use error::LogError;
pub use logger::AppendLogger;

/// Crate version, for embedding applications that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
