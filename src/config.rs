//! Startup configuration for the logger.

use std::path::PathBuf;

/// Filename prefix used when the caller supplies none.
pub const DEFAULT_PREFIX: &str = "runlog";

/// Number of numbered history slots retained by rotation.
pub const DEFAULT_HISTORY_SLOTS: usize = 10;

/// Configuration for [`AppendLogger::startup`](crate::AppendLogger::startup).
///
/// The defaults match the process-wide facade: no preferred directory (the
/// fallback list decides), prefix [`DEFAULT_PREFIX`], and
/// [`DEFAULT_HISTORY_SLOTS`] history files.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Preferred log directory; the fallback list is probed when this is
    /// unset or unusable.
    pub directory: Option<PathBuf>,

    /// Filename prefix for the live file and its history slots.
    pub prefix: String,

    /// Number of numbered history slots retained by rotation.
    pub history_slots: usize,
}

impl LogConfig {
    /// Create a configuration with the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preferred log directory.
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    /// Set the filename prefix for the log stream.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the number of history slots retained by rotation.
    pub fn history_slots(mut self, slots: usize) -> Self {
        self.history_slots = slots;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: None,
            prefix: DEFAULT_PREFIX.to_string(),
            history_slots: DEFAULT_HISTORY_SLOTS,
        }
    }
}
