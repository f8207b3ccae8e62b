//! Error types for logger startup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures raised during startup.
///
/// A rejected preferred directory with a usable fallback is not an error;
/// it is reported as [`Placement::Fallback`](crate::directory::Placement).
/// Missing rotation sources are expected and never surface here.
#[derive(Debug, Error)]
pub enum LogError {
    /// No candidate directory accepted the writability probe.
    #[error("no usable log directory among candidates")]
    NoUsableDirectory,

    /// The selected directory was usable but the live file could not be opened.
    #[error("failed to open live log file {}: {source}", path.display())]
    LiveFileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Process-wide logging was started while already active.
    #[error("logging already started for this process")]
    AlreadyStarted,
}
