//! Process-wide logging facade
//!
//! Wraps a single [`AppendLogger`] in a process-global slot with explicit
//! init/teardown, for callers that do not want to thread a logger value
//! through their program. [`startup`] and [`shutdown`] bracket the logging
//! window; [`vlog`] calls outside that window are silently dropped.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::LogConfig;
use crate::directory::Placement;
use crate::error::LogError;
use crate::logger::AppendLogger;

static ACTIVE: RwLock<Option<Arc<AppendLogger>>> = RwLock::new(None);

/// Start process-wide logging.
///
/// `preferred` and `prefix` fall back to the probe list and
/// [`DEFAULT_PREFIX`](crate::config::DEFAULT_PREFIX) when absent. Starting
/// while already active returns [`LogError::AlreadyStarted`] and leaves the
/// running logger untouched.
pub fn startup(preferred: Option<&Path>, prefix: Option<&str>) -> Result<Placement, LogError> {
    let mut slot = ACTIVE.write();
    if slot.is_some() {
        return Err(LogError::AlreadyStarted);
    }

    let mut config = LogConfig::new();
    if let Some(dir) = preferred {
        config = config.directory(dir);
    }
    if let Some(prefix) = prefix {
        config = config.prefix(prefix);
    }

    let (logger, placement) = AppendLogger::startup(config)?;
    *slot = Some(Arc::new(logger));
    Ok(placement)
}

/// Stop process-wide logging.
///
/// Appends already in flight on other threads finish against the old
/// handle; the file closes once the last of them returns. Calling this
/// while inactive is a no-op.
pub fn shutdown() {
    ACTIVE.write().take();
}

/// Directory actually in use, or `None` while logging is not active.
pub fn dirname() -> Option<PathBuf> {
    ACTIVE.read().as_ref().map(|l| l.dirname().to_path_buf())
}

/// Append one entry through the process-wide logger.
///
/// The slot lock is released before the entry is written, so nested calls
/// from the same thread go straight to the logger's own re-entrant lock.
/// A no-op while logging is not active.
pub fn vlog(source: &str, line: u32, args: fmt::Arguments<'_>) {
    let logger = ACTIVE.read().as_ref().map(Arc::clone);
    if let Some(logger) = logger {
        logger.append(source, line, args);
    }
}

/// Append a formatted entry to the process-wide log, tagged with the
/// calling file and line.
///
/// ```
/// runlog::runlog!("listening on port {}", 8080);
/// ```
#[macro_export]
macro_rules! runlog {
    ($($arg:tt)*) => {
        $crate::global::vlog(file!(), line!(), format_args!($($arg)*))
    };
}
