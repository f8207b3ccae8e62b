//! Log directory selection
//!
//! Probes an ordered list of candidate directories for writability and
//! returns the first usable one. The candidate order is fixed: the caller's
//! preferred directory, the user's home directory, a platform default, and
//! finally the current working directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LogError;

/// Fixed name of the transient writability probe file.
pub(crate) const PROBE_FILENAME: &str = "runlog.tmp";

/// How the selected directory relates to the caller's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The caller's preferred directory was used, or no preference was given
    /// and a default was used without rejecting anything.
    Preferred,
    /// The caller's preferred directory was rejected; a fallback is in use.
    Fallback,
}

/// Outcome of a successful directory selection.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The directory that accepted the writability probe.
    pub dir: PathBuf,
    /// Whether the caller's preference was honored.
    pub placement: Placement,
}

/// Select the first writable directory from the candidate list.
///
/// A `None` preferred path is filtered out of the list rather than counted
/// as a failed probe, so defaults chosen in that case still report
/// [`Placement::Preferred`]. Returns [`LogError::NoUsableDirectory`] once
/// the list is exhausted; the candidate list is probed at most once per
/// call.
pub fn select(preferred: Option<&Path>) -> Result<Selection, LogError> {
    if let Some(dir) = preferred {
        // The caller's directory may not exist yet; creation is best effort
        // and the probe below decides whether it is usable.
        let _ = fs::create_dir_all(dir);
    }

    let had_preferred = preferred.is_some();
    for (index, dir) in candidates(preferred).into_iter().enumerate() {
        if probe(&dir) {
            let placement = if had_preferred && index > 0 {
                Placement::Fallback
            } else {
                Placement::Preferred
            };
            tracing::debug!(dir = %dir.display(), ?placement, "selected log directory");
            return Ok(Selection { dir, placement });
        }
        tracing::debug!(dir = %dir.display(), "log directory candidate rejected");
    }

    Err(LogError::NoUsableDirectory)
}

/// Build the ordered candidate list. Candidates that cannot be resolved
/// (no home directory, no working directory) are skipped entirely.
fn candidates(preferred: Option<&Path>) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(4);
    if let Some(dir) = preferred {
        out.push(dir.to_path_buf());
    }
    if let Some(home) = dirs::home_dir() {
        out.push(home);
    }
    out.push(platform_default());
    if let Ok(cwd) = std::env::current_dir() {
        out.push(cwd);
    }
    out
}

#[cfg(windows)]
fn platform_default() -> PathBuf {
    PathBuf::from("C:\\Windows\\system32")
}

#[cfg(not(windows))]
fn platform_default() -> PathBuf {
    PathBuf::from("/var/log")
}

/// Check writability by creating and immediately removing the probe file.
/// No residual probe file survives a successful probe.
fn probe(dir: &Path) -> bool {
    let path = dir.join(PROBE_FILENAME);
    match fs::File::create(&path) {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&path);
            true
        }
        Err(_) => false,
    }
}
