//! Bounded log file rotation
//!
//! Preserves a limited history of previous runs without unbounded growth:
//! each numbered history file ages by one slot, the previous live file
//! becomes slot 0, and the oldest slot falls off the end.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_HISTORY_SLOTS;

/// Rotate with the default history depth.
///
/// Returns the number of files actually moved.
pub fn rotate(dir: &Path, prefix: &str) -> usize {
    rotate_slots(dir, prefix, DEFAULT_HISTORY_SLOTS)
}

/// Rotate `prefix` and its numbered history inside `dir`, keeping at most
/// `slots` history files.
///
/// Slot `i` is renamed to slot `i + 1` from the oldest downwards, then the
/// unsuffixed live file is renamed to slot 0, leaving the prefix name free
/// for a fresh live file. Sources that do not exist are expected (first
/// run, short history) and skipped. Returns the number of renames
/// performed.
pub fn rotate_slots(dir: &Path, prefix: &str, slots: usize) -> usize {
    let mut moved = 0;

    // Oldest first, so every rename moves into a name that was just freed
    // (or into the expiring oldest slot).
    for i in (0..slots.saturating_sub(1)).rev() {
        if shift(&slot_path(dir, prefix, i), &slot_path(dir, prefix, i + 1)) {
            moved += 1;
        }
    }

    if slots > 0 && shift(&dir.join(prefix), &slot_path(dir, prefix, 0)) {
        moved += 1;
    }

    moved
}

fn slot_path(dir: &Path, prefix: &str, slot: usize) -> PathBuf {
    dir.join(format!("{prefix}.{slot}"))
}

/// Best-effort rename. A missing source is not an error; any other failure
/// is unexpected and reported, but never aborts the rotation.
fn shift(from: &Path, to: &Path) -> bool {
    match fs::rename(from, to) {
        Ok(()) => true,
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(err) => {
            tracing::warn!(
                from = %from.display(),
                to = %to.display(),
                error = %err,
                "log rotation rename failed"
            );
            false
        }
    }
}
