//! The append logger
//!
//! Owns the live log file behind a re-entrant lock and serializes
//! timestamped appends to it. A constructed [`AppendLogger`] is ready for
//! logging; dropping it (or calling [`AppendLogger::shutdown`]) closes the
//! file.

use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};
use parking_lot::ReentrantMutex;

use crate::config::LogConfig;
use crate::directory::{self, Placement};
use crate::error::LogError;
use crate::rotation;

/// Thread-safe append-only writer for the live log file.
///
/// Startup and shutdown are single-threaded by ownership; [`Self::append`]
/// may be called concurrently from any number of threads. The lock guarding
/// the file handle is re-entrant, so a thread already inside an append
/// (for example through a `Display` impl that itself logs) re-enters safely
/// instead of deadlocking.
pub struct AppendLogger {
    dir: PathBuf,
    prefix: String,
    start_time: u64,
    file: ReentrantMutex<RefCell<File>>,
}

impl AppendLogger {
    /// Select a log directory, rotate the existing history, open a fresh
    /// live file and write the start marker.
    ///
    /// The returned [`Placement`] tells the caller whether their preferred
    /// directory was honored. Any failure to obtain a directory or open the
    /// live file is fatal, regardless of how selection went.
    pub fn startup(config: LogConfig) -> Result<(Self, Placement), LogError> {
        let start_time = epoch_seconds();

        let requested = config.directory.clone();
        let selection = directory::select(config.directory.as_deref())?;

        rotation::rotate_slots(&selection.dir, &config.prefix, config.history_slots);

        let live_path = selection.dir.join(&config.prefix);
        let file = File::create(&live_path).map_err(|source| LogError::LiveFileOpen {
            path: live_path,
            source,
        })?;

        let logger = Self {
            dir: selection.dir,
            prefix: config.prefix,
            start_time,
            file: ReentrantMutex::new(RefCell::new(file)),
        };
        logger.write_start_marker(requested.as_deref());

        Ok((logger, selection.placement))
    }

    /// Append one formatted entry:
    /// `+<elapsed>:<source>:<line>:<message>` plus a trailing newline.
    ///
    /// Elapsed seconds are computed under the lock, and the whole line is
    /// written with a single write call followed by a flush, so concurrent
    /// appends never interleave. Write errors are swallowed; logging is
    /// best effort.
    pub fn append(&self, source: &str, line: u32, args: fmt::Arguments<'_>) {
        let guard = self.file.lock();
        let elapsed = epoch_seconds().saturating_sub(self.start_time);
        let entry = format!("+{elapsed}:{source}:{line}:{args}\n");
        let mut file = guard.borrow_mut();
        if let Err(err) = file.write_all(entry.as_bytes()) {
            tracing::warn!(error = %err, "log append failed");
            return;
        }
        let _ = file.flush();
    }

    /// Directory actually in use; may differ from the one requested.
    pub fn dirname(&self) -> &Path {
        &self.dir
    }

    /// Filename prefix of the live file.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Startup timestamp in seconds since the epoch, the baseline for the
    /// elapsed field of every entry.
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Flush and close the live file.
    ///
    /// Dropping the logger has the same effect; this form makes the
    /// teardown point explicit at call sites.
    pub fn shutdown(self) {
        let guard = self.file.lock();
        let _ = guard.borrow_mut().flush();
    }

    fn write_start_marker(&self, requested: Option<&Path>) {
        let started = Local
            .timestamp_opt(self.start_time as i64, 0)
            .single()
            .map(|t| t.format("%a %b %e %H:%M:%S %Y").to_string())
            .unwrap_or_default();
        let requested = requested.map(|p| p.display().to_string()).unwrap_or_default();
        self.append(
            file!(),
            line!(),
            format_args!(
                "{}:{}:started logging ({}, {})",
                started, self.start_time, requested, self.prefix
            ),
        );
    }
}

impl fmt::Debug for AppendLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppendLogger")
            .field("dir", &self.dir)
            .field("prefix", &self.prefix)
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn start_in(dir: &Path, prefix: &str) -> (AppendLogger, Placement) {
        AppendLogger::startup(LogConfig::new().directory(dir).prefix(prefix)).unwrap()
    }

    fn live_lines(dir: &Path, prefix: &str) -> Vec<String> {
        std::fs::read_to_string(dir.join(prefix))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Split an entry into (elapsed, source, line, message).
    fn parse_entry(entry: &str) -> (u64, &str, u32, &str) {
        let rest = entry.strip_prefix('+').expect("entry starts with '+'");
        let mut parts = rest.splitn(4, ':');
        let elapsed = parts.next().unwrap().parse().unwrap();
        let source = parts.next().unwrap();
        let line = parts.next().unwrap().parse().unwrap();
        let message = parts.next().unwrap();
        (elapsed, source, line, message)
    }

    #[test]
    fn test_startup_writes_start_marker() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, placement) = start_in(temp_dir.path(), "app");

        assert_eq!(placement, Placement::Preferred);
        assert_eq!(logger.dirname(), temp_dir.path());
        assert_eq!(logger.prefix(), "app");

        let lines = live_lines(temp_dir.path(), "app");
        assert_eq!(lines.len(), 1);
        let (elapsed, source, _, message) = parse_entry(&lines[0]);
        assert!(elapsed <= 1);
        assert_eq!(source, "src/logger.rs");
        assert!(message.contains("started logging"));
        assert!(message.contains(&logger.start_time().to_string()));
        assert!(message.contains(&temp_dir.path().display().to_string()));
        assert!(message.contains("app"));
    }

    #[test]
    fn test_append_line_format() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _) = start_in(temp_dir.path(), "app");

        logger.append("main.rs", 10, format_args!("hello {}", "world"));

        let lines = live_lines(temp_dir.path(), "app");
        let (elapsed, source, line, message) = parse_entry(&lines[1]);
        assert!(elapsed <= 1);
        assert_eq!(source, "main.rs");
        assert_eq!(line, 10);
        assert_eq!(message, "hello world");
    }

    #[test]
    fn test_message_may_contain_colons() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _) = start_in(temp_dir.path(), "app");

        logger.append("net.rs", 7, format_args!("peer 10.0.0.1:8080: timeout"));

        let lines = live_lines(temp_dir.path(), "app");
        let (_, _, _, message) = parse_entry(&lines[1]);
        assert_eq!(message, "peer 10.0.0.1:8080: timeout");
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _) = start_in(temp_dir.path(), "app");

        for i in 0..20 {
            logger.append("seq.rs", i, format_args!("entry {i}"));
        }

        let elapsed: Vec<u64> = live_lines(temp_dir.path(), "app")
            .iter()
            .map(|l| parse_entry(l).0)
            .collect();
        assert!(elapsed.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_unusable_preferred_directory_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_dir = temp_dir.path().join("occupied");
        std::fs::write(&not_a_dir, b"plain file").unwrap();

        let (logger, placement) =
            AppendLogger::startup(LogConfig::new().directory(&not_a_dir).prefix("app")).unwrap();
        assert_eq!(placement, Placement::Fallback);
        assert_ne!(logger.dirname(), not_a_dir);

        // Clean up the live file we dropped into the fallback directory.
        let live = logger.dirname().join("app");
        drop(logger);
        let _ = std::fs::remove_file(live);
    }

    #[test]
    fn test_restart_rotates_previous_live_file() {
        let temp_dir = TempDir::new().unwrap();

        let (logger, _) = start_in(temp_dir.path(), "app");
        logger.append("main.rs", 1, format_args!("first run"));
        logger.shutdown();

        let (_logger2, _) = start_in(temp_dir.path(), "app");

        let history = std::fs::read_to_string(temp_dir.path().join("app.0")).unwrap();
        assert!(history.contains("first run"));

        // The fresh live file holds only the new start marker.
        let lines = live_lines(temp_dir.path(), "app");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("started logging"));
    }

    #[test]
    fn test_concurrent_appends_do_not_tear() {
        const THREADS: usize = 8;
        const MESSAGES: u32 = 50;

        let temp_dir = TempDir::new().unwrap();
        let (logger, _) = start_in(temp_dir.path(), "app");
        let logger = Arc::new(logger);

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for m in 0..MESSAGES {
                        logger.append("worker.rs", m, format_args!("thread {t} message {m}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = live_lines(temp_dir.path(), "app");
        let entries: Vec<_> = lines
            .iter()
            .map(|l| parse_entry(l))
            .filter(|(_, source, _, _)| *source == "worker.rs")
            .collect();
        assert_eq!(entries.len(), THREADS * MESSAGES as usize);

        // Every message arrived exactly once, unmangled.
        let mut seen: Vec<&str> = entries.iter().map(|(_, _, _, m)| *m).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), THREADS * MESSAGES as usize);
        for (_, _, line, message) in &entries {
            let words: Vec<&str> = message.split(' ').collect();
            assert_eq!(words.len(), 4);
            assert_eq!(words[0], "thread");
            assert!(words[1].parse::<usize>().unwrap() < THREADS);
            assert_eq!(words[2], "message");
            assert_eq!(words[3], line.to_string());
        }
    }
}
