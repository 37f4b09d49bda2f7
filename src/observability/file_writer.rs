//! Size-rotated JSON-lines writer for exported spans.
//!
//! The trace file grows by one line per exported batch. Once it passes
//! [`DEFAULT_MAX_BYTES`] it is renamed to `<stem>.json.<unix-seconds>` and a
//! fresh file is started; only the newest [`DEFAULT_MAX_BACKUPS`] backups are
//! kept.

use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Rotation threshold (10 MB).
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

pub const DEFAULT_MAX_BACKUPS: usize = 3;

/// Thread-safe rotating file writer.
///
/// The file is opened lazily on the first write so that constructing the
/// writer never touches the filesystem.
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl FileWriter {
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, DEFAULT_MAX_BYTES, DEFAULT_MAX_BACKUPS)
    }

    /// Creates a writer with a custom rotation threshold and backup count.
    #[must_use]
    pub fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `line` plus a newline, rotating first if the file is too large.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if rotating, opening, writing or
    /// flushing fails.
    pub fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = self.file.lock();

        if self.needs_rotation() {
            *file = None;
            self.rotate()?;
        }

        let handle = match file.as_mut() {
            Some(handle) => handle,
            None => file.insert(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            ),
        };

        writeln!(handle, "{line}")?;
        handle.flush()
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.file_path).is_ok_and(|metadata| metadata.len() > self.max_bytes)
    }

    fn rotate(&self) -> std::io::Result<()> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_nanos();
        let backup = self.file_path.with_extension(format!("json.{timestamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup)?;
        }
        self.prune_backups()
    }

    /// Deletes backups beyond the retention limit, oldest first.
    fn prune_backups(&self) -> std::io::Result<()> {
        let Some(parent) = self.file_path.parent() else {
            return Ok(());
        };
        let Some(prefix) = self
            .file_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{name}."))
        else {
            return Ok(());
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Suffixes are same-width timestamps, so the name orders by age.
        backups.sort();
        backups.reverse();

        for stale in backups.iter().skip(self.max_backups) {
            if let Err(e) = fs::remove_file(stale) {
                tracing::debug!(path = %stale.display(), error = %e, "failed to prune trace backup");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with("trace.json."))
            })
            .count()
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("trace.json"));

        writer.write_line("{\"a\":1}").unwrap();
        writer.write_line("{\"b\":2}").unwrap();

        let contents = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn rotates_past_threshold_and_keeps_limited_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::with_limits(dir.path().join("trace.json"), 8, 2);

        for _ in 0..6 {
            writer.write_line("0123456789").unwrap();
        }

        assert!(backups(dir.path()) <= 2);
        assert!(backups(dir.path()) >= 1);
        let current = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(current, "0123456789\n");
    }
}
