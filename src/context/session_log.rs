//! Session data log owned by the processing context.

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only text log toggled by `LogStart` / `LogStop`.
///
/// The file is opened in append mode when logging is enabled and closed
/// when it is disabled. Lines are flushed as they are written.
#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
    writer: Option<LineWriter<File>>,
}

impl SessionLog {
    /// Creates a disabled log that will write to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    /// Current log path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` while the log file is open.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Opens the log file. Returns `false` if it was already open.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened.
    pub fn enable(&mut self) -> io::Result<bool> {
        if self.writer.is_some() {
            return Ok(false);
        }
        self.writer = Some(open(&self.path)?);
        Ok(true)
    }

    /// Flushes and closes the log file. Returns `false` if it was not open.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the final flush fails; the file is closed
    /// regardless.
    pub fn disable(&mut self) -> io::Result<bool> {
        match self.writer.take() {
            Some(mut writer) => {
                writer.flush()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Changes the log path. An open log is closed and reopened at the new
    /// location.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the old file cannot be flushed or the new
    /// one cannot be opened. The new path is kept either way; logging is left
    /// disabled if the reopen failed.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> io::Result<()> {
        let flushed = self.disable();
        self.path = path.into();
        let reopen = flushed?;
        if reopen {
            self.enable()?;
        }
        Ok(())
    }

    /// Appends one line. Returns `false` without writing when disabled.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the write fails.
    pub fn write_line(&mut self, line: &str) -> io::Result<bool> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(false);
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(true)
    }
}

fn open(path: &Path) -> io::Result<LineWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(LineWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gaze-control-{tag}-{}.log", uuid::Uuid::new_v4()))
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let path = temp_path("disabled");
        let mut log = SessionLog::new(&path);
        assert_eq!(log.write_line("ignored").ok(), Some(false));
        assert!(!path.exists());
    }

    #[test]
    fn enable_write_disable() {
        let path = temp_path("basic");
        let mut log = SessionLog::new(&path);

        assert_eq!(log.enable().ok(), Some(true));
        assert_eq!(log.enable().ok(), Some(false));
        assert_eq!(log.write_line("first").ok(), Some(true));
        assert_eq!(log.write_line("second line").ok(), Some(true));
        assert_eq!(log.disable().ok(), Some(true));
        assert_eq!(log.disable().ok(), Some(false));

        let contents = std::fs::read_to_string(&path).unwrap_or_default();
        assert_eq!(contents, "first\nsecond line\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn set_path_reopens_open_log() {
        let first = temp_path("first");
        let second = temp_path("second");
        let mut log = SessionLog::new(&first);

        assert!(log.enable().is_ok());
        assert!(log.write_line("a").is_ok());
        assert!(log.set_path(&second).is_ok());
        assert!(log.is_enabled());
        assert_eq!(log.path(), second.as_path());
        assert!(log.write_line("b").is_ok());
        assert!(log.disable().is_ok());

        assert_eq!(std::fs::read_to_string(&first).unwrap_or_default(), "a\n");
        assert_eq!(std::fs::read_to_string(&second).unwrap_or_default(), "b\n");
        let _ = std::fs::remove_file(&first);
        let _ = std::fs::remove_file(&second);
    }

    #[test]
    fn set_path_on_disabled_log_does_not_open() {
        let path = temp_path("lazy");
        let mut log = SessionLog::new("unused.log");
        assert!(log.set_path(&path).is_ok());
        assert!(!log.is_enabled());
        assert!(!path.exists());
    }

    #[test]
    fn unopenable_path_reports_error() {
        let dir =
            std::env::temp_dir().join(format!("gaze-control-missing-{}", uuid::Uuid::new_v4()));
        let mut log = SessionLog::new(dir.join("nested").join("x.log"));
        assert!(log.enable().is_err());
        assert!(!log.is_enabled());
    }

    #[test]
    fn failed_reopen_still_moves_the_path() {
        let first = temp_path("moved");
        let dir =
            std::env::temp_dir().join(format!("gaze-control-missing-{}", uuid::Uuid::new_v4()));
        let second = dir.join("nested").join("x.log");
        let mut log = SessionLog::new(&first);
        assert_eq!(log.enable().ok(), Some(true));

        assert!(log.set_path(&second).is_err());
        assert_eq!(log.path(), second.as_path());
        assert!(!log.is_enabled());
        let _ = std::fs::remove_file(&first);
    }
}
