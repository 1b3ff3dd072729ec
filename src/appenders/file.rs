//! File sink implementation

use crate::core::{DispatchError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends rendered lines to a file through a buffered writer.
///
/// Nothing reaches the disk until the sink is flushed, either by the flush
/// policy of the dispatch handler or when the sink is dropped.
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
    name: String,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                DispatchError::config(
                    "FileSink",
                    format!("cannot open '{}': {}", path.display(), e),
                )
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            name: path.display().to_string(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_requires_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = FileSink::new(&path).unwrap();

        sink.write_line("first\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        sink.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "existing\n").unwrap();

        {
            let mut sink = FileSink::new(&path).unwrap();
            sink.write_line("appended\n").unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing\nappended\n");
    }

    #[test]
    fn test_unopenable_path() {
        let dir = TempDir::new().unwrap();
        let err = FileSink::new(dir.path().join("missing").join("app.log")).err().unwrap();
        assert!(matches!(err, DispatchError::InvalidConfiguration { .. }));
    }
}
