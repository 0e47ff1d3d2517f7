//! Append-only, line-oriented log sinks.

use crate::error::{LoggerError, Result};
use crate::sampling::data::{LogRow, CSV_HEADER, LINE_ENDING};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Destination for the rows of one sensor.
pub trait LogSink {
    /// Append one row and make it durable before returning.
    fn append(&mut self, row: &LogRow) -> Result<()>;

    /// Flush and release the destination. Safe to call more than once.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// CSV log file, one per sensor.
#[derive(Debug)]
pub struct CsvFileSink {
    path: PathBuf,
    file: Option<File>,
}

impl CsvFileSink {
    /// Open `path` for appending, creating it if needed.
    ///
    /// The header is written only when the file is empty, so restarting a run
    /// continues an existing log.
    pub fn open(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        let open_error = |source: io::Error| LoggerError::StorageOpen {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(open_error)?;

        if file.metadata().map_err(open_error)?.len() == 0 {
            write_line(&mut file, CSV_HEADER).map_err(open_error)?;
            tracing::info!("Created log file {}", path.display());
        } else {
            tracing::info!("Appending to existing log file {}", path.display());
        }

        Ok(Self {
            path,
            file: Some(file),
        })
    }
}

impl LogSink for CsvFileSink {
    fn append(&mut self, row: &LogRow) -> Result<()> {
        let result = match self.file.as_mut() {
            Some(file) => write_line(file, &row.to_csv_line()),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "log file is already closed",
            )),
        };

        result.map_err(|source| LoggerError::StorageWrite {
            path: self.path.clone(),
            source,
        })
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .and_then(|_| file.sync_all())
                .map_err(|source| LoggerError::StorageWrite {
                    path: self.path.clone(),
                    source,
                })?;
            tracing::debug!("Closed log file {}", self.path.display());
        }
        Ok(())
    }
}

impl Drop for CsvFileSink {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::error!("{}", err);
        }
    }
}

/// Write one CRLF-terminated line and push it to the storage device.
fn write_line(file: &mut File, line: &str) -> io::Result<()> {
    file.write_all(line.as_bytes())?;
    file.write_all(LINE_ENDING.as_bytes())?;
    file.flush()?;
    file.sync_data()
}

/// In-memory sink whose lines stay readable through a shared handle.
///
/// Clones share the lines and the closed flag.
#[derive(Debug, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    fail_writes: bool,
    closed: Arc<AtomicBool>,
}

impl MemorySink {
    /// A sink that starts out holding the header, like a new log file.
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(vec![CSV_HEADER.to_string()])),
            fail_writes: false,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A sink that rejects every row.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    /// Shared handle to the written lines.
    pub fn lines(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.lines)
    }

    /// Copy of the lines written so far.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for MemorySink {
    fn append(&mut self, row: &LogRow) -> Result<()> {
        if self.fail_writes || self.is_closed() {
            return Err(LoggerError::StorageWrite {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(io::ErrorKind::Other, "write rejected"),
            });
        }

        let mut lines = self
            .lines
            .lock()
            .map_err(|_| LoggerError::config_error("memory sink lock poisoned"))?;
        lines.push(row.to_csv_line());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
