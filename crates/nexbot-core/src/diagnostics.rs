use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Destination for internal failure messages.
///
/// Recording never fails from the caller's point of view: a sink that cannot
/// persist a message drops it after emitting a `tracing` warning.
pub trait DiagnosticSink: Send + Sync {
    /// Append one message.
    fn record(&self, message: &str);
}

/// Append-only text log, one `<message>\n` per entry.
///
/// The file is opened lazily in append mode and every write happens under an
/// exclusive lock, so concurrent callers never interleave partial lines.
pub struct FileDiagnosticLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileDiagnosticLog {
    /// Create a log that appends to `path`. Nothing is touched on disk until the
    /// first message is recorded.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl DiagnosticSink for FileDiagnosticLog {
    fn record(&self, message: &str) {
        warn!(target: "nexbot::diagnostics", "{message}");

        let mut guard = self.file.lock();
        if guard.is_none() {
            match self.open() {
                Ok(file) => *guard = Some(file),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "cannot open diagnostic log");
                    return;
                }
            }
        }
        if let Some(file) = guard.as_mut() {
            let line = format!("{message}\n");
            if let Err(e) = file.write_all(line.as_bytes()) {
                warn!(path = %self.path.display(), error = %e, "cannot append to diagnostic log");
                *guard = None;
            }
        }
    }
}

/// Keeps messages in memory. Used by tests and by hosts that ship
/// diagnostics elsewhere.
#[derive(Default)]
pub struct MemoryDiagnosticLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryDiagnosticLog {
    /// Create an empty in-memory log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DiagnosticSink for MemoryDiagnosticLog {
    fn record(&self, message: &str) {
        self.entries.lock().push(message.to_string());
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl DiagnosticSink for NullDiagnostics {
    fn record(&self, _message: &str) {}
}
