//! Run log: timestamped, append-only status lines.
//!
//! One `RunLog` is opened per process and shared by every component. Each
//! entry is written as `[YYYY-MM-DD HH:MM:SS] message`, appended to
//! `<log-dir>/run.log` with an immediate flush, then echoed to stdout. A
//! failed echo (closed pipe, detached terminal) never fails the entry.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::clock::Clock;
use crate::error::ReportError;

pub const LOG_FILE_NAME: &str = "run.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct RunLog {
    path: PathBuf,
    file: Mutex<File>,
    clock: Arc<dyn Clock>,
    echo: Option<Mutex<Box<dyn Write + Send>>>,
}

impl RunLog {
    /// Open (creating if needed) `run.log` under `log_dir`.
    pub fn open(log_dir: &Path, clock: Arc<dyn Clock>) -> Result<Self, ReportError> {
        fs::create_dir_all(log_dir).map_err(|e| ReportError::io(log_dir, e))?;
        let path = log_dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ReportError::io(&path, e))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
            clock,
            echo: Some(Mutex::new(Box::new(io::stdout()))),
        })
    }

    /// Enable or disable the stdout copy of each line.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo.then(|| Mutex::new(Box::new(io::stdout()) as Box<dyn Write + Send>));
        self
    }

    /// Echo each line to `sink` instead of stdout.
    pub fn with_echo_to(mut self, sink: impl Write + Send + 'static) -> Self {
        self.echo = Some(Mutex::new(Box::new(sink)));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. Returns the formatted line.
    pub fn log(&self, message: impl AsRef<str>) -> Result<String, ReportError> {
        let line = format!(
            "[{}] {}",
            self.clock.local_now().format(TIMESTAMP_FORMAT),
            message.as_ref()
        );
        self.append(&line).map_err(|e| ReportError::io(&self.path, e))?;
        if let Err(e) = self.echo_line(&line) {
            tracing::warn!(error = %e, "run log echo failed");
        }
        Ok(line)
    }

    fn echo_line(&self, line: &str) -> io::Result<()> {
        let Some(echo) = &self.echo else {
            return Ok(());
        };
        let mut sink = echo
            .lock()
            .map_err(|_| io::Error::other("run log echo lock poisoned"))?;
        writeln!(sink, "{line}")?;
        sink.flush()
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("run log lock poisoned"))?;
        writeln!(file, "{line}")?;
        file.flush()
    }

    /// Read back every line in the log file (including earlier runs).
    pub fn read_lines(&self) -> io::Result<Vec<String>> {
        Ok(fs::read_to_string(&self.path)?
            .lines()
            .map(str::to_owned)
            .collect())
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog")
            .field("path", &self.path)
            .field("echo", &self.echo.is_some())
            .finish()
    }
}
