//! Input files
//!
//! Every input file sits behind its own lock, taken only for the duration of
//! a single line read. Requesters that visit the same file therefore take
//! turns on it and drain it cooperatively. The buffer and log locks are never
//! held while reading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use log::{debug, warn};
use parking_lot::Mutex;
use lookup_core::{LookupError, Result};

/// A readable input, exhausted at end of file or on the first read error
pub struct InputFile {
    name: String,
    /// `None` once exhausted; the handle is closed at that point
    reader: Mutex<Option<Box<dyn BufRead + Send>>>,
}

impl InputFile {
    /// Open a file for line reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| LookupError::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(path.display().to_string(), BufReader::new(file)))
    }

    /// Wrap any buffered reader, e.g. an in-memory cursor
    pub fn from_reader<R>(name: impl Into<String>, reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        Self {
            name: name.into(),
            reader: Mutex::new(Some(Box::new(reader))),
        }
    }

    /// Name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the next line without its trailing `\n`
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Returns `None` at end
    /// of file and on any read error; both leave the file exhausted.
    pub fn next_line(&self) -> Option<String> {
        let mut guard = self.reader.lock();
        let reader = guard.as_mut()?;

        let mut raw = Vec::new();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => {
                debug!("{}: end of file", self.name);
                *guard = None;
                None
            }
            Ok(_) => {
                if raw.last() == Some(&b'\n') {
                    raw.pop();
                }
                Some(String::from_utf8_lossy(&raw).into_owned())
            }
            Err(err) => {
                warn!("{}: read failed, treating as exhausted: {}", self.name, err);
                *guard = None;
                None
            }
        }
    }

    /// Check if every line has been handed out
    pub fn is_exhausted(&self) -> bool {
        self.reader.lock().is_none()
    }
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("name", &self.name)
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}

/// Open every input up front; the first failure aborts the run
pub fn open_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<InputFile>> {
    paths.iter().map(|p| InputFile::open(p.as_ref())).collect()
}

/// Paths of inputs, for reporting
pub fn describe(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}
