//! Synchronous one-shot logger with criticality labels.
//!
//! Each call validates the target, appends one entry and returns; nothing is
//! queued. Useful before a runtime exists or right before the process exits.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;
use thiserror::Error;

use crate::{
    persist::{
        file::{probe_target, validate_target, FileStatus},
        ConstructionError, PersistError,
    },
    request::ENTRY_TIMESTAMP_FORMAT,
    types::{Criticality, CriticalityError},
};

/// Failure of [`DirectLog::try_write`].
#[derive(Debug, Error)]
pub enum DirectLogError {
    /// Severity code outside 0..=3.
    #[error(transparent)]
    Criticality(#[from] CriticalityError),
    /// The target was not writable.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Writes entries straight to a file, one open/append/close per call.
#[derive(Debug, Clone)]
pub struct DirectLog {
    path: PathBuf,
}

impl DirectLog {
    /// Validates an existing `path`. A missing file is an error, not created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConstructionError> {
        let path = path.as_ref().to_path_buf();
        if probe_target(&path) == FileStatus::NotFound {
            return Err(ConstructionError::NotFound { path });
        }
        validate_target(&path)?;
        Ok(Self { path })
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one entry with a numeric severity code (0 = Info .. 3 = Critical).
    pub fn try_write(
        &self,
        source: &str,
        message: &str,
        criticality: u8,
        details: Option<&str>,
    ) -> Result<(), DirectLogError> {
        let criticality = Criticality::from_code(criticality)?;
        self.write(source, message, criticality, details)?;
        Ok(())
    }

    /// Writes one entry:
    /// `[<timestamp>] [<criticality>] <source> -> <message>;` plus an
    /// indented `Details:` line when `details` is given.
    pub fn write(
        &self,
        source: &str,
        message: &str,
        criticality: Criticality,
        details: Option<&str>,
    ) -> Result<(), PersistError> {
        match probe_target(&self.path) {
            FileStatus::Valid => {}
            FileStatus::NotFound => {
                return Err(PersistError::FileNotFound {
                    path: self.path.clone(),
                });
            }
            FileStatus::NoAccess | FileStatus::CantRead | FileStatus::Invalid => {
                return Err(PersistError::NoAccess {
                    path: self.path.clone(),
                });
            }
        }

        let mut text = format!(
            "[{}] [{}] {} -> {};\n",
            Local::now().format(ENTRY_TIMESTAMP_FORMAT),
            criticality,
            source,
            message
        );
        if let Some(details) = details {
            text.push_str("\tDetails: ");
            text.push_str(details);
            text.push('\n');
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|err| PersistError::from_io(err, &self.path))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|err| PersistError::from_io(err, &self.path))
    }
}
