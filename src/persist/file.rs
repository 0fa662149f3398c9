//! Append-only text file sink.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use super::{ConstructionError, EntrySink, PersistError, PersistResult};

/// Result of probing a log target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Opens and yields to a one-byte read.
    Valid,
    /// Does not exist.
    NotFound,
    /// Permission denied on open.
    NoAccess,
    /// Opens but cannot be read.
    CantRead,
    /// Any other open failure.
    Invalid,
}

/// Opens `path` read-only and reads at most one byte.
pub fn probe_target(path: &Path) -> FileStatus {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            return match err.kind() {
                io::ErrorKind::NotFound => FileStatus::NotFound,
                io::ErrorKind::PermissionDenied => FileStatus::NoAccess,
                _ => FileStatus::Invalid,
            };
        }
    };
    let mut byte = [0u8; 1];
    match file.read(&mut byte) {
        Ok(_) => FileStatus::Valid,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => FileStatus::NoAccess,
        Err(_) => FileStatus::CantRead,
    }
}

/// Validates a log target, creating it when merely absent.
pub fn validate_target(path: &Path) -> Result<(), ConstructionError> {
    match probe_target(path) {
        FileStatus::Valid => Ok(()),
        FileStatus::NotFound => {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| ConstructionError::Create {
                    path: path.to_path_buf(),
                    source,
                })?;
            tracing::debug!(path = %path.display(), "created missing log file");
            Ok(())
        }
        FileStatus::NoAccess => Err(ConstructionError::NoAccess {
            path: path.to_path_buf(),
        }),
        FileStatus::CantRead => Err(ConstructionError::CantRead {
            path: path.to_path_buf(),
        }),
        FileStatus::Invalid => Err(ConstructionError::Invalid {
            path: path.to_path_buf(),
        }),
    }
}

/// File implementation of [`crate::persist::EntrySink`].
///
/// The handle is opened once and every entry is flushed before
/// `append_entry` returns.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    reopen: bool,
}

impl FileSink {
    /// Validates (creating if absent) and opens `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConstructionError> {
        let path = path.as_ref().to_path_buf();
        validate_target(&path)?;
        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|source| ConstructionError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            file: Some(file),
            reopen: false,
        })
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once [`EntrySink::close`] released the handle.
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

impl EntrySink for FileSink {
    fn append_entry(&mut self, text: &str) -> PersistResult<()> {
        if self.file.is_none() {
            return Err(PersistError::Closed);
        }

        // An unlinked file keeps accepting writes through the open handle.
        if let Err(err) = fs::metadata(&self.path) {
            self.reopen = true;
            return Err(PersistError::from_io(err, &self.path));
        }
        if self.reopen {
            let fresh = OpenOptions::new()
                .append(true)
                .open(&self.path)
                .map_err(|err| PersistError::from_io(err, &self.path))?;
            tracing::debug!(path = %self.path.display(), "reopened restored log file");
            self.file = Some(fresh);
            self.reopen = false;
        }

        let Some(file) = self.file.as_mut() else {
            return Err(PersistError::Closed);
        };
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|err| PersistError::from_io(err, &self.path))
    }

    fn close(&mut self) -> PersistResult<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .map_err(|err| PersistError::from_io(err, &self.path))?;
            tracing::debug!(path = %self.path.display(), "closed log file");
        }
        Ok(())
    }
}
