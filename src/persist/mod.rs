pub mod dump;
pub mod file;

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single write against the backing store.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Permission fault on the target.
    #[error("no access to {}", path.display())]
    NoAccess {
        /// Offending path.
        path: PathBuf,
    },
    /// Target was removed or moved.
    #[error("{} not found", path.display())]
    FileNotFound {
        /// Offending path.
        path: PathBuf,
    },
    /// The sink or the logger owning it was already closed.
    #[error("log is closed")]
    Closed,
    /// Any other I/O fault.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Value could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result alias used by sinks and the dump writer.
pub type PersistResult<T> = Result<T, PersistError>;

impl PersistError {
    /// Classifies an I/O error raised while touching `path`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::NoAccess {
                path: path.to_path_buf(),
            },
            io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => Self::Io(err),
        }
    }

    /// Coarse status reported to observers.
    pub fn outcome(&self) -> WriteOutcome {
        match self {
            Self::NoAccess { .. } => WriteOutcome::NoAccess,
            Self::FileNotFound { .. } => WriteOutcome::FileNotFound,
            Self::Closed | Self::Io(_) | Self::Serde(_) => WriteOutcome::Failed,
        }
    }
}

/// Status of one append or dump attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteOutcome {
    /// Durably written.
    Ok,
    /// Permission fault.
    NoAccess,
    /// Target missing.
    FileNotFound,
    /// Any other fault (closed sink, I/O, serialization).
    Failed,
}

impl<T> From<&PersistResult<T>> for WriteOutcome {
    fn from(value: &PersistResult<T>) -> Self {
        match value {
            Ok(_) => Self::Ok,
            Err(err) => err.outcome(),
        }
    }
}

/// Construction-time validation failure. No logger exists afterwards.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// Target does not exist and the caller does not create it.
    #[error("log file {} not found", path.display())]
    NotFound {
        /// Offending path.
        path: PathBuf,
    },
    /// Target exists but may not be opened.
    #[error("no access to log file {}", path.display())]
    NoAccess {
        /// Offending path.
        path: PathBuf,
    },
    /// Target opens but the read probe fails (e.g. a directory).
    #[error("log file {} cannot be read", path.display())]
    CantRead {
        /// Offending path.
        path: PathBuf,
    },
    /// Target is unusable for any other reason.
    #[error("log file {} is invalid", path.display())]
    Invalid {
        /// Offending path.
        path: PathBuf,
    },
    /// Creating a missing target failed.
    #[error("creating log file {} failed: {source}", path.display())]
    Create {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Opening the validated target for appending failed.
    #[error("opening log file {} failed: {source}", path.display())]
    Open {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

/// Append-only destination for formatted entries.
///
/// Implementations must not buffer across calls: a successful return means
/// the text reached the OS.
pub trait EntrySink: Send {
    /// Appends one newline-terminated entry.
    fn append_entry(&mut self, text: &str) -> PersistResult<()>;
    /// Releases the underlying handle. Must tolerate repeated calls.
    fn close(&mut self) -> PersistResult<()> {
        Ok(())
    }
}
