//! Runtime event payloads.

use std::path::PathBuf;

use crate::{persist::WriteOutcome, types::RequestId};

/// Counters for one flush cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Snapshot size.
    pub attempted: usize,
    /// Entries durably written and removed from the queue.
    pub written: usize,
    /// Entries left queued for a later cycle.
    pub failed: usize,
}

/// Events emitted by a logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A request was queued.
    Accepted {
        /// Queued request.
        id: RequestId,
        /// Raw message.
        message: String,
    },
    /// An entry reached the backing store.
    Written {
        /// Written request.
        id: RequestId,
        /// Raw message.
        message: String,
    },
    /// An entry could not be written and stays queued.
    Failed {
        /// Retained request.
        id: RequestId,
        /// Raw message.
        message: String,
        /// Classified failure.
        outcome: WriteOutcome,
        /// Human-readable cause.
        reason: String,
    },
    /// An object dump was written.
    ObjectDumped {
        /// Dump file location.
        path: PathBuf,
    },
    /// An object dump could not be written.
    DumpFailed {
        /// Classified failure.
        outcome: WriteOutcome,
        /// Human-readable cause.
        reason: String,
    },
    /// A flush cycle took its snapshot.
    FlushStarted {
        /// Snapshot size.
        pending: usize,
    },
    /// A flush cycle released the exclusion flag.
    FlushFinished {
        /// Cycle counters.
        summary: FlushSummary,
    },
}

/// Discriminant of [`LogEvent`], used to register typed handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`LogEvent::Accepted`].
    Accepted,
    /// See [`LogEvent::Written`].
    Written,
    /// See [`LogEvent::Failed`].
    Failed,
    /// See [`LogEvent::ObjectDumped`].
    ObjectDumped,
    /// See [`LogEvent::DumpFailed`].
    DumpFailed,
    /// See [`LogEvent::FlushStarted`].
    FlushStarted,
    /// See [`LogEvent::FlushFinished`].
    FlushFinished,
}

impl LogEvent {
    /// Kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Accepted { .. } => EventKind::Accepted,
            Self::Written { .. } => EventKind::Written,
            Self::Failed { .. } => EventKind::Failed,
            Self::ObjectDumped { .. } => EventKind::ObjectDumped,
            Self::DumpFailed { .. } => EventKind::DumpFailed,
            Self::FlushStarted { .. } => EventKind::FlushStarted,
            Self::FlushFinished { .. } => EventKind::FlushFinished,
        }
    }
}
