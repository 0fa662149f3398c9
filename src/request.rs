//! Pending log request record and its on-disk entry rendering.

use std::fmt::{Display, Write as _};

use chrono::{DateTime, Local};
use tokio::time::Instant;

use crate::types::RequestId;

/// Timestamp layout used inside the entry brackets.
pub const ENTRY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Blank-line padding requested for process-start entries.
pub const STARTUP_BLANK_LINES: u32 = 2;

/// One accepted log request awaiting a flush.
///
/// Requests are immutable once queued; the queue only tracks membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRequest {
    /// Identity used for removal after a successful write.
    pub id: RequestId,
    /// Rendered sender identifier.
    pub sender: String,
    /// Caller-supplied message text.
    pub message: String,
    /// Monotonic submission time, drives the quiet-window check.
    pub submitted_at: Instant,
    /// Wall-clock submission time.
    pub submitted_wall: DateTime<Local>,
    /// Separator lines requested before the entry, if any.
    pub leading_blank_lines: Option<u32>,
}

impl LogRequest {
    /// Builds a request stamped with the current time.
    ///
    /// A padding of `Some(0)` is normalized to `None`.
    pub fn new(
        id: RequestId,
        sender: impl Display,
        message: impl Into<String>,
        leading_blank_lines: Option<u32>,
    ) -> Self {
        Self {
            id,
            sender: sender.to_string(),
            message: message.into(),
            submitted_at: Instant::now(),
            submitted_wall: Local::now(),
            leading_blank_lines: leading_blank_lines.filter(|n| *n > 0),
        }
    }

    /// Renders the entry text written at `now`, newline-terminated.
    ///
    /// Format: `[<timestamp>] -- [<sender>]: <message>`, preceded by
    /// `leading_blank_lines - 1` empty lines when padding was requested.
    pub fn render_at(&self, now: DateTime<Local>) -> String {
        let mut out = String::with_capacity(self.message.len() + self.sender.len() + 32);
        if let Some(lines) = self.leading_blank_lines {
            for _ in 1..lines {
                out.push('\n');
            }
        }
        let _ = writeln!(
            out,
            "[{}] -- [{}]: {}",
            now.format(ENTRY_TIMESTAMP_FORMAT),
            self.sender,
            self.message
        );
        out
    }

    /// Renders the entry using the current local time.
    pub fn render(&self) -> String {
        self.render_at(Local::now())
    }
}
