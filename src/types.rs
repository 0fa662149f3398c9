//! Shared primitive IDs and severity labels.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a queued log request, unique per logger.
pub type RequestId = u64;
/// Identity of a registered notification handler.
pub type SubscriptionId = u64;

/// Closed severity scale used by the direct logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criticality {
    /// Code 0.
    Info,
    /// Code 1.
    Minor,
    /// Code 2.
    Major,
    /// Code 3.
    Critical,
}

/// Rejected severity code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CriticalityError {
    /// Codes above 3 have no label.
    #[error("criticality code {0} is out of range (0..=3)")]
    OutOfRange(u8),
}

impl Criticality {
    /// Resolves a numeric severity code.
    pub fn from_code(code: u8) -> Result<Self, CriticalityError> {
        match code {
            0 => Ok(Self::Info),
            1 => Ok(Self::Minor),
            2 => Ok(Self::Major),
            3 => Ok(Self::Critical),
            other => Err(CriticalityError::OutOfRange(other)),
        }
    }

    /// Display label written into log lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Minor => "Minor",
            Self::Major => "Major",
            Self::Critical => "Critical",
        }
    }
}

impl TryFrom<u8> for Criticality {
    type Error = CriticalityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
