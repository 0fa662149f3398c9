//! Logger tuning knobs.

use std::path::PathBuf;

use tokio::time::Duration;

/// Environment key for [`LoggerConfig::wait_window`], in milliseconds.
pub const ENV_WAIT_MS: &str = "QUIETLOG_WAIT_MS";
/// Environment key for [`LoggerConfig::retry_interval`], in milliseconds.
pub const ENV_RETRY_MS: &str = "QUIETLOG_RETRY_MS";
/// Environment key for [`LoggerConfig::event_capacity`].
pub const ENV_EVENT_CAPACITY: &str = "QUIETLOG_EVENT_CAPACITY";
/// Environment key for [`LoggerConfig::dump_dir`].
pub const ENV_DUMP_DIR: &str = "QUIETLOG_DUMP_DIR";

const MIN_RETRY_INTERVAL: Duration = Duration::from_millis(1);

/// Construction-time configuration of one logger.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Quiet period required after the last submission before a flush.
    ///
    /// A window reaching past the clock's range (e.g. `Duration::MAX`) never
    /// elapses; entries are then written only by [`crate::runtime::handle::LoggerHandle::flush`].
    pub wait_window: Duration,
    /// Re-check period while requests stay queued (failed writes, busy cycles).
    pub retry_interval: Duration,
    /// Buffer size of the broadcast event stream.
    pub event_capacity: usize,
    /// Directory for object dumps; the OS temp dir when `None`.
    pub dump_dir: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            wait_window: Duration::from_secs(5),
            retry_interval: Duration::from_millis(100),
            event_capacity: 1024,
            dump_dir: None,
        }
    }
}

impl LoggerConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparsable keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |key: &str| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
        };

        Self {
            wait_window: millis(ENV_WAIT_MS).unwrap_or(defaults.wait_window),
            retry_interval: millis(ENV_RETRY_MS)
                .unwrap_or(defaults.retry_interval)
                .max(MIN_RETRY_INTERVAL),
            event_capacity: lookup(ENV_EVENT_CAPACITY)
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.event_capacity),
            dump_dir: lookup(ENV_DUMP_DIR)
                .filter(|raw| !raw.trim().is_empty())
                .map(PathBuf::from)
                .or(defaults.dump_dir),
        }
    }

    /// Effective dump directory.
    pub fn resolved_dump_dir(&self) -> PathBuf {
        self.dump_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub(crate) fn effective_retry_interval(&self) -> Duration {
        self.retry_interval.max(MIN_RETRY_INTERVAL)
    }
}
