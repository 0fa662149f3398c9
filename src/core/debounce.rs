use tokio::time::{Duration, Instant};

/// Outcome of a scheduler firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushDecision {
    /// Quiet window elapsed with work pending and no cycle running.
    Flush,
    /// A submission landed less than one window before the firing.
    TooSoon,
    /// Nothing queued.
    Empty,
    /// A flush cycle is still draining its snapshot.
    Busy,
}

/// Quiet-period bookkeeping for one logger.
///
/// Every accepted submission fully resets the window; the firing side never
/// extends it.
#[derive(Debug, Clone)]
pub struct Debounce {
    wait_window: Duration,
    last_request_at: Option<Instant>,
}

impl Debounce {
    /// Starts with no submission recorded.
    pub fn new(wait_window: Duration) -> Self {
        Self {
            wait_window,
            last_request_at: None,
        }
    }

    /// Configured quiet window.
    pub fn wait_window(&self) -> Duration {
        self.wait_window
    }

    /// Most recent submission stamp.
    pub fn last_request_at(&self) -> Option<Instant> {
        self.last_request_at
    }

    /// Records a submission. Out-of-order stamps never move the window back.
    pub fn touch(&mut self, at: Instant) {
        self.last_request_at = Some(match self.last_request_at {
            Some(prev) => prev.max(at),
            None => at,
        });
    }

    /// Earliest instant a flush may start, if anything was ever submitted.
    ///
    /// `None` also when the window reaches past the clock's range; such a
    /// window never elapses on its own.
    pub fn deadline(&self) -> Option<Instant> {
        self.last_request_at
            .and_then(|at| at.checked_add(self.wait_window))
    }

    /// Evaluates a scheduler firing at `fired_at` against the quiet window.
    pub fn decide(&self, fired_at: Instant, pending: usize, flush_in_progress: bool) -> FlushDecision {
        if flush_in_progress {
            return FlushDecision::Busy;
        }
        if pending == 0 {
            return FlushDecision::Empty;
        }
        let quiet_for = match self.last_request_at {
            Some(at) => fired_at.saturating_duration_since(at),
            None => self.wait_window,
        };
        if quiet_for >= self.wait_window {
            FlushDecision::Flush
        } else {
            FlushDecision::TooSoon
        }
    }
}
