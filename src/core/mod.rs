//! Pending-request queue and quiet-window policy.

/// Quiet-window bookkeeping and the flush decision.
pub mod debounce;
/// Ordered pending-request queue.
pub mod queue;
