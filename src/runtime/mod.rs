//! Debounced single-owner logger runtime.

/// Construction-time configuration.
pub mod config;
/// Event payloads emitted by a logger.
pub mod events;
mod flush;
/// Handle and owner loop implementation.
pub mod handle;
/// Typed observer registry.
pub mod notify;
