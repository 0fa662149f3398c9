//! Debounced, batching append-only logger.
//!
//! Producers queue entries without touching the disk; a single owner task
//! writes them once no new entry arrived for a quiet window. Entries that
//! fail to write stay queued and are retried.
//!
//! # Examples
//!
//! Queue bookkeeping with [`core::queue::RequestQueue`]:
//! ```
//! use quietlog::{core::queue::RequestQueue, request::LogRequest};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut queue = RequestQueue::new();
//! queue.push(LogRequest::new(1, "main", "first", None)).expect("push");
//! queue.push(LogRequest::new(2, "main", "second", None)).expect("push");
//! queue.remove(1);
//! assert_eq!(queue.ordered_ids(), &[2]);
//! # }
//! ```
//!
//! Runtime usage with a file sink:
//! ```no_run
//! use quietlog::runtime::{
//!     config::LoggerConfig,
//!     events::{EventKind, LogEvent},
//!     handle::spawn_logger,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let logger = spawn_logger("app.log", LoggerConfig::default()).expect("open log");
//! logger.on(EventKind::Written, |event| {
//!     if let LogEvent::Written { message, .. } = event {
//!         eprintln!("written: {message}");
//!     }
//! });
//! logger.submit_startup("main", "process started").expect("submit");
//! logger.submit("main", "ready").expect("submit");
//! logger.flush().await.expect("flush");
//! logger.close().await.expect("close");
//! # }
//! ```
#![deny(missing_docs)]

/// Pending-request queue and quiet-window policy.
pub mod core;
/// Synchronous single-write logger.
pub mod direct;
/// Sink abstraction, file sink and object dumps.
pub mod persist;
/// Log request record and entry rendering.
pub mod request;
/// Debounced runtime handle, events and configuration.
pub mod runtime;
/// Shared primitive types and severity labels.
pub mod types;
