//! Flush cycle: drains one snapshot through the sink on a blocking thread.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::{persist::EntrySink, request::LogRequest, types::RequestId};

use super::{
    events::{FlushSummary, LogEvent},
    notify::Notifier,
};

pub(crate) type SharedSink = Arc<Mutex<Box<dyn EntrySink>>>;

/// Reports from a running cycle back to the owner loop.
///
/// `Finished` is always the last message of a cycle.
pub(crate) enum FlushProgress {
    Written(RequestId),
    Finished(FlushSummary),
}

pub(crate) fn spawn_flush_cycle(
    sink: SharedSink,
    snapshot: Vec<LogRequest>,
    notifier: Arc<Notifier>,
    progress_tx: mpsc::UnboundedSender<FlushProgress>,
) {
    tokio::spawn(async move {
        let attempted = snapshot.len();
        let worker_tx = progress_tx.clone();
        let joined = tokio::task::spawn_blocking(move || {
            drain_snapshot(&sink, snapshot, &notifier, &worker_tx)
        })
        .await;

        let summary = match joined {
            Ok(summary) => summary,
            Err(err) => {
                tracing::error!(error = %err, attempted, "flush worker aborted");
                FlushSummary {
                    attempted,
                    ..FlushSummary::default()
                }
            }
        };
        let _ = progress_tx.send(FlushProgress::Finished(summary));
    });
}

fn drain_snapshot(
    sink: &SharedSink,
    snapshot: Vec<LogRequest>,
    notifier: &Notifier,
    progress_tx: &mpsc::UnboundedSender<FlushProgress>,
) -> FlushSummary {
    let mut sink = sink.blocking_lock();
    let mut summary = FlushSummary {
        attempted: snapshot.len(),
        ..FlushSummary::default()
    };

    for request in snapshot {
        match sink.append_entry(&request.render()) {
            Ok(()) => {
                summary.written += 1;
                let id = request.id;
                notifier.emit(LogEvent::Written {
                    id,
                    message: request.message,
                });
                let _ = progress_tx.send(FlushProgress::Written(id));
            }
            Err(err) => {
                summary.failed += 1;
                tracing::warn!(id = request.id, error = %err, "log entry write failed, keeping it queued");
                notifier.emit(LogEvent::Failed {
                    id: request.id,
                    message: request.message,
                    outcome: err.outcome(),
                    reason: err.to_string(),
                });
            }
        }
    }

    summary
}
