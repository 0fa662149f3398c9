use std::{
    fmt::Display,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use serde::Serialize;
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot, Mutex},
    time::{Duration, Instant},
};

use crate::{
    core::{
        debounce::{Debounce, FlushDecision},
        queue::RequestQueue,
    },
    persist::{
        dump::dump_value, file::FileSink, ConstructionError, EntrySink, PersistError, PersistResult,
    },
    request::{LogRequest, STARTUP_BLANK_LINES},
    types::{RequestId, SubscriptionId},
};

use super::{
    config::LoggerConfig,
    events::{EventKind, FlushSummary, LogEvent},
    flush::{spawn_flush_cycle, FlushProgress, SharedSink},
    notify::Notifier,
};

/// Failure of a handle operation.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The logger was closed or its owner task is gone.
    #[error("logger is closed")]
    ChannelClosed,
    /// Releasing the sink failed during teardown.
    #[error("closing sink failed: {0}")]
    Persist(#[from] PersistError),
}

/// Cloneable front end of one logger.
///
/// Dropping every clone tears the logger down like [`LoggerHandle::close`].
pub struct LoggerHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    notifier: Arc<Notifier>,
    next_id: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
    dump_dir: Arc<PathBuf>,
}

impl Clone for LoggerHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            notifier: Arc::clone(&self.notifier),
            next_id: Arc::clone(&self.next_id),
            closed: Arc::clone(&self.closed),
            dump_dir: Arc::clone(&self.dump_dir),
        }
    }
}

enum Command {
    Submit(LogRequest),
    Flush {
        resp: oneshot::Sender<FlushSummary>,
    },
    Pending {
        resp: oneshot::Sender<Vec<LogRequest>>,
    },
    Close {
        resp: oneshot::Sender<Result<(), PersistError>>,
    },
}

/// Validates `path` (creating it if absent) and starts a file-backed logger.
///
/// Must be called from within a tokio runtime.
pub fn spawn_logger(
    path: impl AsRef<Path>,
    config: LoggerConfig,
) -> Result<LoggerHandle, ConstructionError> {
    let sink = FileSink::open(path)?;
    Ok(spawn_logger_with_sink(Box::new(sink), config))
}

/// Starts a logger over any [`EntrySink`].
///
/// Must be called from within a tokio runtime.
pub fn spawn_logger_with_sink(sink: Box<dyn EntrySink>, config: LoggerConfig) -> LoggerHandle {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (progress_tx, progress_rx) = mpsc::unbounded_channel::<FlushProgress>();
    let notifier = Arc::new(Notifier::new(config.event_capacity));

    let owner = Owner {
        sink: Arc::new(Mutex::new(sink)),
        notifier: Arc::clone(&notifier),
        queue: RequestQueue::new(),
        debounce: Debounce::new(config.wait_window),
        retry_interval: config.effective_retry_interval(),
        flush_in_progress: false,
        next_fire: None,
        active_waiters: Vec::new(),
        queued_waiters: Vec::new(),
        progress_tx,
        closing: false,
        close_resp: None,
    };
    tokio::spawn(owner.run(cmd_rx, progress_rx));

    LoggerHandle {
        cmd_tx,
        notifier,
        next_id: Arc::new(AtomicU64::new(1)),
        closed: Arc::new(AtomicBool::new(false)),
        dump_dir: Arc::new(config.resolved_dump_dir()),
    }
}

impl LoggerHandle {
    /// Opens a receiver on the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.notifier.subscribe()
    }

    /// Registers a synchronous callback for one event kind.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&LogEvent) + Send + Sync + 'static,
    {
        self.notifier.on(kind, handler)
    }

    /// Removes a callback registered with [`LoggerHandle::on`].
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Queues `message` and restarts the quiet window. Never blocks.
    pub fn submit(
        &self,
        sender: impl Display,
        message: impl Into<String>,
    ) -> Result<RequestId, RuntimeError> {
        self.enqueue(sender, message, None)
    }

    /// Like [`LoggerHandle::submit`], padded to mark a process start.
    pub fn submit_startup(
        &self,
        sender: impl Display,
        message: impl Into<String>,
    ) -> Result<RequestId, RuntimeError> {
        self.enqueue(sender, message, Some(STARTUP_BLANK_LINES))
    }

    /// Like [`LoggerHandle::submit`] with explicit padding; `0` means none.
    pub fn submit_padded(
        &self,
        sender: impl Display,
        message: impl Into<String>,
        leading_blank_lines: u32,
    ) -> Result<RequestId, RuntimeError> {
        self.enqueue(sender, message, Some(leading_blank_lines))
    }

    /// Writes `value` as indented JSON to a fresh temp file and logs its path.
    ///
    /// Failures are reported through [`LogEvent::DumpFailed`] and returned;
    /// nothing is queued for them. A closed logger writes no file and fails
    /// with [`PersistError::Closed`].
    pub fn dump_object<T>(&self, sender: impl Display, value: &T) -> PersistResult<PathBuf>
    where
        T: Serialize + ?Sized,
    {
        let dumped = if self.is_closed() {
            Err(PersistError::Closed)
        } else {
            dump_value(&self.dump_dir, value)
        };
        match dumped {
            Ok(path) => {
                if let Err(err) = self.submit(sender, format!("Dumped object to: {}", path.display())) {
                    tracing::debug!(error = %err, path = %path.display(), "dump confirmation not queued");
                }
                self.notifier.emit(LogEvent::ObjectDumped { path: path.clone() });
                Ok(path)
            }
            Err(err) => {
                tracing::warn!(error = %err, "object dump failed");
                self.notifier.emit(LogEvent::DumpFailed {
                    outcome: err.outcome(),
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Runs a flush cycle now, ignoring the quiet window.
    ///
    /// Waits for a running cycle first. Resolves with the counters of the
    /// cycle that drained this call's snapshot.
    pub async fn flush(&self) -> Result<FlushSummary, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Flush { resp: tx })
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Copy of the requests still waiting for a successful write.
    pub async fn pending(&self) -> Result<Vec<LogRequest>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Pending { resp: tx })
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the scheduler, waits for a running cycle, releases the sink.
    ///
    /// Idempotent: only the first call across all clones has an effect.
    /// Requests still queued are dropped.
    pub async fn close(&self) -> Result<(), RuntimeError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Close { resp: tx }).is_err() {
            return Ok(());
        }
        match rx.await {
            Ok(result) => result.map_err(RuntimeError::from),
            Err(_) => Ok(()),
        }
    }

    /// True once [`LoggerHandle::close`] was called on any clone.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn enqueue(
        &self,
        sender: impl Display,
        message: impl Into<String>,
        leading_blank_lines: Option<u32>,
    ) -> Result<RequestId, RuntimeError> {
        if self.is_closed() {
            return Err(RuntimeError::ChannelClosed);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = LogRequest::new(id, sender, message, leading_blank_lines);
        self.notifier.emit(LogEvent::Accepted {
            id,
            message: request.message.clone(),
        });
        self.cmd_tx
            .send(Command::Submit(request))
            .map_err(|_| RuntimeError::ChannelClosed)?;
        Ok(id)
    }
}

/// State owned exclusively by the logger task.
struct Owner {
    sink: SharedSink,
    notifier: Arc<Notifier>,
    queue: RequestQueue,
    debounce: Debounce,
    retry_interval: Duration,
    flush_in_progress: bool,
    next_fire: Option<Instant>,
    active_waiters: Vec<oneshot::Sender<FlushSummary>>,
    queued_waiters: Vec<oneshot::Sender<FlushSummary>>,
    progress_tx: mpsc::UnboundedSender<FlushProgress>,
    closing: bool,
    close_resp: Option<oneshot::Sender<Result<(), PersistError>>>,
}

impl Owner {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<Command>,
        mut progress_rx: mpsc::UnboundedReceiver<FlushProgress>,
    ) {
        let mut accepting = true;

        loop {
            let fire_at = self.next_fire;
            tokio::select! {
                cmd = cmd_rx.recv(), if accepting => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => {
                            accepting = false;
                            self.closing = true;
                            self.next_fire = None;
                        }
                    }
                }
                progress = progress_rx.recv() => {
                    if let Some(progress) = progress {
                        self.handle_progress(progress);
                    }
                }
                _ = tokio::time::sleep_until(fire_at.unwrap_or_else(Instant::now)), if fire_at.is_some() => {
                    self.on_fire();
                }
            }

            if self.closing && !self.flush_in_progress {
                break;
            }
        }

        self.teardown().await;
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit(request) => {
                let at = request.submitted_at;
                if let Err(err) = self.queue.push(request) {
                    tracing::warn!(error = %err, "ignoring duplicate submission");
                    return;
                }
                self.debounce.touch(at);
                if !self.closing {
                    self.next_fire = self.debounce.deadline();
                }
            }
            Command::Flush { resp } => {
                if self.closing {
                    return;
                }
                if self.flush_in_progress {
                    self.queued_waiters.push(resp);
                } else if self.queue.is_empty() {
                    let _ = resp.send(FlushSummary::default());
                } else {
                    self.start_cycle();
                    self.active_waiters.push(resp);
                }
            }
            Command::Pending { resp } => {
                let _ = resp.send(self.queue.snapshot());
            }
            Command::Close { resp } => {
                self.closing = true;
                self.next_fire = None;
                self.close_resp = Some(resp);
            }
        }
    }

    fn handle_progress(&mut self, progress: FlushProgress) {
        match progress {
            FlushProgress::Written(id) => {
                self.queue.remove(id);
            }
            FlushProgress::Finished(summary) => {
                self.flush_in_progress = false;
                tracing::debug!(
                    attempted = summary.attempted,
                    written = summary.written,
                    failed = summary.failed,
                    remaining = self.queue.len(),
                    "flush cycle finished"
                );
                self.notifier.emit(LogEvent::FlushFinished { summary });
                for waiter in self.active_waiters.drain(..) {
                    let _ = waiter.send(summary);
                }

                if self.queue.is_empty() {
                    self.next_fire = None;
                }
                if self.closing || self.queued_waiters.is_empty() {
                    return;
                }
                if self.queue.is_empty() {
                    for waiter in self.queued_waiters.drain(..) {
                        let _ = waiter.send(FlushSummary::default());
                    }
                } else {
                    self.start_cycle();
                    self.active_waiters = std::mem::take(&mut self.queued_waiters);
                }
            }
        }
    }

    fn on_fire(&mut self) {
        let fired_at = Instant::now();
        match self
            .debounce
            .decide(fired_at, self.queue.len(), self.flush_in_progress)
        {
            FlushDecision::Flush => self.start_cycle(),
            FlushDecision::Busy => {
                tracing::trace!("scheduler fired during a flush cycle");
            }
            FlushDecision::TooSoon | FlushDecision::Empty => {}
        }

        // Keep re-checking while anything is queued so failed entries retry.
        self.next_fire = if self.queue.is_empty() {
            None
        } else {
            match (self.debounce.deadline(), fired_at.checked_add(self.retry_interval)) {
                (Some(deadline), Some(retry_at)) => Some(deadline.max(retry_at)),
                _ => None,
            }
        };
    }

    fn start_cycle(&mut self) {
        let snapshot = self.queue.snapshot();
        self.flush_in_progress = true;
        tracing::debug!(pending = snapshot.len(), "flush cycle started");
        self.notifier.emit(LogEvent::FlushStarted {
            pending: snapshot.len(),
        });
        spawn_flush_cycle(
            Arc::clone(&self.sink),
            snapshot,
            Arc::clone(&self.notifier),
            self.progress_tx.clone(),
        );
    }

    async fn teardown(mut self) {
        self.next_fire = None;
        let dropped = self.queue.clear();
        if dropped > 0 {
            tracing::warn!(dropped, "logger closed with requests still queued");
        }

        let result = self.sink.lock().await.close();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "releasing log sink failed");
        }
        if let Some(resp) = self.close_resp.take() {
            let _ = resp.send(result);
        }
    }
}
