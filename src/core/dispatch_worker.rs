//! Background worker draining the dispatch queue

use super::{
    config::DispatchConfig,
    dispatch_queue::DispatchQueue,
    error::{DispatchError, Result},
    flags::LoggingFlag,
    record_handler::{panic_message, RecordHandler},
};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Lifecycle of a [`DispatchWorker`]
///
/// `Starting` only exists while the thread is being spawned; a worker handed
/// back by [`DispatchWorker::start`] is already `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Starting,
    Running,
    Draining,
    Stopped,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Starting => write!(f, "Starting"),
            WorkerState::Running => write!(f, "Running"),
            WorkerState::Draining => write!(f, "Draining"),
            WorkerState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Owns the single background thread that drains a [`DispatchQueue`].
///
/// The thread polls: every `idle_pause` it drains everything queued, pausing
/// briefly after each record. The wait is a timed receive on a stop channel,
/// so [`stop_and_join`](Self::stop_and_join) does not have to sit out a full
/// pause.
///
/// Only one worker may drain a given queue.
pub struct DispatchWorker {
    queue: Arc<DispatchQueue>,
    handler: RecordHandler,
    state: WorkerState,
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
    intra_drain_pause: Duration,
    shutdown_timeout: Duration,
}

impl DispatchWorker {
    /// Spawn the background thread.
    ///
    /// Side effect: sets [`LoggingFlag::ImmediateFlush`] on the handler's shared
    /// flags when `config.immediate_flush` is on (the default), so every
    /// handler of this setup flushes after each successful file write.
    pub fn start(
        queue: Arc<DispatchQueue>,
        handler: RecordHandler,
        config: &DispatchConfig,
    ) -> Result<Self> {
        config.validate()?;

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let intra_drain_pause = config.intra_drain_pause();
        let idle_pause = config.idle_pause();
        let thread_queue = Arc::clone(&queue);
        let thread_handler = handler.clone();

        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || loop {
                match stop_rx.recv_timeout(idle_pause) {
                    Err(RecvTimeoutError::Timeout) => {
                        Self::empty_queue(&thread_queue, &thread_handler, intra_drain_pause);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        Self::empty_queue(&thread_queue, &thread_handler, Duration::ZERO);
                        break;
                    }
                }
            })
            .map_err(DispatchError::WorkerSpawn)?;

        if config.immediate_flush {
            handler.flags().add_flag(LoggingFlag::ImmediateFlush);
        }

        Ok(Self {
            queue,
            handler,
            state: WorkerState::Running,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            intra_drain_pause,
            shutdown_timeout: config.shutdown_timeout(),
        })
    }

    /// Handle queued records one at a time until the queue is observed empty
    fn empty_queue(queue: &DispatchQueue, handler: &RecordHandler, pause: Duration) {
        while queue.consume_next(|record| handler.handle(&record)) {
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Whether the background thread is still alive
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn queue(&self) -> &Arc<DispatchQueue> {
        &self.queue
    }

    pub fn handler(&self) -> &RecordHandler {
        &self.handler
    }

    /// Empty the queue on the calling thread.
    ///
    /// Succeeds when the queue is observed empty afterwards. The background
    /// thread is left running; use [`stop_and_join`](Self::stop_and_join) to
    /// end it. Calling this on an empty queue is a no-op.
    pub fn drain_and_stop(&self) -> Result<()> {
        Self::empty_queue(&self.queue, &self.handler, self.intra_drain_pause);

        match self.queue.len() {
            0 => Ok(()),
            remaining => Err(DispatchError::QueueNotEmpty { remaining }),
        }
    }

    /// Stop the background thread, wait up to `timeout` for it, close the
    /// queue, then drain whatever is left on the calling thread.
    ///
    /// Once closed, capture callbacks hand new records to their fallback
    /// handler instead of queueing them.
    ///
    /// On timeout the thread is detached and keeps draining; the queue is
    /// still drained here before the error is returned. Both consumers go
    /// through the queue's consumer lock, so records keep their order.
    pub fn stop_and_join(&mut self, timeout: Duration) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            self.queue.close();
            Self::empty_then_check(&self.queue, &self.handler)?;
            self.state = WorkerState::Stopped;
            return Ok(());
        };

        self.state = WorkerState::Draining;
        if let Some(stop_tx) = self.stop_tx.take() {
            // A full channel already carries a stop request
            let _ = stop_tx.try_send(());
        }

        let start = Instant::now();
        let joined = loop {
            if handle.is_finished() {
                break handle
                    .join()
                    .map_err(|e| DispatchError::WorkerPanicked(panic_message(e.as_ref())));
            }

            if start.elapsed() >= timeout {
                break Err(DispatchError::StopTimeout(timeout));
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(1));
        };

        self.queue.close();
        let drained = Self::empty_then_check(&self.queue, &self.handler);
        if joined.is_ok() {
            self.state = WorkerState::Stopped;
        }
        joined.and(drained)
    }

    fn empty_then_check(queue: &DispatchQueue, handler: &RecordHandler) -> Result<()> {
        Self::empty_queue(queue, handler, Duration::ZERO);
        match queue.len() {
            0 => Ok(()),
            remaining => Err(DispatchError::QueueNotEmpty { remaining }),
        }
    }
}

impl fmt::Debug for DispatchWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchWorker")
            .field("state", &self.state)
            .field("queued", &self.queue.len())
            .field("intra_drain_pause", &self.intra_drain_pause)
            .finish_non_exhaustive()
    }
}

impl Drop for DispatchWorker {
    fn drop(&mut self) {
        if self.state == WorkerState::Stopped {
            return;
        }

        if let Err(e) = self.stop_and_join(self.shutdown_timeout) {
            eprintln!(
                "[LOGGER WARNING] Dispatch worker did not shut down cleanly: {}. \
                 Some logs may be lost.",
                e
            );
        }
    }
}
