//! Lock-guarded FIFO shared by producers and the dispatch worker

use super::log_record::LogRecord;
use parking_lot::{Mutex, ReentrantMutex};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Thread-safe FIFO of captured records.
///
/// Every operation takes the same mutex, so no caller can observe a record
/// half pushed or half popped. Drain order is push order.
///
/// Consumers go through [`consume_next`](Self::consume_next), which holds a
/// consumer lock across the pop and the handling of the record. With the
/// worker and a draining caller both consuming, records still reach the sinks
/// in queue order.
///
/// Once [`close`](Self::close)d, [`try_push`](Self::try_push) rejects new
/// records; the queue can still be drained.
///
/// # Example
///
/// ```
/// use log_dispatch::core::{DispatchAction, DispatchQueue, LogLevel, LogRecord, LoggerCore};
/// use std::sync::Arc;
///
/// let core = Arc::new(LoggerCore::builder("default").build());
/// let queue = DispatchQueue::new();
/// queue.push(LogRecord::new(core, LogLevel::Info, DispatchAction::NormalLog, "ready"));
///
/// assert_eq!(queue.len(), 1);
/// assert_eq!(queue.pop_next().map(|r| r.message().to_string()), Some("ready".into()));
/// assert!(queue.is_empty());
/// ```
pub struct DispatchQueue {
    records: Mutex<VecDeque<LogRecord>>,
    // Only read or written while `records` is locked
    closed: AtomicBool,
    consumer: ReentrantMutex<()>,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            closed: AtomicBool::new(false),
            consumer: ReentrantMutex::new(()),
        }
    }

    /// Append at the tail, closed or not. Only blocks for the lock hold time.
    #[inline]
    pub fn push(&self, record: LogRecord) {
        self.records.lock().push_back(record);
    }

    /// Append at the tail unless the queue is closed, in which case the
    /// record is handed back.
    pub fn try_push(&self, record: LogRecord) -> Result<(), LogRecord> {
        let mut records = self.records.lock();
        if self.closed.load(Ordering::Acquire) {
            return Err(record);
        }
        records.push_back(record);
        Ok(())
    }

    /// Reject every later [`try_push`](Self::try_push). Records already queued
    /// stay queued.
    pub fn close(&self) {
        let _records = self.records.lock();
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Pop the head and pass it to `handle` while holding the consumer lock.
    ///
    /// Returns `false` when the queue was empty. The lock is reentrant, so
    /// `handle` may itself consume from this queue on the same thread.
    pub fn consume_next(&self, handle: impl FnOnce(LogRecord)) -> bool {
        let _consumer = self.consumer.lock();
        match self.pop_next() {
            Some(record) => {
                handle(record);
                true
            }
            None => false,
        }
    }

    /// Run `f` as the only consumer of this queue
    pub fn with_consumer<R>(&self, f: impl FnOnce() -> R) -> R {
        let _consumer = self.consumer.lock();
        f()
    }

    /// Remove and return the head, or `None` when empty.
    ///
    /// The emptiness check and the removal happen under one lock acquisition,
    /// so concurrent consumers never race on the same element.
    #[inline]
    pub fn pop_next(&self) -> Option<LogRecord> {
        self.records.lock().pop_front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
