//! Dispatch callbacks invoked by the logger front-end

use super::{
    diagnostics::Diagnostics,
    dispatch_queue::DispatchQueue,
    error::DispatchError,
    log_record::{DispatchData, LogRecord},
    metrics::DispatchMetrics,
    record_handler::RecordHandler,
};
use std::sync::Arc;

/// Hook invoked synchronously inside every accepted logging call
pub trait DispatchCallback: Send + Sync {
    fn handle(&self, data: &DispatchData<'_>);
    fn name(&self) -> &str;
}

/// Default dispatcher: renders and writes on the calling thread
#[derive(Clone, Default)]
pub struct SyncDispatchCallback {
    handler: RecordHandler,
}

impl SyncDispatchCallback {
    pub fn new(handler: RecordHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &RecordHandler {
        &self.handler
    }
}

impl DispatchCallback for SyncDispatchCallback {
    fn handle(&self, data: &DispatchData<'_>) {
        self.handler.handle(&LogRecord::capture(data));
    }

    fn name(&self) -> &str {
        "SyncDispatchCallback"
    }
}

/// Capture side of asynchronous dispatch.
///
/// Copies the dispatch data into a [`LogRecord`] and pushes it onto the shared
/// queue. No I/O happens here; the dispatch worker does the writing.
///
/// After the worker has stopped and closed the queue, records go to the
/// fallback handler on the calling thread, behind anything still queued. With
/// no fallback they are dropped and reported as [`DispatchError::QueueClosed`].
#[derive(Clone)]
pub struct AsyncDispatchCallback {
    queue: Arc<DispatchQueue>,
    metrics: Arc<DispatchMetrics>,
    fallback: Option<RecordHandler>,
}

impl AsyncDispatchCallback {
    pub fn new(queue: Arc<DispatchQueue>) -> Self {
        Self::with_metrics(queue, Arc::new(DispatchMetrics::new()))
    }

    pub fn with_metrics(queue: Arc<DispatchQueue>, metrics: Arc<DispatchMetrics>) -> Self {
        Self {
            queue,
            metrics,
            fallback: None,
        }
    }

    /// Handle records synchronously through `handler` once the queue is closed
    #[must_use]
    pub fn with_fallback(mut self, handler: RecordHandler) -> Self {
        self.fallback = Some(handler);
        self
    }

    pub fn queue(&self) -> &Arc<DispatchQueue> {
        &self.queue
    }
}

impl AsyncDispatchCallback {
    fn handle_closed(&self, record: LogRecord) {
        let Some(ref handler) = self.fallback else {
            self.metrics.record_dropped();
            Diagnostics::new().report(&DispatchError::QueueClosed {
                logger: record.logger().id().to_string(),
                level: record.level(),
            });
            return;
        };

        self.metrics.record_sync_fallback();
        self.queue.with_consumer(|| {
            while self.queue.consume_next(|queued| handler.handle(&queued)) {}
            handler.handle(&record);
        });
    }
}

impl DispatchCallback for AsyncDispatchCallback {
    #[inline]
    fn handle(&self, data: &DispatchData<'_>) {
        match self.queue.try_push(LogRecord::capture(data)) {
            Ok(()) => {
                self.metrics.record_enqueued();
            }
            Err(record) => self.handle_closed(record),
        }
    }

    fn name(&self) -> &str {
        "AsyncDispatchCallback"
    }
}
