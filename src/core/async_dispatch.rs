//! Wiring of queue, capture callback and worker into one setup

use super::{
    config::DispatchConfig,
    diagnostics::{DiagnosticHook, Diagnostics},
    dispatch_callback::{AsyncDispatchCallback, DispatchCallback},
    dispatch_queue::DispatchQueue,
    dispatch_worker::{DispatchWorker, WorkerState},
    error::{DispatchError, Result},
    flags::{LoggingFlag, LoggingFlags},
    logger::LoggerBuilder,
    metrics::DispatchMetrics,
    record_handler::RecordHandler,
    sink::{shared, SharedSink},
};
use crate::appenders::ConsoleSink;
use std::sync::Arc;
use std::time::Duration;

/// An asynchronous dispatch setup: one queue, one capture callback, one
/// worker. Loggers opt in through [`install`](Self::install).
///
/// # Example
///
/// ```
/// use log_dispatch::prelude::*;
///
/// let mut dispatch = AsyncDispatch::builder()
///     .console(shared(MemorySink::new("console")))
///     .start()
///     .unwrap();
///
/// let logger = dispatch.install(Logger::builder("default")).build();
/// logger.info("queued, written by the worker");
///
/// dispatch.shutdown().unwrap();
/// assert!(dispatch.queue().is_empty());
/// ```
pub struct AsyncDispatch {
    queue: Arc<DispatchQueue>,
    callback: Arc<AsyncDispatchCallback>,
    worker: DispatchWorker,
    metrics: Arc<DispatchMetrics>,
    shutdown_timeout: Duration,
}

impl AsyncDispatch {
    pub fn builder() -> AsyncDispatchBuilder {
        AsyncDispatchBuilder::new()
    }

    /// Start with default configuration, writing standard output lines to stdout
    pub fn start(config: DispatchConfig) -> Result<Self> {
        Self::builder().config(config).start()
    }

    /// Replace the synchronous default dispatcher of `builder` with this
    /// setup's capture callback
    #[must_use]
    pub fn install(&self, builder: LoggerBuilder) -> LoggerBuilder {
        builder.dispatcher(self.callback())
    }

    pub fn callback(&self) -> Arc<dyn DispatchCallback> {
        Arc::clone(&self.callback) as Arc<dyn DispatchCallback>
    }

    pub fn queue(&self) -> &Arc<DispatchQueue> {
        &self.queue
    }

    pub fn worker(&self) -> &DispatchWorker {
        &self.worker
    }

    pub fn state(&self) -> WorkerState {
        self.worker.state()
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    pub fn flags(&self) -> &Arc<LoggingFlags> {
        self.worker.handler().flags()
    }

    /// Flush pending records now on the calling thread; the worker keeps running
    pub fn drain_and_stop(&self) -> Result<()> {
        self.worker.drain_and_stop()
    }

    /// Flush pending records, then stop and join the worker.
    ///
    /// Loggers installed from this setup keep working afterwards: their records
    /// are handled synchronously on the calling thread.
    pub fn shutdown(&mut self) -> Result<()> {
        // Records pushed while draining are picked up by stop_and_join
        match self.worker.drain_and_stop() {
            Ok(()) | Err(DispatchError::QueueNotEmpty { .. }) => {}
            Err(e) => return Err(e),
        }
        self.worker.stop_and_join(self.shutdown_timeout)
    }
}

/// Builder for [`AsyncDispatch`]
pub struct AsyncDispatchBuilder {
    config: DispatchConfig,
    console: Option<SharedSink>,
    flags: Option<Arc<LoggingFlags>>,
    diagnostics: Diagnostics,
    queue_capacity: usize,
}

impl AsyncDispatchBuilder {
    pub fn new() -> Self {
        Self {
            config: DispatchConfig::default(),
            console: None,
            flags: None,
            diagnostics: Diagnostics::new(),
            queue_capacity: 1024,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sink receiving standard output lines (stdout by default)
    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, console: SharedSink) -> Self {
        self.console = Some(console);
        self
    }

    /// Share an existing flag set instead of creating one
    #[must_use = "builder methods return a new value"]
    pub fn flags(mut self, flags: Arc<LoggingFlags>) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Receive every internal error the worker reports
    #[must_use = "builder methods return a new value"]
    pub fn on_diagnostic(mut self, hook: DiagnosticHook) -> Self {
        self.diagnostics = self.diagnostics.with_hook(hook);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn diagnostics_to_stderr(mut self, enabled: bool) -> Self {
        self.diagnostics = self.diagnostics.with_stderr(enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn start(self) -> Result<AsyncDispatch> {
        let flags = self.flags.unwrap_or_default();
        flags.set_flag(
            LoggingFlag::ColoredTerminalOutput,
            self.config.colored_terminal_output,
        );

        let metrics = Arc::new(DispatchMetrics::new());
        let console = self
            .console
            .unwrap_or_else(|| shared(ConsoleSink::stdout()));
        let handler = RecordHandler::new(flags, console)
            .with_metrics(Arc::clone(&metrics))
            .with_diagnostics(self.diagnostics);

        let queue = Arc::new(DispatchQueue::with_capacity(self.queue_capacity));
        let callback = Arc::new(
            AsyncDispatchCallback::with_metrics(Arc::clone(&queue), Arc::clone(&metrics))
                .with_fallback(handler.clone()),
        );
        let worker = DispatchWorker::start(Arc::clone(&queue), handler, &self.config)?;

        Ok(AsyncDispatch {
            queue,
            callback,
            worker,
            metrics,
            shutdown_timeout: self.config.shutdown_timeout(),
        })
    }
}

impl Default for AsyncDispatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
