//! Rendering and routing of one record to its sinks

use super::{
    diagnostics::Diagnostics,
    error::DispatchError,
    flags::{LoggingFlag, LoggingFlags},
    log_level::LogLevel,
    log_record::{DispatchAction, LogRecord},
    logger::LoggerCore,
    metrics::DispatchMetrics,
    sink::SharedSink,
};
use crate::appenders::ConsoleSink;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Writes records to their file sinks and standard output.
///
/// Shared by the synchronous dispatcher and the dispatch worker. Failures are
/// reported through [`Diagnostics`] and never reach the producer; the record
/// is not retried or requeued.
#[derive(Clone)]
pub struct RecordHandler {
    flags: Arc<LoggingFlags>,
    console: SharedSink,
    metrics: Arc<DispatchMetrics>,
    diagnostics: Diagnostics,
}

impl RecordHandler {
    pub fn new(flags: Arc<LoggingFlags>, console: SharedSink) -> Self {
        Self {
            flags,
            console,
            metrics: Arc::new(DispatchMetrics::new()),
            diagnostics: Diagnostics::new(),
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<DispatchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn flags(&self) -> &Arc<LoggingFlags> {
        &self.flags
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    pub fn console(&self) -> &SharedSink {
        &self.console
    }

    /// Handle one record. Panics from the formatter or a sink are caught and
    /// reported; the record then counts as handled.
    pub fn handle(&self, record: &LogRecord) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(record)));
        self.metrics.record_handled();

        if let Err(payload) = outcome {
            self.metrics.record_handler_panic();
            self.report(DispatchError::handler_panicked(
                format!("Dispatch for logger '{}'", record.logger().id()),
                panic_message(payload.as_ref()),
            ));
        }
    }

    fn dispatch(&self, record: &LogRecord) {
        let logger = record.logger();
        let level = record.level();
        let normal_log = record.action() == DispatchAction::NormalLog;
        let line = logger.log_builder().build(record, normal_log);

        if !normal_log {
            return;
        }

        let conf = logger.configurations();
        if conf.to_file(level) {
            match conf.file_sink(level) {
                Some(sink) => self.write_file(logger, level, sink, &line),
                None => {
                    self.metrics.record_configuration_error();
                    self.report(DispatchError::missing_file_sink(logger.id(), level));
                }
            }
        }

        if conf.to_standard_output(level) {
            self.write_console(logger, level, line);
        }
    }

    fn write_file(&self, logger: &LoggerCore, level: LogLevel, sink: &SharedSink, line: &str) {
        // Errors are reported after the sink lock is released: a diagnostic
        // hook may log through the same sink.
        let failure = {
            let mut guard = sink.lock();
            match guard.write_line(line) {
                Err(e) => Some(DispatchError::write_failed(guard.name(), level, e)),
                Ok(()) => {
                    let flush_now = self.flags.has_flag(LoggingFlag::ImmediateFlush)
                        || logger.is_flush_needed(level);
                    if flush_now {
                        match logger.flush(level, &mut *guard) {
                            Ok(()) => {
                                self.metrics.record_flush();
                                None
                            }
                            Err(e) => Some(DispatchError::flush_failed(guard.name(), e)),
                        }
                    } else {
                        None
                    }
                }
            }
        };

        match failure {
            Some(err @ DispatchError::WriteFailed { .. }) => {
                self.metrics.record_write_failure();
                self.report(err);
            }
            Some(err) => {
                self.metrics.record_flush_failure();
                self.report(err);
            }
            None => {}
        }
    }

    fn write_console(&self, logger: &LoggerCore, level: LogLevel, mut line: String) {
        if self.flags.has_flag(LoggingFlag::ColoredTerminalOutput) {
            logger.log_builder().convert_to_colored_output(&mut line, level);
        }

        let failure = {
            let mut console = self.console.lock();
            console
                .write_line(&line)
                .err()
                .map(|e| DispatchError::write_failed(console.name(), level, e))
        };

        if let Some(err) = failure {
            self.metrics.record_write_failure();
            self.report(err);
        }
    }

    fn report(&self, err: DispatchError) {
        self.diagnostics.report(&err);
    }
}

impl Default for RecordHandler {
    fn default() -> Self {
        Self::new(
            Arc::new(LoggingFlags::new()),
            super::sink::shared(ConsoleSink::stdout()),
        )
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemorySink;
    use crate::core::sink::{shared, Sink};
    use crate::core::{LogBuilder, LoggerCore};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSink;

    impl Sink for FailingSink {
        fn write_line(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Accepts every write but fails every flush
    struct UnflushableSink {
        inner: MemorySink,
    }

    impl Sink for UnflushableSink {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.inner.write_line(line)
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }

        fn name(&self) -> &str {
            "unflushable"
        }
    }

    struct PanickingBuilder;

    impl LogBuilder for PanickingBuilder {
        fn build(&self, _record: &LogRecord, _append_newline: bool) -> String {
            panic!("template exploded");
        }
    }

    fn counting_handler(console: &MemorySink) -> (RecordHandler, Arc<AtomicUsize>) {
        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);
        let diagnostics = Diagnostics::new()
            .with_stderr(false)
            .with_hook(Arc::new(move |_: &DispatchError| {
                reported_clone.fetch_add(1, Ordering::SeqCst);
            }));
        let handler = RecordHandler::new(Arc::new(LoggingFlags::new()), shared(console.clone()))
            .with_diagnostics(diagnostics);
        (handler, reported)
    }

    fn record(core: &Arc<LoggerCore>, level: LogLevel, action: DispatchAction) -> LogRecord {
        LogRecord::new(Arc::clone(core), level, action, "payload")
    }

    #[test]
    fn test_routes_to_file_and_console() {
        let console = MemorySink::new("console");
        let file = MemorySink::new("file");
        let core = Arc::new(
            LoggerCore::builder("route")
                .file(LogLevel::Error, shared(file.clone()))
                .build(),
        );
        let (handler, reported) = counting_handler(&console);

        handler.handle(&record(&core, LogLevel::Error, DispatchAction::NormalLog));

        assert_eq!(file.lines().len(), 1);
        assert_eq!(console.lines().len(), 1);
        assert_eq!(reported.load(Ordering::SeqCst), 0);
        assert_eq!(handler.metrics().handled(), 1);
    }

    #[test]
    fn test_immediate_flush_flag() {
        let console = MemorySink::new("console");
        let file = MemorySink::new("file");
        let flushes = file.flush_counter();
        let core = Arc::new(
            LoggerCore::builder("flush")
                .file(LogLevel::Info, shared(file))
                .build(),
        );
        let (handler, _) = counting_handler(&console);

        handler.handle(&record(&core, LogLevel::Info, DispatchAction::NormalLog));
        assert_eq!(flushes.load(Ordering::SeqCst), 0);

        handler.flags().add_flag(LoggingFlag::ImmediateFlush);
        handler.handle(&record(&core, LogLevel::Info, DispatchAction::NormalLog));
        assert_eq!(flushes.load(Ordering::SeqCst), 1);
        assert_eq!(handler.metrics().flushes(), 1);
    }

    #[test]
    fn test_write_failure_reported_once_and_console_still_written() {
        let console = MemorySink::new("console");
        let core = Arc::new(
            LoggerCore::builder("broken")
                .file(LogLevel::Error, shared(FailingSink))
                .build(),
        );
        let (handler, reported) = counting_handler(&console);

        handler.handle(&record(&core, LogLevel::Error, DispatchAction::NormalLog));

        assert_eq!(reported.load(Ordering::SeqCst), 1);
        assert_eq!(handler.metrics().write_failures(), 1);
        assert_eq!(console.lines().len(), 1);
    }

    #[test]
    fn test_flush_failure_reported_and_line_kept() {
        let console = MemorySink::new("console");
        let file = MemorySink::new("file");
        let core = Arc::new(
            LoggerCore::builder("unflushable")
                .file(LogLevel::Info, shared(UnflushableSink { inner: file.clone() }))
                .build(),
        );
        let (handler, reported) = counting_handler(&console);
        handler.flags().add_flag(LoggingFlag::ImmediateFlush);

        handler.handle(&record(&core, LogLevel::Info, DispatchAction::NormalLog));

        assert_eq!(reported.load(Ordering::SeqCst), 1);
        assert_eq!(handler.metrics().flush_failures(), 1);
        assert_eq!(handler.metrics().flushes(), 0);
        assert_eq!(handler.metrics().write_failures(), 0);
        assert_eq!(file.lines().len(), 1);
        assert_eq!(console.lines().len(), 1);
    }

    #[test]
    fn test_missing_file_sink_reported() {
        let console = MemorySink::new("console");
        let core = Arc::new(
            LoggerCore::builder("misconfigured")
                .level(
                    LogLevel::Warn,
                    crate::core::LevelSettings {
                        to_file: true,
                        ..Default::default()
                    },
                )
                .build(),
        );
        let (handler, reported) = counting_handler(&console);

        handler.handle(&record(&core, LogLevel::Warn, DispatchAction::NormalLog));

        assert_eq!(reported.load(Ordering::SeqCst), 1);
        assert_eq!(handler.metrics().configuration_errors(), 1);
        assert_eq!(handler.metrics().handled(), 1);
        // Only the file write is skipped
        assert_eq!(console.lines().len(), 1);
    }

    #[test]
    fn test_syslog_action_not_routed() {
        let console = MemorySink::new("console");
        let core = Arc::new(LoggerCore::builder("sys").build());
        let (handler, _) = counting_handler(&console);

        handler.handle(&record(&core, LogLevel::Info, DispatchAction::SysLog));

        assert!(console.lines().is_empty());
        assert_eq!(handler.metrics().handled(), 1);
    }

    #[test]
    fn test_builder_panic_is_contained() {
        let console = MemorySink::new("console");
        let core = Arc::new(LoggerCore::builder("panicky").log_builder(PanickingBuilder).build());
        let (handler, reported) = counting_handler(&console);

        handler.handle(&record(&core, LogLevel::Info, DispatchAction::NormalLog));

        assert_eq!(handler.metrics().handler_panics(), 1);
        assert_eq!(reported.load(Ordering::SeqCst), 1);
    }
}
