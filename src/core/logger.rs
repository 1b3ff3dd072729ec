//! Logger front-end and the per-logger routing configuration

use super::{
    dispatch_callback::{DispatchCallback, SyncDispatchCallback},
    error::Result,
    log_builder::{LogBuilder, PatternLogBuilder},
    log_level::LogLevel,
    log_record::{DispatchAction, DispatchData},
    sink::{Sink, SharedSink},
};
use parking_lot::RwLock;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Routing for one level
#[derive(Clone)]
pub struct LevelSettings {
    pub enabled: bool,
    pub to_file: bool,
    pub to_standard_output: bool,
    pub file: Option<SharedSink>,
    /// Flush the file sink after this many unflushed writes; 0 disables
    pub flush_threshold: usize,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            to_file: false,
            to_standard_output: true,
            file: None,
            flush_threshold: 0,
        }
    }
}

impl fmt::Debug for LevelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelSettings")
            .field("enabled", &self.enabled)
            .field("to_file", &self.to_file)
            .field("to_standard_output", &self.to_standard_output)
            .field("file", &self.file.as_ref().map(|s| s.lock().name().to_string()))
            .field("flush_threshold", &self.flush_threshold)
            .finish()
    }
}

/// Per-level answers the record handler asks for
#[derive(Debug, Clone, Default)]
pub struct TypedConfigurations {
    levels: [LevelSettings; LogLevel::COUNT],
}

impl TypedConfigurations {
    #[inline]
    pub fn settings(&self, level: LogLevel) -> &LevelSettings {
        &self.levels[level.index()]
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.settings(level).enabled
    }

    #[inline]
    pub fn to_file(&self, level: LogLevel) -> bool {
        self.settings(level).to_file
    }

    #[inline]
    pub fn to_standard_output(&self, level: LogLevel) -> bool {
        self.settings(level).to_standard_output
    }

    #[inline]
    pub fn file_sink(&self, level: LogLevel) -> Option<&SharedSink> {
        self.settings(level).file.as_ref()
    }

    #[inline]
    pub fn flush_threshold(&self, level: LogLevel) -> usize {
        self.settings(level).flush_threshold
    }
}

/// The immutable part of a logger that travels with every record
pub struct LoggerCore {
    id: String,
    configurations: TypedConfigurations,
    builder: Arc<dyn LogBuilder>,
    unflushed: [AtomicUsize; LogLevel::COUNT],
}

impl LoggerCore {
    pub fn builder(id: impl Into<String>) -> LoggerCoreBuilder {
        LoggerCoreBuilder::new(id)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn configurations(&self) -> &TypedConfigurations {
        &self.configurations
    }

    #[inline]
    pub fn log_builder(&self) -> &dyn LogBuilder {
        self.builder.as_ref()
    }

    /// Count one more unflushed write for `level` and report whether the
    /// flush threshold is reached.
    pub fn is_flush_needed(&self, level: LogLevel) -> bool {
        let threshold = self.configurations.flush_threshold(level);
        if threshold == 0 {
            return false;
        }
        self.unflushed[level.index()].fetch_add(1, Ordering::AcqRel) + 1 >= threshold
    }

    /// Flush `sink` on behalf of `level` and reset its unflushed count
    pub fn flush(&self, level: LogLevel, sink: &mut dyn Sink) -> io::Result<()> {
        sink.flush()?;
        self.unflushed[level.index()].store(0, Ordering::Release);
        Ok(())
    }

    /// Flush every configured file sink once
    pub fn flush_all(&self) -> Result<()> {
        let mut flushed: Vec<&SharedSink> = Vec::new();
        for level in LogLevel::ALL {
            let Some(sink) = self.configurations.file_sink(level) else {
                continue;
            };
            if flushed.iter().any(|seen| Arc::ptr_eq(seen, sink)) {
                continue;
            }
            self.flush(level, &mut *sink.lock())?;
            flushed.push(sink);
        }
        Ok(())
    }
}

impl fmt::Debug for LoggerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerCore")
            .field("id", &self.id)
            .field("configurations", &self.configurations)
            .finish_non_exhaustive()
    }
}

/// Builder for [`LoggerCore`]
pub struct LoggerCoreBuilder {
    id: String,
    configurations: TypedConfigurations,
    builder: Option<Arc<dyn LogBuilder>>,
}

impl LoggerCoreBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            configurations: TypedConfigurations::default(),
            builder: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_builder<B: LogBuilder + 'static>(mut self, builder: B) -> Self {
        self.builder = Some(Arc::new(builder));
        self
    }

    /// Replace the settings of one level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel, settings: LevelSettings) -> Self {
        self.configurations.levels[level.index()] = settings;
        self
    }

    /// Apply `update` to the settings of every level
    #[must_use = "builder methods return a new value"]
    pub fn all_levels(mut self, update: impl Fn(&mut LevelSettings)) -> Self {
        self.configurations.levels.iter_mut().for_each(update);
        self
    }

    /// Route `level` to `sink` in addition to its other outputs
    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, level: LogLevel, sink: SharedSink) -> Self {
        let settings = &mut self.configurations.levels[level.index()];
        settings.to_file = true;
        settings.file = Some(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn to_standard_output(mut self, level: LogLevel, enabled: bool) -> Self {
        self.configurations.levels[level.index()].to_standard_output = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_threshold(mut self, level: LogLevel, threshold: usize) -> Self {
        self.configurations.levels[level.index()].flush_threshold = threshold;
        self
    }

    pub fn build(self) -> LoggerCore {
        LoggerCore {
            id: self.id,
            configurations: self.configurations,
            builder: self
                .builder
                .unwrap_or_else(|| Arc::new(PatternLogBuilder::default())),
            unflushed: Default::default(),
        }
    }
}

/// Application-facing logger.
///
/// Every accepted call is handed to exactly one installed dispatch callback:
/// the synchronous default, or the asynchronous capture callback.
pub struct Logger {
    core: Arc<LoggerCore>,
    min_level: RwLock<LogLevel>,
    dispatcher: Arc<dyn DispatchCallback>,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use log_dispatch::prelude::*;
    ///
    /// let logger = Logger::builder("default")
    ///     .min_level(LogLevel::Debug)
    ///     .build();
    /// logger.info("ready");
    /// ```
    #[must_use]
    pub fn builder(id: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(id)
    }

    #[inline]
    pub fn id(&self) -> &str {
        self.core.id()
    }

    #[inline]
    pub fn core(&self) -> &Arc<LoggerCore> {
        &self.core
    }

    pub fn dispatcher_name(&self) -> &str {
        self.dispatcher.name()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read() && self.core.configurations().enabled(level)
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.dispatch(level, DispatchAction::NormalLog, message);
    }

    pub fn dispatch(&self, level: LogLevel, action: DispatchAction, message: impl AsRef<str>) {
        if !self.is_enabled(level) {
            return;
        }

        self.dispatcher.handle(&DispatchData {
            message: message.as_ref(),
            logger: &self.core,
            level,
            action,
        });
    }

    /// Flush the file sinks of this logger
    pub fn flush(&self) -> Result<()> {
        self.core.flush_all()
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("id", &self.core.id())
            .field("min_level", &self.min_level())
            .field("dispatcher", &self.dispatcher.name())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use log_dispatch::prelude::*;
///
/// let errors = shared(MemorySink::new("errors"));
/// let logger = Logger::builder("payments")
///     .min_level(LogLevel::Info)
///     .file(LogLevel::Error, errors.clone())
///     .flush_threshold(LogLevel::Error, 10)
///     .build();
///
/// logger.error("card declined");
/// ```
pub struct LoggerBuilder {
    core: LoggerCoreBuilder,
    min_level: LogLevel,
    dispatcher: Option<Arc<dyn DispatchCallback>>,
}

impl LoggerBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            core: LoggerCoreBuilder::new(id),
            min_level: LogLevel::Info,
            dispatcher: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_builder<B: LogBuilder + 'static>(mut self, builder: B) -> Self {
        self.core = self.core.log_builder(builder);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel, settings: LevelSettings) -> Self {
        self.core = self.core.level(level, settings);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn all_levels(mut self, update: impl Fn(&mut LevelSettings)) -> Self {
        self.core = self.core.all_levels(update);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, level: LogLevel, sink: SharedSink) -> Self {
        self.core = self.core.file(level, sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn to_standard_output(mut self, level: LogLevel, enabled: bool) -> Self {
        self.core = self.core.to_standard_output(level, enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_threshold(mut self, level: LogLevel, threshold: usize) -> Self {
        self.core = self.core.flush_threshold(level, threshold);
        self
    }

    /// Install the dispatch callback, replacing the synchronous default
    #[must_use = "builder methods return a new value"]
    pub fn dispatcher(mut self, dispatcher: Arc<dyn DispatchCallback>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            core: Arc::new(self.core.build()),
            min_level: RwLock::new(self.min_level),
            dispatcher: self
                .dispatcher
                .unwrap_or_else(|| Arc::new(SyncDispatchCallback::default())),
        }
    }
}
