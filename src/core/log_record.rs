//! Immutable snapshot of one log event

use super::log_level::LogLevel;
use super::logger::LoggerCore;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn current_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Requested handling kind for a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispatchAction {
    /// Render and route to the configured sinks
    #[default]
    NormalLog,
    /// Rendered without the trailing newline and never routed to sinks here
    SysLog,
}

/// What the logging front-end hands to a dispatch callback.
///
/// Borrows from the call site; callbacks that outlive the call copy it into a
/// [`LogRecord`].
#[derive(Clone, Copy)]
pub struct DispatchData<'a> {
    pub message: &'a str,
    pub logger: &'a Arc<LoggerCore>,
    pub level: LogLevel,
    pub action: DispatchAction,
}

/// A log event captured on the producer thread.
///
/// Holds its own copy of the message and a shared reference to the immutable
/// logger core, so cloning is cheap and nothing on the producer side is
/// borrowed after capture.
#[derive(Clone)]
pub struct LogRecord {
    message: String,
    level: LogLevel,
    action: DispatchAction,
    logger: Arc<LoggerCore>,
    timestamp: DateTime<Utc>,
    thread_id: String,
    thread_name: Option<String>,
}

impl LogRecord {
    pub fn new(
        logger: Arc<LoggerCore>,
        level: LogLevel,
        action: DispatchAction,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            level,
            action,
            logger,
            timestamp: Utc::now(),
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
        }
    }

    /// Copy everything needed to render and route the event
    pub fn capture(data: &DispatchData<'_>) -> Self {
        Self::new(
            Arc::clone(data.logger),
            data.level,
            data.action,
            data.message,
        )
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn action(&self) -> DispatchAction {
        self.action
    }

    #[inline]
    pub fn logger(&self) -> &Arc<LoggerCore> {
        &self.logger
    }

    #[inline]
    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    #[inline]
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    #[inline]
    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    /// Thread name when set, thread id otherwise
    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}

impl fmt::Debug for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRecord")
            .field("logger", &self.logger.id())
            .field("level", &self.level)
            .field("action", &self.action)
            .field("message", &self.message)
            .field("timestamp", &self.timestamp)
            .field("thread", &self.thread_label())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logger::LoggerCore;

    #[test]
    fn test_capture_copies_dispatch_data() {
        let core = Arc::new(LoggerCore::builder("capture").build());
        let message = String::from("disk usage at 91%");
        let data = DispatchData {
            message: &message,
            logger: &core,
            level: LogLevel::Warn,
            action: DispatchAction::NormalLog,
        };

        let record = LogRecord::capture(&data);
        drop(message);

        assert_eq!(record.message(), "disk usage at 91%");
        assert_eq!(record.level(), LogLevel::Warn);
        assert_eq!(record.action(), DispatchAction::NormalLog);
        assert_eq!(record.logger().id(), "capture");
        assert!(Arc::ptr_eq(record.logger(), &core));
    }

    #[test]
    fn test_clone_shares_logger_core() {
        let core = Arc::new(LoggerCore::builder("clone").build());
        let record = LogRecord::new(Arc::clone(&core), LogLevel::Info, DispatchAction::SysLog, "x");
        let copy = record.clone();

        assert!(Arc::ptr_eq(record.logger(), copy.logger()));
        assert_eq!(copy.action(), DispatchAction::SysLog);
        assert_eq!(copy.timestamp(), record.timestamp());
    }

    #[test]
    fn test_thread_label_uses_name() {
        let handle = std::thread::Builder::new()
            .name("producer-7".into())
            .spawn(|| {
                let core = Arc::new(LoggerCore::builder("t").build());
                LogRecord::new(core, LogLevel::Info, DispatchAction::NormalLog, "hi")
            })
            .unwrap();
        let record = handle.join().unwrap();
        assert_eq!(record.thread_label(), "producer-7");
        assert_eq!(record.thread_name(), Some("producer-7"));
    }
}
