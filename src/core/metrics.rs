//! Dispatch metrics for observability
//!
//! Counters for the capture side (records enqueued) and the handling side
//! (records handled, write and configuration failures, flushes).

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the capture callback and the record handlers
///
/// # Example
///
/// ```
/// use log_dispatch::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_handled();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Records pushed onto the dispatch queue
    enqueued: AtomicU64,

    /// Records taken off the queue and handled, successful or not
    handled: AtomicU64,

    /// Sink writes that reported failure
    write_failures: AtomicU64,

    /// File output requested without a file sink
    configuration_errors: AtomicU64,

    flushes: AtomicU64,
    flush_failures: AtomicU64,

    /// Panics caught while formatting or writing a record
    handler_panics: AtomicU64,

    /// Records handled on the producer thread because the queue was closed
    sync_fallbacks: AtomicU64,

    /// Records rejected by a closed queue with no fallback handler
    dropped: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            handled: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            configuration_errors: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
            handler_panics: AtomicU64::new(0),
            sync_fallbacks: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn configuration_errors(&self) -> u64 {
        self.configuration_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_panics(&self) -> u64 {
        self.handler_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sync_fallbacks(&self) -> u64 {
        self.sync_fallbacks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Records enqueued but not yet handled
    pub fn pending(&self) -> u64 {
        (self.enqueued() + self.sync_fallbacks()).saturating_sub(self.handled())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handled(&self) -> u64 {
        self.handled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_configuration_error(&self) -> u64 {
        self.configuration_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush_failure(&self) -> u64 {
        self.flush_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_panic(&self) -> u64 {
        self.handler_panics.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sync_fallback(&self) -> u64 {
        self.sync_fallbacks.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of handled records whose file or console write failed (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let handled = self.handled() as f64;
        if handled == 0.0 {
            0.0
        } else {
            (self.write_failures() as f64 / handled) * 100.0
        }
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            handled: AtomicU64::new(self.handled()),
            write_failures: AtomicU64::new(self.write_failures()),
            configuration_errors: AtomicU64::new(self.configuration_errors()),
            flushes: AtomicU64::new(self.flushes()),
            flush_failures: AtomicU64::new(self.flush_failures()),
            handler_panics: AtomicU64::new(self.handler_panics()),
            sync_fallbacks: AtomicU64::new(self.sync_fallbacks()),
            dropped: AtomicU64::new(self.dropped()),
        }
    }
}
