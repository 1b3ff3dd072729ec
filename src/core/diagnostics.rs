//! Internal error reporting for failures discovered after the producer returned

use super::error::DispatchError;
use super::record_handler::panic_message;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Callback invoked for every reported internal error
///
/// Typically forwards the error into an application logger. Errors raised
/// while the hook itself runs are suppressed on that thread, and a panicking
/// hook is contained and reported on stderr.
pub type DiagnosticHook = Arc<dyn Fn(&DispatchError) + Send + Sync>;

thread_local! {
    static REPORTING: Cell<bool> = const { Cell::new(false) };
}

/// Resets the re-entrancy guard even if the hook panics
struct ReportingGuard;

impl ReportingGuard {
    fn enter() -> Option<Self> {
        REPORTING.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(ReportingGuard)
            }
        })
    }
}

impl Drop for ReportingGuard {
    fn drop(&mut self) {
        REPORTING.with(|flag| flag.set(false));
    }
}

#[derive(Clone)]
pub struct Diagnostics {
    hook: Option<DiagnosticHook>,
    stderr: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            hook: None,
            stderr: true,
        }
    }

    #[must_use]
    pub fn with_hook(mut self, hook: DiagnosticHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Disable the `[LOGGER ERROR]` lines on stderr
    #[must_use]
    pub fn with_stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    /// Report a non-fatal error. Returns `false` when suppressed because a
    /// report is already in progress on this thread.
    pub fn report(&self, err: &DispatchError) -> bool {
        let Some(_guard) = ReportingGuard::enter() else {
            return false;
        };

        if self.stderr {
            match err {
                DispatchError::HandlerPanicked { .. } => {
                    eprintln!("[LOGGER CRITICAL] {}. Dispatch continues.", err)
                }
                _ => eprintln!("[LOGGER ERROR] {}", err),
            }
        }
        if let Some(ref hook) = self.hook {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| hook(err))) {
                eprintln!(
                    "[LOGGER CRITICAL] Diagnostic hook panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
        true
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_hook_receives_error() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        let diagnostics = Diagnostics::new()
            .with_stderr(false)
            .with_hook(Arc::new(move |err: &DispatchError| {
                assert!(err.is_configuration_error());
                seen_clone.fetch_add(1, Ordering::SeqCst);
            }));

        assert!(diagnostics.report(&DispatchError::missing_file_sink("default", LogLevel::Warn)));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_hook_is_contained() {
        let diagnostics = Diagnostics::new()
            .with_stderr(false)
            .with_hook(Arc::new(|_: &DispatchError| panic!("hook bug")));

        assert!(diagnostics.report(&DispatchError::QueueNotEmpty { remaining: 1 }));
        // The guard was released despite the panic
        assert!(diagnostics.report(&DispatchError::QueueNotEmpty { remaining: 2 }));
    }

    #[test]
    fn test_nested_report_is_suppressed() {
        let nested_result = Arc::new(parking_lot::Mutex::new(None));
        let nested_clone = Arc::clone(&nested_result);
        let inner = Diagnostics::new().with_stderr(false);

        let outer = Diagnostics::new()
            .with_stderr(false)
            .with_hook(Arc::new(move |_: &DispatchError| {
                let suppressed = !inner.report(&DispatchError::QueueNotEmpty { remaining: 1 });
                *nested_clone.lock() = Some(suppressed);
            }));

        assert!(outer.report(&DispatchError::QueueNotEmpty { remaining: 1 }));
        assert_eq!(*nested_result.lock(), Some(true));

        // Guard is released once the outer report returns
        assert!(Diagnostics::new()
            .with_stderr(false)
            .report(&DispatchError::QueueNotEmpty { remaining: 0 }));
    }
}
