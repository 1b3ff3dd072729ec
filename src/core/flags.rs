//! Shared logging flags consulted by record handlers

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Behavior switches shared by every handler of a dispatch setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LoggingFlag {
    /// Flush a sink after every successful write
    ImmediateFlush = 1 << 0,
    /// Apply the formatter's color conversion to standard output lines
    ColoredTerminalOutput = 1 << 1,
}

impl fmt::Display for LoggingFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingFlag::ImmediateFlush => write!(f, "ImmediateFlush"),
            LoggingFlag::ColoredTerminalOutput => write!(f, "ColoredTerminalOutput"),
        }
    }
}

/// Atomic flag set, shared through `Arc` between the worker, the handlers and
/// whoever configures them.
#[derive(Debug, Default)]
pub struct LoggingFlags {
    bits: AtomicU32,
}

impl LoggingFlags {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
        }
    }

    pub fn add_flag(&self, flag: LoggingFlag) {
        self.bits.fetch_or(flag as u32, Ordering::AcqRel);
    }

    pub fn remove_flag(&self, flag: LoggingFlag) {
        self.bits.fetch_and(!(flag as u32), Ordering::AcqRel);
    }

    #[inline]
    pub fn has_flag(&self, flag: LoggingFlag) -> bool {
        self.bits.load(Ordering::Acquire) & (flag as u32) != 0
    }

    pub fn set_flag(&self, flag: LoggingFlag, enabled: bool) {
        if enabled {
            self.add_flag(flag);
        } else {
            self.remove_flag(flag);
        }
    }
}
