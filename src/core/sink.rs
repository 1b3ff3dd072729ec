//! Sink trait for rendered log output destinations

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// A destination for rendered lines: a file, standard output, a buffer.
///
/// Errors are plain `io::Error`s; the dispatcher wraps them with the sink name
/// and level before reporting.
pub trait Sink: Send {
    /// Write one rendered line. `line` already carries its newline if any.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    fn name(&self) -> &str;
}

/// Sink handle shared between logger configurations and handlers
pub type SharedSink = Arc<Mutex<dyn Sink>>;

/// Wrap a sink so it can be referenced from several level settings
pub fn shared<S: Sink + 'static>(sink: S) -> SharedSink {
    Arc::new(Mutex::new(sink))
}
