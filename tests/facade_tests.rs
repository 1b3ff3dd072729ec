//! `log` facade bridge, installed process-wide
//!
//! Kept in its own test binary: a `log` backend can only be installed once
//! per process.

use log_dispatch::prelude::*;
use std::sync::Arc;

#[test]
fn test_facade_feeds_async_pipeline() {
    let console = MemorySink::new("console");
    let mut dispatch = AsyncDispatch::builder()
        .console(shared(console.clone()))
        .start()
        .expect("Failed to start dispatch");
    let logger = Arc::new(
        dispatch
            .install(Logger::builder("facade"))
            .min_level(LogLevel::Debug)
            .build(),
    );

    FacadeLogger::install(Arc::clone(&logger)).expect("install failed");
    assert!(FacadeLogger::install(Arc::clone(&logger)).is_err());

    log::info!(target: "http", "GET /health 200");
    log::debug!(target: "http", "keep-alive reused");
    log::trace!(target: "http", "filtered by min level");

    // Raising verbosity after install reaches facade calls
    logger.set_min_level(LogLevel::Trace);
    assert!(log::log_enabled!(target: "http", log::Level::Trace));
    log::trace!(target: "http", "socket closed by peer");

    dispatch.shutdown().expect("shutdown failed");

    let lines = console.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("GET /health 200"));
    assert!(lines[0].contains("[INFO ]"));
    assert!(lines[1].contains("keep-alive reused"));
    assert!(lines[1].contains("[DEBUG]"));
    assert!(lines[2].contains("socket closed by peer"));
    assert!(lines[2].contains("[TRACE]"));
}
