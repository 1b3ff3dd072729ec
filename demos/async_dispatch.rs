//! Async dispatch example
//!
//! Demonstrates producer threads logging through the dispatch worker, with
//! errors routed to a file and everything echoed to the console.
//!
//! Run with: cargo run --example async_dispatch

use log_dispatch::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== log_dispatch - Async Dispatch Example ===\n");

    let config = DispatchConfig::default().with_colored_terminal_output(true);
    let mut dispatch = AsyncDispatch::builder()
        .config(config)
        .on_diagnostic(Arc::new(|err: &DispatchError| {
            println!("   (diagnostic observed: {})", err);
        }))
        .start()?;

    let errors = shared(FileSink::new("async_dispatch.log")?);
    let logger = Arc::new(
        dispatch
            .install(Logger::builder("demo"))
            .min_level(LogLevel::Debug)
            .file(LogLevel::Error, errors.clone())
            .file(LogLevel::Fatal, errors)
            .level(
                LogLevel::Warn,
                LevelSettings {
                    to_file: true,
                    ..LevelSettings::default()
                },
            )
            .build(),
    );

    println!("1. Records are captured on the calling thread:");
    for i in 0..10 {
        logger.info(format!("Message #{}", i));
    }
    logger.error("upstream returned 503");
    dispatch.drain_and_stop()?;
    println!("   Drained {} records", dispatch.metrics().handled());

    println!("\n2. Multi-threaded producers:");
    let handles: Vec<_> = (0..4)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            thread::Builder::new()
                .name(format!("producer-{}", thread_id))
                .spawn(move || {
                    for i in 0..5 {
                        logger.debug(format!("Thread {} - Message {}", thread_id, i));
                        thread::sleep(Duration::from_millis(2));
                    }
                })
        })
        .collect::<std::io::Result<_>>()?;

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("producer thread panicked");
        }
    }

    println!("\n3. A WARN level routed to a file without a sink is reported, not fatal:");
    logger.warn("disk usage at 91%");

    dispatch.shutdown()?;

    let metrics = dispatch.metrics();
    println!("\n=== Example completed successfully! ===");
    println!(
        "Enqueued: {}, handled: {}, configuration errors: {}",
        metrics.enqueued(),
        metrics.handled(),
        metrics.configuration_errors()
    );
    println!("Check 'async_dispatch.log' for file output");

    Ok(())
}
