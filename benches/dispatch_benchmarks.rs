//! Criterion benchmarks for log_dispatch

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use log_dispatch::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn quiet_config() -> DispatchConfig {
    DispatchConfig::default()
        .with_immediate_flush(false)
        .with_intra_drain_pause(Duration::ZERO)
}

// ============================================================================
// Capture Benchmarks
// ============================================================================

fn bench_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture");
    group.throughput(Throughput::Elements(1));

    let core = Arc::new(LoggerCore::builder("bench").build());
    let queue = DispatchQueue::with_capacity(1024);

    group.bench_function("record_new", |b| {
        b.iter(|| {
            let record = LogRecord::new(
                Arc::clone(&core),
                LogLevel::Info,
                DispatchAction::NormalLog,
                black_box("Request processed"),
            );
            black_box(record)
        });
    });

    group.bench_function("queue_push_pop", |b| {
        b.iter(|| {
            queue.push(LogRecord::new(
                Arc::clone(&core),
                LogLevel::Info,
                DispatchAction::NormalLog,
                black_box("Request processed"),
            ));
            black_box(queue.pop_next())
        });
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_sync_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_dispatch");
    group.throughput(Throughput::Elements(1));

    let handler = RecordHandler::new(
        Arc::new(LoggingFlags::new()),
        shared(MemorySink::new("console")),
    );
    let logger = Logger::builder("bench")
        .to_standard_output(LogLevel::Info, false)
        .file(LogLevel::Info, shared(MemorySink::new("file")))
        .flush_threshold(LogLevel::Info, 64)
        .dispatcher(Arc::new(SyncDispatchCallback::new(handler)))
        .build();

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.finish();
}

fn bench_async_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_dispatch");
    group.throughput(Throughput::Elements(1));

    let mut dispatch = AsyncDispatch::builder()
        .config(quiet_config())
        .console(shared(MemorySink::new("console")))
        .start()
        .expect("Failed to start dispatch");
    let logger = dispatch
        .install(Logger::builder("bench"))
        .to_standard_output(LogLevel::Info, false)
        .file(LogLevel::Info, shared(MemorySink::new("file")))
        .build();

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.throughput(Throughput::Elements(1000));
    group.bench_function("drain_1000", |b| {
        b.iter_batched(
            || {
                for i in 0..1000 {
                    logger.info(format!("Message {}", i));
                }
            },
            |()| dispatch.drain_and_stop(),
            BatchSize::PerIteration,
        );
    });

    group.finish();
    let _ = dispatch.shutdown();
}

criterion_group!(benches, bench_capture, bench_sync_dispatch, bench_async_dispatch);
criterion_main!(benches);
