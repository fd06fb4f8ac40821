use std::sync::Arc;
use std::time::{Duration, Instant};

use conflux::concurrency::shutdown::ShutdownResult;
use conflux::config::PipelineConfig;
use conflux::pipeline::Pipeline;
use conflux::stages::completion::{CompletionHandle, wait_all};
use conflux::stages::sink::{collect, collect_with_shutdown};
use conflux_telemetry::tracing::init_test_tracing;
use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::sleep;

fn config(workers: usize, max_jitter_ms: u64) -> PipelineConfig {
    PipelineConfig {
        workers,
        conduit_capacity: 1,
        max_jitter_ms,
    }
}

/// The output the pipeline would produce if items flowed strictly one by one.
fn expected_sequential_output(n: u64) -> Vec<String> {
    (0..n).map(|i| format!("out-{i}")).collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn fan_out_fan_in_preserves_the_item_set() {
    init_test_tracing();

    let n = 100u64;
    let items = (0..n).map(|i| i.to_string());
    let mut pipeline = Pipeline::new(config(4, 0), items, |item: String| async move {
        format!("out-{item}")
    });

    let rx = pipeline.start().unwrap();
    let mut result = collect(rx).await;

    let mut expected = expected_sequential_output(n);
    result.sort();
    expected.sort();
    assert_eq!(result, expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn single_worker_preserves_input_order() {
    init_test_tracing();

    let items = (0..5u64).map(|i| i.to_string());
    let mut pipeline = Pipeline::new(config(1, 0), items, |item: String| async move {
        format!("out-{item}")
    });

    let rx = pipeline.start().unwrap();
    let result = collect(rx).await;

    assert_eq!(result, expected_sequential_output(5));
}

#[tokio::test(flavor = "multi_thread")]
async fn fan_out_with_jitter_does_not_preserve_order() {
    init_test_tracing();

    let n = 10u64;
    let items = (0..n).map(|i| i.to_string());
    let mut pipeline = Pipeline::new(config(10, 50), items, |item: String| async move {
        format!("out-{item}")
    });

    let rx = pipeline.start().unwrap();
    let mut result = collect(rx).await;

    // Same item set, but fan-in races by completion time: with per-item
    // random delays the strictly sequential order is all but impossible.
    let expected = expected_sequential_output(n);
    assert_ne!(result, expected);

    result.sort();
    let mut expected_sorted = expected;
    expected_sorted.sort();
    assert_eq!(result, expected_sorted);
}

#[tokio::test(flavor = "multi_thread")]
async fn single_worker_pays_the_sum_of_item_costs() {
    init_test_tracing();

    let n = 5u64;
    let work_time = Duration::from_millis(100);
    let mut pipeline = Pipeline::new(config(1, 0), 0..n, move |item| async move {
        sleep(work_time).await;
        item
    });

    let start = Instant::now();
    let rx = pipeline.start().unwrap();
    let result = collect(rx).await;

    assert_eq!(result.len(), n as usize);
    assert!(start.elapsed() >= work_time * n as u32);
}

#[tokio::test(flavor = "multi_thread")]
async fn one_worker_per_item_pays_roughly_one_item_cost() {
    init_test_tracing();

    let n = 8u64;
    let work_time = Duration::from_millis(100);
    let mut pipeline = Pipeline::new(config(n as usize, 0), 0..n, move |item| async move {
        sleep(work_time).await;
        item
    });

    let start = Instant::now();
    let rx = pipeline.start().unwrap();
    let result = collect(rx).await;
    let elapsed = start.elapsed();

    assert_eq!(result.len(), n as usize);
    assert!(elapsed >= work_time);
    // Far below the sequential n * work_time; generous slack for scheduling.
    assert!(
        elapsed < work_time + Duration::from_millis(250),
        "fan-out took {elapsed:?}, expected about {work_time:?}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn completion_handles_preserve_submission_order() {
    init_test_tracing();

    let n = 32u64;
    let handles: Vec<_> = (0..n)
        .map(|i| {
            CompletionHandle::start(move || async move {
                let delay = rand::thread_rng().gen_range(10..=100);
                sleep(Duration::from_millis(delay)).await;
                format!("out-{i}")
            })
        })
        .collect();

    let start = Instant::now();
    let result = wait_all(handles).await.unwrap();
    let elapsed = start.elapsed();

    // Results come back in creation order no matter which task finished
    // first, and the total cost is the slowest task, not the sum.
    assert_eq!(result, expected_sequential_output(n));
    assert!(
        elapsed < Duration::from_millis(500),
        "ordered retrieval took {elapsed:?}, expected about the max latency"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn locked_aggregate_sees_every_concurrent_writer() {
    init_test_tracing();

    let n = 100;
    let aggregate = Arc::new(Mutex::new(Vec::new()));

    let mut writers = Vec::with_capacity(n);
    for id in 0..n {
        let aggregate = Arc::clone(&aggregate);
        writers.push(tokio::spawn(async move {
            aggregate.lock().await.push(id);
        }));
    }

    for writer in writers {
        writer.await.unwrap();
    }

    assert_eq!(aggregate.lock().await.len(), n);
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_cuts_a_long_pipeline_promptly() {
    init_test_tracing();

    let n = 10_000u64;
    let mut pipeline = Pipeline::new(config(2, 0), 0..n, |item| async move {
        sleep(Duration::from_millis(20)).await;
        item
    });

    let rx = pipeline.start().unwrap();
    let shutdown_tx = pipeline.shutdown_tx();
    let shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        sleep(Duration::from_millis(150)).await;
        shutdown_tx.shutdown();
    });

    let start = Instant::now();
    let result = collect_with_shutdown(rx, shutdown_rx).await;
    let elapsed = start.elapsed();

    assert!(result.is_shutdown());
    let ShutdownResult::Shutdown(partial) = result else {
        unreachable!();
    };
    assert!(!partial.is_empty());
    assert!((partial.len() as u64) < n);
    // The drain must return at the signal, not after the remaining items.
    assert!(elapsed < Duration::from_secs(2));
}
