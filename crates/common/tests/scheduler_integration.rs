//! Integration tests for call pacing across independent tasks

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use vkclient_common::CallScheduler;

/// Validates that calls submitted from separate tasks share one timeline.
///
/// Each task submits a few calls and records when its calls actually start.
/// Merged and sorted, the start times must be at least one interval apart no
/// matter which task they came from.
#[tokio::test(start_paused = true)]
async fn test_spawned_tasks_share_one_timeline() {
    let interval = Duration::from_millis(333);
    let scheduler = Arc::new(CallScheduler::new(interval));
    let starts = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for task in 0..3u32 {
        let scheduler = Arc::clone(&scheduler);
        let starts = Arc::clone(&starts);
        handles.push(tokio::spawn(async move {
            for call in 0..3u32 {
                let starts = Arc::clone(&starts);
                scheduler
                    .schedule(|| async move {
                        starts.lock().await.push((Instant::now(), task, call));
                    })
                    .await;
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked");
    }

    let mut starts = starts.lock().await.clone();
    starts.sort_by_key(|(at, _, _)| *at);

    assert_eq!(starts.len(), 9);
    for pair in starts.windows(2) {
        assert!(
            pair[1].0 - pair[0].0 >= interval,
            "calls {:?} and {:?} started too close together",
            (pair[0].1, pair[0].2),
            (pair[1].1, pair[1].2)
        );
    }
    let span = starts[8].0 - starts[0].0;
    assert!(span >= interval * 8);
}

/// Validates that a scheduler can wrap fallible calls without altering their
/// results.
#[tokio::test(start_paused = true)]
async fn test_results_are_returned_in_submission_order() {
    let scheduler = CallScheduler::new(Duration::from_millis(50));

    let ok = scheduler.schedule(|| async { Ok::<_, String>(1) });
    let err = scheduler.schedule(|| async { Err::<i32, _>("remote said no".to_string()) });
    let late = scheduler.schedule(|| async { Ok::<_, String>(3) });

    assert_eq!(ok.await, Ok(1));
    assert_eq!(err.await, Err("remote said no".to_string()));
    assert_eq!(late.await, Ok(3));
}
