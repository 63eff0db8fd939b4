//! Call pacing on a single shared timeline
//!
//! Every call submitted to one [`CallScheduler`] reserves the next free slot
//! on its timeline. Slots are `interval` apart and are handed out in
//! submission order, so a burst of N calls is spread over `(N - 1) *
//! interval` instead of clustering once the first delay elapses.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Serializes the start times of outgoing calls
///
/// The scheduler never fails and never retries; it only delays. Whatever the
/// call resolves to is handed back unchanged.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use vkclient_common::CallScheduler;
///
/// # async fn example() {
/// let scheduler = CallScheduler::new(Duration::from_millis(333));
///
/// let first = scheduler.schedule(|| async { "runs now" });
/// let second = scheduler.schedule(|| async { "runs 333ms later" });
///
/// assert_eq!(first.await, "runs now");
/// assert_eq!(second.await, "runs 333ms later");
/// # }
/// ```
#[derive(Debug)]
pub struct CallScheduler {
    interval: Duration,
    /// Earliest start of the next call; `None` until the first reservation
    next_eligible: Mutex<Option<Instant>>,
}

impl CallScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next_eligible: Mutex::new(None) }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `call` at the next slot of the timeline.
    ///
    /// The slot is reserved when `schedule` is called, not when the returned
    /// future is first polled, so submission order is slot order. Dropping
    /// the returned future before it completes still consumes the slot.
    pub fn schedule<F, Fut>(&self, call: F) -> impl Future<Output = Fut::Output>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let start_at = self.reserve_slot();

        async move {
            if let Some(deadline) = start_at {
                sleep_until(deadline).await;
            }
            call().await
        }
    }

    /// How long a call submitted right now would wait, without reserving.
    pub fn pending_delay(&self) -> Duration {
        let now = Instant::now();
        match *self.lock_cursor() {
            Some(next) if next > now => next - now,
            _ => Duration::ZERO,
        }
    }

    /// Advance the cursor by one slot.
    ///
    /// Returns the instant the caller must wait for, or `None` when the call
    /// may start immediately. The cursor never ends up behind `now`.
    fn reserve_slot(&self) -> Option<Instant> {
        let now = Instant::now();
        let mut cursor = self.lock_cursor();

        match *cursor {
            Some(next) if next > now => {
                *cursor = Some(next + self.interval);
                let delay_ms = (next - now).as_millis() as u64;
                debug!(delay_ms, "call delayed to next slot");
                Some(next)
            }
            _ => {
                *cursor = Some(now + self.interval);
                None
            }
        }
    }

    fn lock_cursor(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        match self.next_eligible.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Call scheduler cursor lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::future::join_all;

    use super::*;

    const INTERVAL: Duration = Duration::from_millis(333);

    /// Paused-clock timers fire on millisecond ticks; allow one tick of slack.
    fn assert_started_at(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual <= expected + Duration::from_millis(1),
            "started at {actual:?}, expected {expected:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_call_runs_immediately() {
        let scheduler = CallScheduler::new(INTERVAL);
        let submitted = Instant::now();

        let started = scheduler.schedule(|| async { Instant::now() }).await;

        assert_eq!(started, submitted);
        assert_eq!(scheduler.pending_delay(), INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_spread_one_interval_apart() {
        let scheduler = CallScheduler::new(INTERVAL);
        let origin = Instant::now();

        let calls = (0..5).map(|_| scheduler.schedule(|| async { Instant::now() }));
        let started = join_all(calls).await;

        for (k, at) in started.iter().enumerate() {
            assert_started_at(*at - origin, INTERVAL * k as u32);
        }
        for pair in started.windows(2) {
            assert!(pair[1] - pair[0] >= INTERVAL);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_chain_from_previous_reservation() {
        let scheduler = CallScheduler::new(INTERVAL);
        let origin = Instant::now();

        scheduler.schedule(|| async {}).await;
        tokio::time::advance(Duration::from_millis(100)).await;

        // still inside the first interval: waits for the end of slot 1 and
        // pushes the cursor to the end of slot 2, not to now + interval
        let started = scheduler.schedule(|| async { Instant::now() }).await;
        assert_started_at(started - origin, INTERVAL);

        let third = scheduler.schedule(|| async { Instant::now() }).await;
        assert_started_at(third - origin, INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_scheduler_becomes_eligible_again() {
        let scheduler = CallScheduler::new(INTERVAL);

        scheduler.schedule(|| async {}).await;
        tokio::time::advance(Duration::from_secs(2)).await;

        let submitted = Instant::now();
        let started = scheduler.schedule(|| async { Instant::now() }).await;
        assert_eq!(started, submitted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_pass_through_unchanged() {
        let scheduler = CallScheduler::new(INTERVAL);

        let result: Result<(), &str> = scheduler.schedule(|| async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));

        // a failed call still consumed its slot
        assert_eq!(scheduler.pending_delay(), INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_never_delays() {
        let scheduler = CallScheduler::new(Duration::ZERO);
        let origin = Instant::now();

        let started = join_all((0..3).map(|_| scheduler.schedule(|| async { Instant::now() }))).await;

        assert!(started.iter().all(|at| *at == origin));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_call_keeps_its_slot() {
        let scheduler = CallScheduler::new(INTERVAL);
        let origin = Instant::now();

        scheduler.schedule(|| async {}).await;
        drop(scheduler.schedule(|| async {}));

        let started = scheduler.schedule(|| async { Instant::now() }).await;
        assert_started_at(started - origin, INTERVAL * 2);
    }
}
