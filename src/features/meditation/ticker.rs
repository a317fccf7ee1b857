//! One-second scheduling for the countdown.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// A cancellable periodic callback running on the tokio runtime.
///
/// At most one task is alive per ticker; spawning again replaces it.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Create an idle ticker.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Call `on_tick` every `period`, starting one period from now, until it
    /// returns `ControlFlow::Break` or the ticker is cancelled.
    pub fn spawn<F, Fut>(&mut self, period: Duration, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        self.cancel();

        let first = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if on_tick().await.is_break() {
                    break;
                }
            }
        });

        self.handle = Some(handle);
    }

    /// Stop the periodic task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a task is scheduled and has not ended.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting(count: &Arc<AtomicU32>, stop_after: u32) -> impl FnMut() -> std::future::Ready<ControlFlow<()>> {
        let count = count.clone();
        move || {
            let n = count.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= stop_after {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let count = Arc::new(AtomicU32::new(0));
        let mut ticker = Ticker::new();
        ticker.spawn(Duration::from_secs(1), counting(&count, u32::MAX));

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let count = Arc::new(AtomicU32::new(0));
        let mut ticker = Ticker::new();
        ticker.spawn(Duration::from_secs(1), counting(&count, u32::MAX));

        time::sleep(Duration::from_millis(2_500)).await;
        ticker.cancel();
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_break_ends_task() {
        let count = Arc::new(AtomicU32::new(0));
        let mut ticker = Ticker::new();
        ticker.spawn(Duration::from_secs(1), counting(&count, 2));

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!ticker.is_active());
    }
}
