//! Scheduler - Injected One-Shot Timer Capability
//!
//! Engines never call into wall-clock timers directly; they ask a
//! `Scheduler` to run a tick after a delay and hold the returned
//! [`CancelHandle`]. Swapping in a [`ManualScheduler`] makes the
//! cancellation-on-pause invariant testable without real time.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A scheduled callback. Runs at most once.
pub type TickFn = Box<dyn FnOnce() + Send + 'static>;

/// One-shot timer capability.
///
/// Implementations must invoke `tick` asynchronously with respect to the
/// `schedule_once` call itself - never re-entrantly - so callers may hold
/// their own locks while scheduling.
pub trait Scheduler: Send + Sync + 'static {
    /// Arrange for `tick` to run once, `delay` from now. The returned handle
    /// cancels the tick if it has not fired yet.
    fn schedule_once(&self, delay: Duration, tick: TickFn) -> CancelHandle;
}

/// Cancels a scheduled tick.
///
/// Cancellation is idempotent: cancelling a tick that already fired (or was
/// already cancelled) is a no-op. Dropping the handle without calling
/// [`cancel`](Self::cancel) leaves the tick armed.
pub struct CancelHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl CancelHandle {
    /// Wrap a cancellation action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Cancel the scheduled tick.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Production scheduler backed by the tokio runtime: each tick is a spawned
/// task sleeping out its delay.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// Capture the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime context; use
    /// [`from_handle`](Self::from_handle) when the runtime is owned
    /// elsewhere.
    pub fn new() -> Self {
        Self {
            handle: tokio::runtime::Handle::current(),
        }
    }

    /// Schedule onto an explicit runtime handle.
    pub fn from_handle(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, tick: TickFn) -> CancelHandle {
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tick();
        });
        let abort = task.abort_handle();
        CancelHandle::new(move || abort.abort())
    }
}

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Ticks fire, in due order, only when the owner calls
/// [`advance`](Self::advance). Useful for tests and for hosts that drive
/// playback from their own frame loop.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    queue: Mutex<ManualQueue>,
}

#[derive(Debug, Default)]
struct ManualQueue {
    now: Duration,
    next_seq: u64,
    entries: Vec<ManualEntry>,
}

struct ManualEntry {
    due: Duration,
    seq: u64,
    cancelled: Arc<AtomicBool>,
    tick: Option<TickFn>,
}

impl std::fmt::Debug for ManualEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualEntry")
            .field("due", &self.due)
            .field("seq", &self.seq)
            .field("cancelled", &self.cancelled.load(Ordering::Relaxed))
            .finish()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The virtual clock's current reading.
    pub fn now(&self) -> Duration {
        self.queue.lock().now
    }

    /// Number of live (not yet fired, not cancelled) ticks.
    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .entries
            .iter()
            .filter(|e| !e.cancelled.load(Ordering::Relaxed))
            .count()
    }

    /// Move the virtual clock forward by `by`, firing every due tick in
    /// (due, insertion) order. Ticks scheduled by a firing tick run in the
    /// same call when they fall inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.queue.lock().now + by;
        loop {
            let entry = {
                let mut queue = self.queue.lock();
                queue
                    .entries
                    .retain(|e| !e.cancelled.load(Ordering::Relaxed));
                let next = queue
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due <= target)
                    .min_by_key(|(_, e)| (e.due, e.seq))
                    .map(|(i, _)| i);
                match next {
                    Some(i) => {
                        let entry = queue.entries.remove(i);
                        queue.now = queue.now.max(entry.due);
                        Some(entry)
                    }
                    None => {
                        queue.now = target;
                        None
                    }
                }
            };
            // Run outside the lock: a tick may schedule its successor.
            match entry {
                Some(mut entry) => {
                    if let Some(tick) = entry.tick.take() {
                        tick();
                    }
                }
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, tick: TickFn) -> CancelHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let mut queue = self.queue.lock();
        queue.next_seq += 1;
        let entry = ManualEntry {
            due: queue.now + delay,
            seq: queue.next_seq,
            cancelled,
            tick: Some(tick),
        };
        queue.entries.push(entry);
        CancelHandle::new(move || flag.store(true, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_manual_fires_in_due_order() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (label, delay_ms) in [("b", 20), ("a", 10), ("c", 30)] {
            let order = Arc::clone(&order);
            let _armed = scheduler.schedule_once(
                Duration::from_millis(delay_ms),
                Box::new(move || order.lock().push(label)),
            );
        }

        scheduler.advance(Duration::from_millis(25));
        assert_eq!(*order.lock(), vec!["a", "b"]);
        scheduler.advance(Duration::from_millis(5));
        assert_eq!(*order.lock(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_manual_cancel_prevents_firing() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let handle = scheduler.schedule_once(
            Duration::from_millis(10),
            Box::new(move || flag.store(true, Ordering::Relaxed)),
        );
        handle.cancel();

        scheduler.advance(Duration::from_millis(50));
        assert!(!fired.load(Ordering::Relaxed));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_manual_chained_ticks_fire_within_window() {
        let scheduler = Arc::new(ManualScheduler::new());
        let count = Arc::new(AtomicUsize::new(0));

        fn chain(scheduler: &Arc<ManualScheduler>, count: &Arc<AtomicUsize>) {
            let s = Arc::clone(scheduler);
            let c = Arc::clone(count);
            let _armed = scheduler.schedule_once(
                Duration::from_millis(10),
                Box::new(move || {
                    c.fetch_add(1, Ordering::Relaxed);
                    if c.load(Ordering::Relaxed) < 3 {
                        chain(&s, &c);
                    }
                }),
            );
        }

        chain(&scheduler, &count);
        scheduler.advance(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::Relaxed), 3);
        assert_eq!(scheduler.now(), Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_tokio_scheduler_fires() {
        let scheduler = TokioScheduler::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        let _armed = scheduler.schedule_once(
            Duration::from_millis(5),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );

        rx.await.expect("tick should fire");
    }

    #[tokio::test]
    async fn test_tokio_scheduler_cancel() {
        let scheduler = TokioScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let handle = scheduler.schedule_once(
            Duration::from_millis(20),
            Box::new(move || flag.store(true, Ordering::Relaxed)),
        );
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!fired.load(Ordering::Relaxed));
    }
}
