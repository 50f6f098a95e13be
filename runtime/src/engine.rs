//! # PlaybackEngine: Timed Reveal of a Single Trace
//!
//! The engine walks an immutable [`Trace`] one step at a time: `run` starts
//! a scheduled reveal chain, `pause` stops it, `step` advances exactly one
//! index synchronously, `reset` returns to the initial state. Consumers
//! observe progress through accessors and subscribed [`EngineEvent`]s.
//!
//! "Runners record, the engine reveals."
//!
//! Every scheduled tick captures the engine **generation**; `pause`,
//! `step`, `reset`, and trace replacement bump it, so a tick that slips past
//! its cancellation is a guaranteed no-op rather than an out-of-order
//! reveal.

use crate::scheduler::{CancelHandle, Scheduler};
use crate::speed::{Speed, SpeedProfile};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use zoetrope_core::{Step, StepPayload, Trace};

/// The playback state machine's states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionState {
    /// Nothing revealed yet (or reset).
    #[default]
    Idle,
    /// A reveal chain is scheduled.
    Running,
    /// Stopped mid-trace; position and logs preserved.
    Paused,
    /// The whole trace has been revealed.
    Completed,
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Notification delivered to subscribed observers after the engine's own
/// state settles. Observers read details back through the engine accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The step at `index` became the current step.
    StepRevealed { index: usize },
    /// The state machine moved.
    StateChanged { state: ExecutionState },
    /// A new trace was installed (and the engine implicitly reset).
    TraceReplaced,
}

type Listener = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// Timed playback over one trace. Cheap to clone; clones share the engine.
pub struct PlaybackEngine<P: StepPayload> {
    inner: Arc<Inner<P>>,
}

impl<P: StepPayload> Clone for PlaybackEngine<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<P: StepPayload> {
    scheduler: Arc<dyn Scheduler>,
    profile: SpeedProfile,
    core: Mutex<Core<P>>,
    listeners: Mutex<Vec<Listener>>,
}

struct Core<P> {
    trace: Arc<Trace<P>>,
    cursor: Option<usize>,
    execution: ExecutionState,
    speed: Speed,
    logs: Vec<String>,
    generation: u64,
    pending: Option<CancelHandle>,
}

impl<P: StepPayload> PlaybackEngine<P> {
    /// Engine over `trace` with the default playback pacing.
    pub fn new(trace: Trace<P>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_profile(trace, scheduler, SpeedProfile::playback())
    }

    /// Engine over `trace` with an explicit speed profile.
    pub fn with_profile(
        trace: Trace<P>,
        scheduler: Arc<dyn Scheduler>,
        profile: SpeedProfile,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                scheduler,
                profile,
                core: Mutex::new(Core {
                    trace: Arc::new(trace),
                    cursor: None,
                    execution: ExecutionState::Idle,
                    speed: Speed::Normal,
                    logs: Vec::new(),
                    generation: 0,
                    pending: None,
                }),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Start (or resume) the scheduled reveal chain.
    ///
    /// From a fresh engine the first step is revealed synchronously; every
    /// later reveal waits out its delay. No-op on an empty trace and while
    /// already running or completed.
    pub fn run(&self) {
        let events = {
            let mut core = self.inner.core.lock();
            if core.trace.is_empty()
                || matches!(
                    core.execution,
                    ExecutionState::Running | ExecutionState::Completed
                )
            {
                return;
            }
            let mut events = Vec::new();
            self.inner
                .set_state(&mut core, ExecutionState::Running, &mut events);
            if core.cursor.is_none() {
                self.inner.reveal(&mut core, 0, &mut events);
                if core.trace.len() == 1 {
                    self.inner
                        .set_state(&mut core, ExecutionState::Completed, &mut events);
                }
            }
            if core.execution == ExecutionState::Running {
                Inner::schedule_next(&self.inner, &mut core);
            }
            events
        };
        self.inner.notify(&events);
    }

    /// Stop the reveal chain, keeping position and logs.
    ///
    /// The pending tick is cancelled and the generation bumped, so nothing
    /// already scheduled can fire afterwards. No-op unless running.
    pub fn pause(&self) {
        let events = {
            let mut core = self.inner.core.lock();
            if core.execution != ExecutionState::Running {
                return;
            }
            core.invalidate();
            let mut events = Vec::new();
            self.inner
                .set_state(&mut core, ExecutionState::Paused, &mut events);
            tracing::debug!(cursor = ?core.cursor, "playback paused");
            events
        };
        self.inner.notify(&events);
    }

    /// Reveal exactly the next step, synchronously, and stop.
    ///
    /// Always leaves the engine paused - single-stepping never keeps a
    /// timer armed. A `step` with nothing left to advance transitions to
    /// completed. No-op on an empty trace.
    pub fn step(&self) {
        let events = {
            let mut core = self.inner.core.lock();
            if core.trace.is_empty() {
                return;
            }
            core.invalidate();
            let mut events = Vec::new();
            let next = core.cursor.map_or(0, |i| i + 1);
            if next < core.trace.len() {
                self.inner.reveal(&mut core, next, &mut events);
                self.inner
                    .set_state(&mut core, ExecutionState::Paused, &mut events);
            } else {
                self.inner
                    .set_state(&mut core, ExecutionState::Completed, &mut events);
            }
            events
        };
        self.inner.notify(&events);
    }

    /// Return to idle: no current step, empty logs, no pending timer. The
    /// trace is kept; `run` may be called again immediately. Idempotent
    /// from every state.
    pub fn reset(&self) {
        let events = {
            let mut core = self.inner.core.lock();
            core.invalidate();
            core.cursor = None;
            core.logs.clear();
            let mut events = Vec::new();
            self.inner
                .set_state(&mut core, ExecutionState::Idle, &mut events);
            tracing::debug!("playback reset");
            events
        };
        self.inner.notify(&events);
    }

    /// Install a new trace. Forces an implicit [`reset`](Self::reset): a
    /// stale cursor into a different trace is a correctness bug, not an
    /// edge case to tolerate.
    pub fn replace_trace(&self, trace: Trace<P>) {
        let events = {
            let mut core = self.inner.core.lock();
            core.invalidate();
            core.trace = Arc::new(trace);
            core.cursor = None;
            core.logs.clear();
            let mut events = vec![EngineEvent::TraceReplaced];
            self.inner
                .set_state(&mut core, ExecutionState::Idle, &mut events);
            tracing::debug!(steps = core.trace.len(), "trace replaced");
            events
        };
        self.inner.notify(&events);
    }

    /// Select pacing for subsequent scheduled reveals. An already-armed
    /// tick keeps the delay it was scheduled with.
    pub fn set_speed(&self, speed: Speed) {
        self.inner.core.lock().speed = speed;
    }

    pub fn speed(&self) -> Speed {
        self.inner.core.lock().speed
    }

    pub fn execution_state(&self) -> ExecutionState {
        self.inner.core.lock().execution
    }

    /// Index of the current step; `None` before anything is revealed.
    pub fn cursor(&self) -> Option<usize> {
        self.inner.core.lock().cursor
    }

    /// The current step, if any.
    pub fn current_step(&self) -> Option<Step<P>> {
        let core = self.inner.core.lock();
        core.cursor
            .and_then(|i| core.trace.get(i))
            .cloned()
    }

    /// The trace under playback.
    pub fn trace(&self) -> Arc<Trace<P>> {
        Arc::clone(&self.inner.core.lock().trace)
    }

    /// Narration lines of the steps revealed so far (steps without a
    /// description contribute nothing).
    pub fn logs(&self) -> Vec<String> {
        self.inner.core.lock().logs.clone()
    }

    /// Percentage of the trace revealed: `(revealed / len) * 100`, `0.0`
    /// for an empty trace.
    pub fn progress(&self) -> f64 {
        let core = self.inner.core.lock();
        if core.trace.is_empty() {
            return 0.0;
        }
        let revealed = core.cursor.map_or(0, |i| i + 1);
        (revealed as f64 / core.trace.len() as f64) * 100.0
    }

    /// Register an observer. Listeners are invoked after the engine's lock
    /// is released and may call back into the engine.
    pub fn subscribe(&self, listener: impl Fn(&EngineEvent) + Send + Sync + 'static) {
        self.inner.listeners.lock().push(Arc::new(listener));
    }
}

impl<P: StepPayload> Inner<P> {
    fn reveal(&self, core: &mut Core<P>, index: usize, events: &mut Vec<EngineEvent>) {
        core.cursor = Some(index);
        if let Some(step) = core.trace.get(index) {
            if let Some(description) = &step.description {
                core.logs.push(description.clone());
            }
            tracing::debug!(index, kind = step.kind(), "step revealed");
        }
        events.push(EngineEvent::StepRevealed { index });
    }

    fn set_state(
        &self,
        core: &mut Core<P>,
        state: ExecutionState,
        events: &mut Vec<EngineEvent>,
    ) {
        if core.execution != state {
            core.execution = state;
            if state == ExecutionState::Completed {
                core.invalidate();
                tracing::info!(steps = core.trace.len(), "playback completed");
            }
            events.push(EngineEvent::StateChanged { state });
        }
    }

    /// Delay before the next reveal: the current step's override, else the
    /// profile's delay for the selected speed.
    fn next_delay(&self, core: &Core<P>) -> Duration {
        core.cursor
            .and_then(|i| core.trace.get(i))
            .and_then(|step| step.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.profile.delay(core.speed))
    }

    fn schedule_next(inner: &Arc<Self>, core: &mut Core<P>) {
        let generation = core.generation;
        let weak = Arc::downgrade(inner);
        let delay = inner.next_delay(core);
        let handle = inner.scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Inner::tick(&inner, generation);
                }
            }),
        );
        core.pending = Some(handle);
    }

    fn tick(inner: &Arc<Self>, generation: u64) {
        let events = {
            let mut core = inner.core.lock();
            // Stale tick: cancelled-but-fired or from a previous trace.
            if core.generation != generation || core.execution != ExecutionState::Running {
                return;
            }
            core.pending = None;
            let mut events = Vec::new();
            let next = core.cursor.map_or(0, |i| i + 1);
            if next >= core.trace.len() {
                inner.set_state(&mut core, ExecutionState::Completed, &mut events);
            } else {
                inner.reveal(&mut core, next, &mut events);
                if next + 1 == core.trace.len() {
                    inner.set_state(&mut core, ExecutionState::Completed, &mut events);
                } else {
                    Inner::schedule_next(inner, &mut core);
                }
            }
            events
        };
        inner.notify(&events);
    }

    fn notify(&self, events: &[EngineEvent]) {
        if events.is_empty() {
            return;
        }
        let listeners: Vec<Listener> = self.listeners.lock().clone();
        for listener in &listeners {
            for event in events {
                listener(event);
            }
        }
    }
}

impl<P> Core<P> {
    /// Cancel the pending tick and bump the generation so any firing that
    /// raced the cancellation becomes a no-op.
    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use serde::{Deserialize, Serialize};
    use zoetrope_core::TraceBuilder;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "kebab-case")]
    enum ReelPayload {
        Init { frame: usize },
        Advance { frame: usize },
        Complete { frame: usize },
    }

    impl StepPayload for ReelPayload {
        fn kind(&self) -> &'static str {
            match self {
                Self::Init { .. } => "init",
                Self::Advance { .. } => "advance",
                Self::Complete { .. } => "complete",
            }
        }
    }

    fn reel(len: usize) -> Trace<ReelPayload> {
        assert!(len >= 2);
        let mut builder = TraceBuilder::new();
        builder.push(Step::new(ReelPayload::Init { frame: 0 }).with_description("frame 0"));
        for frame in 1..len - 1 {
            builder.push(
                Step::new(ReelPayload::Advance { frame })
                    .with_description(format!("frame {frame}")),
            );
        }
        builder.push(
            Step::new(ReelPayload::Complete { frame: len - 1 })
                .with_description(format!("frame {}", len - 1)),
        );
        builder.finish()
    }

    fn engine_of(len: usize) -> (PlaybackEngine<ReelPayload>, Arc<ManualScheduler>) {
        let scheduler = Arc::new(ManualScheduler::new());
        let engine = PlaybackEngine::new(reel(len), scheduler.clone());
        (engine, scheduler)
    }

    const NORMAL: Duration = Duration::from_millis(800);

    #[test]
    fn test_run_reveals_first_step_synchronously() {
        let (engine, _scheduler) = engine_of(4);
        assert_eq!(engine.cursor(), None);
        engine.run();
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(engine.execution_state(), ExecutionState::Running);
    }

    #[test]
    fn test_run_advances_monotonically_until_completed() {
        let (engine, scheduler) = engine_of(4);
        engine.run();
        for expected in 1..4 {
            scheduler.advance(NORMAL);
            assert_eq!(engine.cursor(), Some(expected));
        }
        assert_eq!(engine.execution_state(), ExecutionState::Completed);
        assert_eq!(engine.progress(), 100.0);
        // No timer left armed after completion.
        scheduler.advance(NORMAL);
        assert_eq!(engine.cursor(), Some(3));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_pause_cancels_pending_reveal() {
        let (engine, scheduler) = engine_of(5);
        engine.run();
        engine.pause();
        assert_eq!(engine.execution_state(), ExecutionState::Paused);

        scheduler.advance(Duration::from_secs(60));
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_resume_continues_from_next_index() {
        let (engine, scheduler) = engine_of(5);
        engine.run();
        scheduler.advance(NORMAL);
        engine.pause();
        assert_eq!(engine.cursor(), Some(1));

        engine.run();
        // Resume schedules; it does not reveal synchronously.
        assert_eq!(engine.cursor(), Some(1));
        scheduler.advance(NORMAL);
        assert_eq!(engine.cursor(), Some(2));
    }

    #[test]
    fn test_step_walks_to_completion() {
        let (engine, scheduler) = engine_of(3);
        engine.step();
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(engine.execution_state(), ExecutionState::Paused);
        engine.step();
        engine.step();
        // The final step was just revealed; still paused.
        assert_eq!(engine.cursor(), Some(2));
        assert_eq!(engine.execution_state(), ExecutionState::Paused);
        // Nothing left to advance: completed.
        engine.step();
        assert_eq!(engine.cursor(), Some(2));
        assert_eq!(engine.execution_state(), ExecutionState::Completed);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_step_during_run_cancels_timer() {
        let (engine, scheduler) = engine_of(5);
        engine.run();
        engine.step();
        assert_eq!(engine.cursor(), Some(1));
        assert_eq!(engine.execution_state(), ExecutionState::Paused);
        scheduler.advance(Duration::from_secs(60));
        assert_eq!(engine.cursor(), Some(1));
    }

    #[test]
    fn test_reset_is_idempotent_from_any_state() {
        let (engine, scheduler) = engine_of(4);
        engine.run();
        scheduler.advance(NORMAL);
        for _ in 0..3 {
            engine.reset();
            assert_eq!(engine.cursor(), None);
            assert_eq!(engine.execution_state(), ExecutionState::Idle);
            assert!(engine.logs().is_empty());
        }
        // The trace survives a reset.
        engine.run();
        assert_eq!(engine.cursor(), Some(0));
    }

    #[test]
    fn test_empty_trace_is_inert() {
        let scheduler = Arc::new(ManualScheduler::new());
        let trace: Trace<ReelPayload> = TraceBuilder::new().finish();
        let engine = PlaybackEngine::new(trace, scheduler.clone());

        engine.run();
        engine.step();
        engine.pause();
        assert_eq!(engine.execution_state(), ExecutionState::Idle);
        assert_eq!(engine.cursor(), None);
        assert_eq!(engine.progress(), 0.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_per_step_delay_overrides_speed() {
        let scheduler = Arc::new(ManualScheduler::new());
        let mut builder = TraceBuilder::new();
        builder.push(
            Step::new(ReelPayload::Init { frame: 0 })
                .with_description("frame 0")
                .with_delay_ms(50),
        );
        builder.push(Step::new(ReelPayload::Advance { frame: 1 }));
        builder.push(Step::new(ReelPayload::Complete { frame: 2 }));
        let engine = PlaybackEngine::new(builder.finish(), scheduler.clone());

        engine.run();
        scheduler.advance(Duration::from_millis(49));
        assert_eq!(engine.cursor(), Some(0));
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(engine.cursor(), Some(1));
        // Step 1 has no override; back to the profile delay.
        scheduler.advance(Duration::from_millis(50));
        assert_eq!(engine.cursor(), Some(1));
        scheduler.advance(NORMAL);
        assert_eq!(engine.cursor(), Some(2));
    }

    #[test]
    fn test_set_speed_applies_to_next_schedule() {
        let (engine, scheduler) = engine_of(4);
        engine.set_speed(Speed::Fast);
        engine.run();
        scheduler.advance(Duration::from_millis(300));
        assert_eq!(engine.cursor(), Some(1));
    }

    #[test]
    fn test_logs_collect_descriptions_in_order() {
        let (engine, scheduler) = engine_of(3);
        engine.run();
        scheduler.advance(NORMAL);
        scheduler.advance(NORMAL);
        assert_eq!(engine.logs(), vec!["frame 0", "frame 1", "frame 2"]);
    }

    #[test]
    fn test_replace_trace_forces_reset() {
        let (engine, scheduler) = engine_of(6);
        engine.run();
        scheduler.advance(NORMAL);
        assert_eq!(engine.cursor(), Some(1));

        engine.replace_trace(reel(2));
        assert_eq!(engine.cursor(), None);
        assert_eq!(engine.execution_state(), ExecutionState::Idle);
        assert!(engine.logs().is_empty());
        // The old chain cannot touch the new trace.
        scheduler.advance(Duration::from_secs(60));
        assert_eq!(engine.cursor(), None);
        assert_eq!(engine.trace().len(), 2);
    }

    #[test]
    fn test_subscribers_observe_reveals_and_state() {
        let (engine, scheduler) = engine_of(3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.subscribe(move |event| sink.lock().push(*event));

        engine.run();
        scheduler.advance(NORMAL);
        scheduler.advance(NORMAL);

        let events = seen.lock().clone();
        assert_eq!(
            events,
            vec![
                EngineEvent::StateChanged {
                    state: ExecutionState::Running
                },
                EngineEvent::StepRevealed { index: 0 },
                EngineEvent::StepRevealed { index: 1 },
                EngineEvent::StepRevealed { index: 2 },
                EngineEvent::StateChanged {
                    state: ExecutionState::Completed
                },
            ]
        );
    }

    #[test]
    fn test_progress_tracks_reveals() {
        let (engine, scheduler) = engine_of(4);
        assert_eq!(engine.progress(), 0.0);
        engine.run();
        assert_eq!(engine.progress(), 25.0);
        scheduler.advance(NORMAL);
        assert_eq!(engine.progress(), 50.0);
    }
}
