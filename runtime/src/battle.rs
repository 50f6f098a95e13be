//! # BattleEngine: Two Traces Racing on One Clock
//!
//! Battle mode pits two independently recorded traces against each other.
//! Every shared tick advances each side that still has unrevealed steps by
//! exactly one index; a side that reaches its end holds while the other
//! finishes. When both sides are exhausted the engine completes and names a
//! winner.
//!
//! The winner rule is deliberately simple: **fewer total steps wins**,
//! equal lengths tie. Under 1:1 pacing the shorter trace visibly finishes
//! first; this is a proxy for efficiency, not an operation-count cost
//! model, and it is preserved as documented behavior.

use crate::engine::ExecutionState;
use crate::scheduler::{CancelHandle, Scheduler};
use crate::speed::{Speed, SpeedProfile};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use zoetrope_core::{Step, StepPayload, Trace};

/// Which side won a completed battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    Tie,
}

/// Notification delivered to battle observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleEvent {
    /// One shared tick advanced the cursors to these positions.
    Advanced {
        index_a: Option<usize>,
        index_b: Option<usize>,
    },
    /// The state machine moved.
    StateChanged { state: ExecutionState },
    /// Both sides exhausted; the winner is final.
    Finished { winner: Winner },
}

type Listener = Arc<dyn Fn(&BattleEvent) + Send + Sync>;

/// Lock-step playback of two traces, possibly from different algorithm
/// families. Cheap to clone; clones share the engine.
pub struct BattleEngine<A: StepPayload, B: StepPayload> {
    inner: Arc<Inner<A, B>>,
}

impl<A: StepPayload, B: StepPayload> Clone for BattleEngine<A, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<A: StepPayload, B: StepPayload> {
    scheduler: Arc<dyn Scheduler>,
    profile: SpeedProfile,
    core: Mutex<Core<A, B>>,
    listeners: Mutex<Vec<Listener>>,
}

struct Core<A, B> {
    trace_a: Arc<Trace<A>>,
    trace_b: Arc<Trace<B>>,
    cursor_a: Option<usize>,
    cursor_b: Option<usize>,
    execution: ExecutionState,
    speed: Speed,
    winner: Option<Winner>,
    generation: u64,
    pending: Option<CancelHandle>,
}

impl<A: StepPayload, B: StepPayload> BattleEngine<A, B> {
    /// Battle over two traces with the default battle pacing.
    pub fn new(trace_a: Trace<A>, trace_b: Trace<B>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_profile(trace_a, trace_b, scheduler, SpeedProfile::battle())
    }

    /// Battle with an explicit speed profile.
    pub fn with_profile(
        trace_a: Trace<A>,
        trace_b: Trace<B>,
        scheduler: Arc<dyn Scheduler>,
        profile: SpeedProfile,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                scheduler,
                profile,
                core: Mutex::new(Core {
                    trace_a: Arc::new(trace_a),
                    trace_b: Arc::new(trace_b),
                    cursor_a: None,
                    cursor_b: None,
                    execution: ExecutionState::Idle,
                    speed: Speed::Normal,
                    winner: None,
                    generation: 0,
                    pending: None,
                }),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Start (or resume) the shared tick. The first advance happens one
    /// delay from now; battle mode never reveals synchronously. No-op when
    /// both traces are empty, and while running or completed.
    pub fn run(&self) {
        let events = {
            let mut core = self.inner.core.lock();
            if (core.trace_a.is_empty() && core.trace_b.is_empty())
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
            Inner::schedule_next(&self.inner, &mut core);
            events
        };
        self.inner.notify(&events);
    }

    /// Stop the shared tick, preserving both cursors. No-op unless running.
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
            tracing::debug!(a = ?core.cursor_a, b = ?core.cursor_b, "battle paused");
            events
        };
        self.inner.notify(&events);
    }

    /// Advance both sides by one (each clamped to its own trace length) and
    /// stop. Stepping when both sides are already exhausted completes the
    /// battle and fixes the winner.
    pub fn step(&self) {
        let events = {
            let mut core = self.inner.core.lock();
            if core.trace_a.is_empty() && core.trace_b.is_empty() {
                return;
            }
            core.invalidate();
            let mut events = Vec::new();
            if core.exhausted() {
                self.inner.finish(&mut core, &mut events);
            } else {
                core.advance_both();
                events.push(BattleEvent::Advanced {
                    index_a: core.cursor_a,
                    index_b: core.cursor_b,
                });
                self.inner
                    .set_state(&mut core, ExecutionState::Paused, &mut events);
            }
            events
        };
        self.inner.notify(&events);
    }

    /// Return to idle: cursors cleared, winner cleared, no pending timer.
    /// Both traces are kept. Idempotent from every state.
    pub fn reset(&self) {
        let events = {
            let mut core = self.inner.core.lock();
            core.invalidate();
            core.cursor_a = None;
            core.cursor_b = None;
            core.winner = None;
            let mut events = Vec::new();
            self.inner
                .set_state(&mut core, ExecutionState::Idle, &mut events);
            tracing::debug!("battle reset");
            events
        };
        self.inner.notify(&events);
    }

    /// Install a new pair of traces, implicitly resetting.
    pub fn replace_traces(&self, trace_a: Trace<A>, trace_b: Trace<B>) {
        let events = {
            let mut core = self.inner.core.lock();
            core.invalidate();
            core.trace_a = Arc::new(trace_a);
            core.trace_b = Arc::new(trace_b);
            core.cursor_a = None;
            core.cursor_b = None;
            core.winner = None;
            let mut events = Vec::new();
            self.inner
                .set_state(&mut core, ExecutionState::Idle, &mut events);
            events
        };
        self.inner.notify(&events);
    }

    /// Select pacing for subsequent shared ticks.
    pub fn set_speed(&self, speed: Speed) {
        self.inner.core.lock().speed = speed;
    }

    pub fn execution_state(&self) -> ExecutionState {
        self.inner.core.lock().execution
    }

    /// The winner, once the battle has completed.
    pub fn winner(&self) -> Option<Winner> {
        self.inner.core.lock().winner
    }

    pub fn cursor_a(&self) -> Option<usize> {
        self.inner.core.lock().cursor_a
    }

    pub fn cursor_b(&self) -> Option<usize> {
        self.inner.core.lock().cursor_b
    }

    pub fn current_step_a(&self) -> Option<Step<A>> {
        let core = self.inner.core.lock();
        core.cursor_a.and_then(|i| core.trace_a.get(i)).cloned()
    }

    pub fn current_step_b(&self) -> Option<Step<B>> {
        let core = self.inner.core.lock();
        core.cursor_b.and_then(|i| core.trace_b.get(i)).cloned()
    }

    /// Side A's reveal percentage, independent of side B.
    pub fn progress_a(&self) -> f64 {
        let core = self.inner.core.lock();
        progress_of(core.cursor_a, core.trace_a.len())
    }

    /// Side B's reveal percentage, independent of side A.
    pub fn progress_b(&self) -> f64 {
        let core = self.inner.core.lock();
        progress_of(core.cursor_b, core.trace_b.len())
    }

    /// Register an observer. Listeners are invoked after the engine's lock
    /// is released and may call back into the engine.
    pub fn subscribe(&self, listener: impl Fn(&BattleEvent) + Send + Sync + 'static) {
        self.inner.listeners.lock().push(Arc::new(listener));
    }
}

fn progress_of(cursor: Option<usize>, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    let revealed = cursor.map_or(0, |i| i + 1);
    (revealed as f64 / len as f64) * 100.0
}

impl<A: StepPayload, B: StepPayload> Inner<A, B> {
    fn set_state(
        &self,
        core: &mut Core<A, B>,
        state: ExecutionState,
        events: &mut Vec<BattleEvent>,
    ) {
        if core.execution != state {
            core.execution = state;
            events.push(BattleEvent::StateChanged { state });
        }
    }

    /// Both sides exhausted: complete and fix the winner by trace length.
    fn finish(&self, core: &mut Core<A, B>, events: &mut Vec<BattleEvent>) {
        core.invalidate();
        self.set_state(core, ExecutionState::Completed, events);
        let winner = if core.trace_a.len() < core.trace_b.len() {
            Winner::A
        } else if core.trace_b.len() < core.trace_a.len() {
            Winner::B
        } else {
            Winner::Tie
        };
        core.winner = Some(winner);
        events.push(BattleEvent::Finished { winner });
        tracing::info!(
            steps_a = core.trace_a.len(),
            steps_b = core.trace_b.len(),
            ?winner,
            "battle completed"
        );
    }

    fn schedule_next(inner: &Arc<Self>, core: &mut Core<A, B>) {
        let generation = core.generation;
        let weak = Arc::downgrade(inner);
        let delay = inner.profile.delay(core.speed);
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
            if core.generation != generation || core.execution != ExecutionState::Running {
                return;
            }
            core.pending = None;
            let mut events = Vec::new();
            // Exhaustion is checked before advancing, so the tick after the
            // last advance performs completion.
            if core.exhausted() {
                inner.finish(&mut core, &mut events);
            } else {
                core.advance_both();
                events.push(BattleEvent::Advanced {
                    index_a: core.cursor_a,
                    index_b: core.cursor_b,
                });
                Inner::schedule_next(inner, &mut core);
            }
            events
        };
        inner.notify(&events);
    }

    fn notify(&self, events: &[BattleEvent]) {
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

impl<A, B> Core<A, B> {
    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}

impl<A: StepPayload, B: StepPayload> Core<A, B> {
    fn exhausted(&self) -> bool {
        !has_next(self.cursor_a, self.trace_a.len()) && !has_next(self.cursor_b, self.trace_b.len())
    }

    fn advance_both(&mut self) {
        if has_next(self.cursor_a, self.trace_a.len()) {
            self.cursor_a = Some(self.cursor_a.map_or(0, |i| i + 1));
        }
        if has_next(self.cursor_b, self.trace_b.len()) {
            self.cursor_b = Some(self.cursor_b.map_or(0, |i| i + 1));
        }
    }
}

fn has_next(cursor: Option<usize>, len: usize) -> bool {
    match cursor {
        None => len > 0,
        Some(i) => i + 1 < len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;
    use zoetrope_core::TraceBuilder;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "kebab-case")]
    enum LanePayload {
        Init,
        Advance { at: usize },
        Complete,
    }

    impl StepPayload for LanePayload {
        fn kind(&self) -> &'static str {
            match self {
                Self::Init => "init",
                Self::Advance { .. } => "advance",
                Self::Complete => "complete",
            }
        }
    }

    fn lane(len: usize) -> Trace<LanePayload> {
        let mut builder = TraceBuilder::new();
        builder.push(Step::new(LanePayload::Init));
        for at in 1..len - 1 {
            builder.push(Step::new(LanePayload::Advance { at }));
        }
        builder.push(Step::new(LanePayload::Complete));
        builder.finish()
    }

    const BATTLE_NORMAL: Duration = Duration::from_millis(100);

    fn battle_of(
        len_a: usize,
        len_b: usize,
    ) -> (BattleEngine<LanePayload, LanePayload>, Arc<ManualScheduler>) {
        let scheduler = Arc::new(ManualScheduler::new());
        let engine = BattleEngine::new(lane(len_a), lane(len_b), scheduler.clone());
        (engine, scheduler)
    }

    #[test]
    fn test_shorter_trace_wins() {
        let (engine, scheduler) = battle_of(10, 25);
        engine.run();
        // 25 ticks reveal all of B; one more performs the completion check.
        for _ in 0..26 {
            scheduler.advance(BATTLE_NORMAL);
        }
        assert_eq!(engine.execution_state(), ExecutionState::Completed);
        assert_eq!(engine.winner(), Some(Winner::A));
        assert_eq!(engine.cursor_a(), Some(9));
        assert_eq!(engine.cursor_b(), Some(24));
        assert_eq!(engine.progress_a(), 100.0);
        assert_eq!(engine.progress_b(), 100.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_equal_lengths_tie() {
        let (engine, scheduler) = battle_of(6, 6);
        engine.run();
        for _ in 0..7 {
            scheduler.advance(BATTLE_NORMAL);
        }
        assert_eq!(engine.winner(), Some(Winner::Tie));
    }

    #[test]
    fn test_exhausted_side_holds_while_other_runs() {
        let (engine, scheduler) = battle_of(3, 8);
        engine.run();
        for _ in 0..5 {
            scheduler.advance(BATTLE_NORMAL);
        }
        assert_eq!(engine.cursor_a(), Some(2));
        assert_eq!(engine.cursor_b(), Some(4));
        assert_eq!(engine.execution_state(), ExecutionState::Running);
    }

    #[test]
    fn test_pause_freezes_both_cursors() {
        let (engine, scheduler) = battle_of(5, 5);
        engine.run();
        scheduler.advance(BATTLE_NORMAL);
        engine.pause();
        assert_eq!(engine.execution_state(), ExecutionState::Paused);

        scheduler.advance(Duration::from_secs(60));
        assert_eq!(engine.cursor_a(), Some(0));
        assert_eq!(engine.cursor_b(), Some(0));
    }

    #[test]
    fn test_manual_step_clamps_independently() {
        let (engine, _scheduler) = battle_of(2, 4);
        for _ in 0..3 {
            engine.step();
        }
        assert_eq!(engine.cursor_a(), Some(1));
        assert_eq!(engine.cursor_b(), Some(2));
        assert_eq!(engine.execution_state(), ExecutionState::Paused);

        engine.step();
        assert_eq!(engine.cursor_b(), Some(3));
        assert_eq!(engine.execution_state(), ExecutionState::Paused);
        // Both exhausted: the next step finishes the battle.
        engine.step();
        assert_eq!(engine.execution_state(), ExecutionState::Completed);
        assert_eq!(engine.winner(), Some(Winner::A));
    }

    #[test]
    fn test_reset_clears_winner_and_cursors() {
        let (engine, scheduler) = battle_of(2, 2);
        engine.run();
        for _ in 0..3 {
            scheduler.advance(BATTLE_NORMAL);
        }
        assert_eq!(engine.winner(), Some(Winner::Tie));

        engine.reset();
        assert_eq!(engine.cursor_a(), None);
        assert_eq!(engine.cursor_b(), None);
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.execution_state(), ExecutionState::Idle);
    }

    #[test]
    fn test_subscribers_observe_finish() {
        let (engine, scheduler) = battle_of(2, 3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.subscribe(move |event| sink.lock().push(*event));

        engine.run();
        for _ in 0..4 {
            scheduler.advance(BATTLE_NORMAL);
        }
        let events = seen.lock().clone();
        assert!(events.contains(&BattleEvent::Finished { winner: Winner::A }));
        assert_eq!(
            events.last(),
            Some(&BattleEvent::Finished { winner: Winner::A })
        );
    }
}
