//! Zoetrope Runtime - Playback Engines
//!
//! The runtime reveals a recorded [`Trace`](zoetrope_core::Trace)
//! incrementally, under timing, pause/resume, and single-step control.
//!
//! ## Design Philosophy
//!
//! * **Runners record, engines reveal**: no algorithm executes here; the
//!   trace is fully materialized before playback starts
//! * **Injected clock**: engines never touch wall-clock timers directly -
//!   they go through a [`Scheduler`], so cancellation is testable against a
//!   virtual clock
//! * **Guaranteed cancellation**: every scheduled tick carries the engine
//!   generation; a stray firing after pause/reset is a no-op, not a race

pub mod battle;
pub mod engine;
pub mod scheduler;
pub mod speed;

pub use battle::{BattleEngine, BattleEvent, Winner};
pub use engine::{EngineEvent, ExecutionState, PlaybackEngine};
pub use scheduler::{CancelHandle, ManualScheduler, Scheduler, TickFn, TokioScheduler};
pub use speed::{Speed, SpeedProfile};

pub mod prelude {
    pub use crate::battle::{BattleEngine, BattleEvent, Winner};
    pub use crate::engine::{EngineEvent, ExecutionState, PlaybackEngine};
    pub use crate::scheduler::{ManualScheduler, Scheduler, TokioScheduler};
    pub use crate::speed::{Speed, SpeedProfile};
}
