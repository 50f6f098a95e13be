//! Zoetrope Core - Step-Trace Model
//!
//! This crate defines the **data** side of Zoetrope:
//! - `Step` / `StepPayload`: one tagged, fully-snapshotted instant of execution
//! - `Trace` / `TraceBuilder`: the immutable, replayable step sequence
//! - `Runner`: the contract that turns an algorithm + input into a trace
//!
//! **IMPORTANT**: This layer is Pure Rust - no timers, no IO, no Async.
//! Playback lives in `zoetrope-runtime`; runner implementations live in
//! `zoetrope-std`.

pub mod runner;
pub mod step;
pub mod trace;
pub mod validate;

pub use runner::Runner;
pub use step::{Step, StepPayload};
pub use trace::{Trace, TraceBuilder};
pub use validate::{InputError, Validation, ensure};

pub mod prelude {
    pub use crate::runner::Runner;
    pub use crate::step::{Step, StepPayload};
    pub use crate::trace::{Trace, TraceBuilder};
    pub use crate::validate::{InputError, Validation, ensure};
}
