//! Zoetrope facade crate.
//!
//! Re-exports the core step model, the playback runtime, and the standard
//! runner library behind a single entry point with one prelude.

pub use zoetrope_core as core;
pub use zoetrope_runtime as runtime;
pub use zoetrope_std as runners;

pub use zoetrope_core::{Runner, Step, StepPayload, Trace, TraceBuilder};
pub use zoetrope_runtime::{BattleEngine, PlaybackEngine};

pub mod prelude {
    pub use zoetrope_core::prelude::*;
    pub use zoetrope_runtime::prelude::*;
    pub use zoetrope_std::prelude::*;
}
