use crate::step::StepPayload;
use crate::trace::Trace;
use crate::validate::Validation;

/// The contract for a trace generator.
///
/// A `Runner` turns an algorithm + input into a [`Trace`]: instead of merely
/// computing a result, it records every observable decision point - each
/// comparison, swap, visit, placement, backtrack, relaxation, table write -
/// as its own step, fully snapshotted.
///
/// Runners are stateless: one value constructed at module load serves any
/// number of inputs. `generate` is a pure function - same input, identical
/// trace; no IO, no randomness. Randomness for "randomize" features happens
/// at input-construction time, outside the runner, so traces stay
/// deterministic and testable.
pub trait Runner: Send + Sync {
    /// The plain structured input this runner consumes.
    type Input: Clone + Send + Sync;

    /// The family's tagged payload vocabulary.
    type Payload: StepPayload;

    /// The canonical default input, shown before a user edits anything.
    /// Deterministic.
    fn initial_input(&self) -> Self::Input;

    /// Check an input before tracing. Invalid input is a normal outcome, not
    /// an exceptional one; this never panics for expected bad input.
    ///
    /// Callers run this before [`generate`](Runner::generate). `generate`
    /// itself is still expected not to crash on malformed input it can
    /// detect - it tolerates, clamps, or produces a degenerate trace.
    fn validate(&self, _input: &Self::Input) -> Validation {
        Ok(())
    }

    /// Produce the entire trace for one input, eagerly, before any playback.
    fn generate(&self, input: &Self::Input) -> Trace<Self::Payload>;
}
