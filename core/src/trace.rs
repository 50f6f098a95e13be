use crate::step::{Step, StepPayload};
use serde::{Deserialize, Serialize};

/// The full ordered step sequence a runner produced for one input.
///
/// A `Trace` is immutable once built: there are no public mutators, and the
/// playback engines only ever read it. Construction goes through
/// [`TraceBuilder`], whose `push` is the single append-step effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace<P> {
    steps: Vec<Step<P>>,
}

impl<P: StepPayload> Trace<P> {
    /// Number of steps in the trace.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the trace holds no steps at all.
    ///
    /// Runners never produce this for valid input; the playback engines
    /// treat it as "every operation is a no-op".
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Step<P>> {
        self.steps.get(index)
    }

    /// The opening step.
    pub fn first(&self) -> Option<&Step<P>> {
        self.steps.first()
    }

    /// The closing step.
    pub fn last(&self) -> Option<&Step<P>> {
        self.steps.last()
    }

    /// Iterate over the steps in replay order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step<P>> {
        self.steps.iter()
    }

    /// The discriminator tags in replay order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(Step::kind)
    }

    /// Whether the trace satisfies the replay shape every runner guarantees:
    /// at least two steps, opening with an `init` payload and closing with a
    /// `complete` payload.
    pub fn is_well_formed(&self) -> bool {
        self.steps.len() >= 2
            && self.steps.first().is_some_and(|s| s.payload.is_initial())
            && self.steps.last().is_some_and(|s| s.payload.is_terminal())
    }
}

impl<'a, P: StepPayload> IntoIterator for &'a Trace<P> {
    type Item = &'a Step<P>;
    type IntoIter = std::slice::Iter<'a, Step<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Accumulates steps while a runner executes, then seals them into a
/// [`Trace`].
///
/// Runners thread a `&mut TraceBuilder` through their recursion instead of
/// closing over a shared mutable array, so recording is an explicit effect.
#[derive(Debug, Default)]
pub struct TraceBuilder<P> {
    steps: Vec<Step<P>>,
}

impl<P: StepPayload> TraceBuilder<P> {
    /// Start an empty trace.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Record one step.
    pub fn push(&mut self, step: Step<P>) {
        self.steps.push(step);
    }

    /// Number of steps recorded so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Seal the recorded steps into an immutable [`Trace`].
    pub fn finish(self) -> Trace<P> {
        Trace { steps: self.steps }
    }
}
