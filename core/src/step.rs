use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// The tagged snapshot carried by a [`Step`].
///
/// Each algorithm family defines one payload enum with a variant per `kind`.
/// The serde tag (`#[serde(tag = "kind")]`) is the wire-visible discriminator
/// a renderer selects its highlight rule by; `kind()` must return the same
/// string the tag serializes to.
///
/// Payload variants hold **full snapshots**, not deltas: every collection a
/// renderer could need is cloned into the variant at record time, so a trace
/// never shares mutable state with the algorithm that produced it.
pub trait StepPayload:
    Clone + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// The discriminator tag for this payload, e.g. `"compare"` or `"swap"`.
    fn kind(&self) -> &'static str;

    /// Whether this payload opens a trace.
    fn is_initial(&self) -> bool {
        self.kind() == "init"
    }

    /// Whether this payload closes a trace.
    fn is_terminal(&self) -> bool {
        self.kind() == "complete"
    }
}

/// One immutable instant of an algorithm's execution.
///
/// A `Step` is the unit of replay: the playback engine reveals steps one at a
/// time, and pause/resume/single-step all operate at step granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<P> {
    /// The tagged snapshot for this instant.
    #[serde(flatten)]
    pub payload: P,

    /// Index into an accompanying source listing, for synchronized
    /// highlighting. Cosmetic; never load-bearing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_line: Option<u32>,

    /// Human-readable narration of the event, appended to the playback log
    /// when the step is revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Per-step override of the playback delay. Governs the gap between this
    /// step and the next scheduled reveal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

impl<P: StepPayload> Step<P> {
    /// Wrap a payload with no annotations.
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            code_line: None,
            description: None,
            delay_ms: None,
        }
    }

    /// Attach narration text.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Attach a source-listing line index.
    pub fn at_line(mut self, line: u32) -> Self {
        self.code_line = Some(line);
        self
    }

    /// Override the playback delay after this step.
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    /// The payload's discriminator tag.
    pub fn kind(&self) -> &'static str {
        self.payload.kind()
    }
}
