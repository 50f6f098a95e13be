use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback pacing selected by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

/// Maps each [`Speed`] to a delay between scheduled reveals.
///
/// Profiles are plain configuration: engines take one at construction, and a
/// step's `delay_ms` overrides the resolved delay for the following reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedProfile {
    pub slow: Duration,
    pub normal: Duration,
    pub fast: Duration,
}

impl SpeedProfile {
    pub const fn new(slow: Duration, normal: Duration, fast: Duration) -> Self {
        Self { slow, normal, fast }
    }

    /// Pacing for single-trace playback: 1500 / 800 / 300 ms.
    pub const fn playback() -> Self {
        Self::new(
            Duration::from_millis(1500),
            Duration::from_millis(800),
            Duration::from_millis(300),
        )
    }

    /// Pacing for battle mode, where two traces race on one clock and ticks
    /// come much faster: 200 / 100 / 30 ms.
    pub const fn battle() -> Self {
        Self::new(
            Duration::from_millis(200),
            Duration::from_millis(100),
            Duration::from_millis(30),
        )
    }

    /// The delay this profile assigns to `speed`.
    pub const fn delay(&self, speed: Speed) -> Duration {
        match speed {
            Speed::Slow => self.slow,
            Speed::Normal => self.normal,
            Speed::Fast => self.fast,
        }
    }
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self::playback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_ordering() {
        let profile = SpeedProfile::default();
        assert!(profile.delay(Speed::Slow) > profile.delay(Speed::Normal));
        assert!(profile.delay(Speed::Normal) > profile.delay(Speed::Fast));
        assert_eq!(profile.delay(Speed::Normal), Duration::from_millis(800));
    }

    #[test]
    fn test_battle_profile_is_faster() {
        let battle = SpeedProfile::battle();
        let playback = SpeedProfile::playback();
        assert!(battle.delay(Speed::Slow) < playback.delay(Speed::Fast));
    }

    #[test]
    fn test_speed_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Speed::Fast).unwrap(), "\"fast\"");
    }
}
