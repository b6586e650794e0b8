//! Turning a delivered sound into something worth investigating.

use sn_acoustic::{SoundEvent, SoundKind};
use sn_memory::{AgentMemory, HeardSound};
use tracing::debug;

use crate::AgentConfig;

/// Speed multiplier while walking toward a muffled sound.
pub const MUFFLED_SPEED_FACTOR: f32 = 0.7;

/// The listener side of the acoustic model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HearingReaction {
    pub can_hear: bool,
    pub threshold: f32,
}

impl Default for HearingReaction {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

impl HearingReaction {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self { can_hear: config.can_hear, threshold: config.hearing_threshold }
    }

    /// How much more a kind of sound matters than its raw volume.
    pub fn kind_weight(kind: SoundKind) -> f32 {
        match kind {
            SoundKind::Footstep => 1.5,
            SoundKind::Gunshot => 1.2,
            SoundKind::Ambient | SoundKind::Impact => 1.0,
        }
    }

    pub fn importance(event: &SoundEvent, volume: f32) -> f32 {
        volume * Self::kind_weight(event.kind)
    }

    /// Record `event` in `memory.heard` if it is important enough.
    /// Returns `true` if the guard reacted.
    pub fn react(&self, event: &SoundEvent, volume: f32, memory: &mut AgentMemory) -> bool {
        if !self.can_hear {
            return false;
        }
        let importance = Self::importance(event, volume);
        if importance <= self.threshold {
            return false;
        }
        debug!(kind = %event.kind, volume, importance, source = %event.source, "sound worth investigating");
        memory.heard = Some(HeardSound {
            position: event.source,
            kind: event.kind,
            volume,
            frequency: event.frequency,
            direct: event.direct,
            speed_factor: if event.direct { 1.0 } else { MUFFLED_SPEED_FACTOR },
        });
        true
    }
}
