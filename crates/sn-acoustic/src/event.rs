//! Acoustic events.

use std::fmt;

use sn_core::{AgentId, Vec2};

/// What made the noise.  Receivers weight importance by kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundKind {
    #[default]
    Footstep,
    Gunshot,
    Ambient,
    Impact,
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SoundKind::Footstep => "footstep",
            SoundKind::Gunshot => "gunshot",
            SoundKind::Ambient => "ambient",
            SoundKind::Impact => "impact",
        };
        f.write_str(s)
    }
}

/// One emitted sound.  Consumed synchronously by the propagator, never stored.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundEvent {
    pub source: Vec2,
    pub base_volume: f32,
    pub kind: SoundKind,
    /// Spectral tilt in `[0, 1]`: 0 = bass, 1 = treble.
    pub frequency: f32,
    /// `false` for reflected or muffled sound.
    pub direct: bool,
    /// The agent that made the sound, if any.  It does not hear itself.
    pub emitter: Option<AgentId>,
}

impl SoundEvent {
    /// A direct, mid-frequency sound with no emitting agent.
    pub fn new(source: Vec2, base_volume: f32, kind: SoundKind) -> Self {
        Self {
            source,
            base_volume: base_volume.max(0.0),
            kind,
            frequency: 0.5,
            direct: true,
            emitter: None,
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency.clamp(0.0, 1.0);
        self
    }

    /// Mark the sound as reflected rather than direct.
    pub fn muffled(mut self) -> Self {
        self.direct = false;
        self
    }

    pub fn from_agent(mut self, emitter: AgentId) -> Self {
        self.emitter = Some(emitter);
        self
    }
}
