//! Distance and occlusion attenuation of sound events.
//!
//! # Model
//!
//! ```text
//! max_range       = base_volume · range_multiplier
//! effective_range = max_range                                   (clear line)
//!                 = d_wall + (max_range − d_wall) · concreteness (wall at d_wall)
//! volume          = base_volume · (1 − distance / effective_range)
//! ```
//!
//! `concreteness = 0` stops sound at the wall; `1` makes walls transparent.

use sn_core::{AgentId, LayerMask, Occlusion, Vec2};
use tracing::trace;

use crate::{ListenerRegistry, SoundEvent};

/// Callback side of propagation, implemented by whatever owns the listeners.
pub trait HearingReceiver {
    /// World position of a registered listener, or `None` if it no longer
    /// exists (it is then skipped).
    fn listener_position(&self, listener: AgentId) -> Option<Vec2>;

    /// Deliver `event` to `listener` at the attenuated `volume`.
    fn on_hear(&mut self, listener: AgentId, event: &SoundEvent, volume: f32);
}

/// Tunables.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropagatorConfig {
    /// Maximum range per unit of base volume.  Default: 2.0.
    pub range_multiplier: f32,
    /// How much of the range survives a wall, in `[0, 1]`.  Default: 0.5.
    pub wall_concreteness: f32,
    /// Layers that attenuate sound.  Default: walls.
    pub occluders: LayerMask,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            range_multiplier: 2.0,
            wall_concreteness: 0.5,
            occluders: LayerMask::WALLS,
        }
    }
}

/// Synchronous dispatcher from sound events to registered listeners.
#[derive(Clone, Debug)]
pub struct AcousticPropagator {
    registry: ListenerRegistry,
    config: PropagatorConfig,
}

impl AcousticPropagator {
    pub fn new(registry: ListenerRegistry, mut config: PropagatorConfig) -> Self {
        config.wall_concreteness = config.wall_concreteness.clamp(0.0, 1.0);
        Self { registry, config }
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PropagatorConfig {
        &self.config
    }

    /// Adjust wall transparency at runtime (clamped to `[0, 1]`).
    pub fn set_wall_concreteness(&mut self, concreteness: f32) {
        self.config.wall_concreteness = concreteness.clamp(0.0, 1.0);
    }

    /// Nominal reach of `event` ignoring walls.
    pub fn ripple_radius(&self, event: &SoundEvent) -> f32 {
        event.base_volume * self.config.range_multiplier
    }

    /// Volume heard at `listener`, or `None` if the sound does not reach it.
    pub fn attenuate<O: Occlusion + ?Sized>(
        &self,
        event:     &SoundEvent,
        listener:  Vec2,
        occlusion: &O,
    ) -> Option<f32> {
        let max_range = self.ripple_radius(event);
        let offset = listener - event.source;
        let distance = offset.length();
        if distance > max_range {
            return None;
        }
        if distance <= f32::EPSILON {
            return (max_range > 0.0).then_some(event.base_volume);
        }

        let dir = offset * (1.0 / distance);
        let effective_range = match occlusion.raycast(event.source, dir, distance, self.config.occluders) {
            Some(hit) => hit.distance + (max_range - hit.distance) * self.config.wall_concreteness,
            None => max_range,
        };
        if effective_range <= 0.0 || distance > effective_range {
            return None;
        }
        Some(event.base_volume * (1.0 - distance / effective_range))
    }

    /// Deliver `event` to every registered listener it reaches, in
    /// registration order.  Returns the number of deliveries.
    pub fn emit<O, R>(&self, event: &SoundEvent, occlusion: &O, receiver: &mut R) -> usize
    where
        O: Occlusion + ?Sized,
        R: HearingReceiver + ?Sized,
    {
        // Snapshot so receivers may register or drop listeners re-entrantly.
        let listeners = self.registry.listeners();
        let mut delivered = 0;
        for id in listeners {
            if event.emitter == Some(id) {
                continue;
            }
            let Some(pos) = receiver.listener_position(id) else { continue };
            let Some(volume) = self.attenuate(event, pos, occlusion) else { continue };
            trace!(listener = %id, kind = %event.kind, volume, "sound delivered");
            receiver.on_hear(id, event, volume);
            delivered += 1;
        }
        delivered
    }
}
