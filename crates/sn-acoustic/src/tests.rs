//! Unit tests for sn-acoustic.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeMap;

    use sn_core::{AgentId, Hit, LayerMask, ObjectId, Occlusion, Vec2};

    use crate::{HearingReceiver, SoundEvent};

    /// No geometry at all.
    pub struct OpenAir;

    impl Occlusion for OpenAir {
        fn raycast(&self, _: Vec2, _: Vec2, _: f32, _: LayerMask) -> Option<Hit> {
            None
        }
    }

    /// A wall along the line `x = at`.
    pub struct WallAtX(pub f32);

    impl Occlusion for WallAtX {
        fn raycast(&self, origin: Vec2, dir: Vec2, max: f32, mask: LayerMask) -> Option<Hit> {
            if !mask.contains(LayerMask::WALLS) || dir.x <= 0.0 || origin.x > self.0 {
                return None;
            }
            let d = (self.0 - origin.x) / dir.x;
            (d <= max).then(|| Hit { point: origin + dir * d, distance: d, object: ObjectId(9) })
        }
    }

    #[derive(Default)]
    pub struct Ears {
        pub positions: BTreeMap<AgentId, Vec2>,
        pub heard: Vec<(AgentId, f32)>,
    }

    impl Ears {
        pub fn at(points: &[(u32, f32, f32)]) -> Self {
            let positions = points
                .iter()
                .map(|&(id, x, y)| (AgentId(id), Vec2::new(x, y)))
                .collect();
            Self { positions, heard: Vec::new() }
        }
    }

    impl HearingReceiver for Ears {
        fn listener_position(&self, listener: AgentId) -> Option<Vec2> {
            self.positions.get(&listener).copied()
        }

        fn on_hear(&mut self, listener: AgentId, _event: &SoundEvent, volume: f32) {
            self.heard.push((listener, volume));
        }
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use sn_core::AgentId;

    use crate::ListenerRegistry;

    #[test]
    fn drop_unregisters() {
        let reg = ListenerRegistry::new();
        let a = reg.register(AgentId(0));
        {
            let _b = reg.register(AgentId(1));
            assert_eq!(reg.listeners(), vec![AgentId(0), AgentId(1)]);
        }
        assert_eq!(reg.listeners(), vec![AgentId(0)]);
        drop(a);
        assert!(reg.is_empty());
    }

    #[test]
    fn unwinding_unregisters() {
        let reg = ListenerRegistry::new();
        let inner = reg.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _held = inner.register(AgentId(4));
            assert!(inner.contains(AgentId(4)));
            panic!("listener failed mid-tick");
        }));
        assert!(result.is_err());
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_registration_is_noop() {
        let reg = ListenerRegistry::new();
        let first = reg.register(AgentId(3));
        let dup = reg.register(AgentId(3));
        assert!(first.is_owner());
        assert!(!dup.is_owner());
        assert_eq!(reg.len(), 1);
        drop(dup);
        assert!(reg.contains(AgentId(3)));
    }

    #[test]
    fn preserves_registration_order() {
        let reg = ListenerRegistry::new();
        let _g: Vec<_> = [5, 2, 9].iter().map(|&i| reg.register(AgentId(i))).collect();
        assert_eq!(reg.listeners(), vec![AgentId(5), AgentId(2), AgentId(9)]);
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let reg = ListenerRegistry::new();
        let guard = reg.register(AgentId(0));
        drop(reg);
        drop(guard);
    }

    #[test]
    fn clones_share_membership() {
        let reg = ListenerRegistry::new();
        let view = reg.clone();
        let _g = reg.register(AgentId(1));
        assert!(view.contains(AgentId(1)));
    }
}

// ── Propagation ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod propagator {
    use sn_core::{AgentId, Vec2};

    use super::helpers::{Ears, OpenAir, WallAtX};
    use crate::{AcousticPropagator, ListenerRegistry, PropagatorConfig, SoundEvent, SoundKind};

    fn propagator() -> AcousticPropagator {
        AcousticPropagator::new(ListenerRegistry::new(), PropagatorConfig::default())
    }

    #[test]
    fn full_volume_at_source() {
        let p = propagator();
        let e = SoundEvent::new(Vec2::new(1.0, 1.0), 3.0, SoundKind::Gunshot);
        assert_eq!(p.attenuate(&e, Vec2::new(1.0, 1.0), &OpenAir), Some(3.0));
    }

    #[test]
    fn zero_volume_at_effective_range() {
        let p = propagator();
        let e = SoundEvent::new(Vec2::ZERO, 2.0, SoundKind::Footstep);
        // Clear line: effective range = max range = 4.
        let v = p.attenuate(&e, Vec2::new(4.0, 0.0), &OpenAir).unwrap();
        assert!(v.abs() < 1e-6);
        assert!(p.attenuate(&e, Vec2::new(4.01, 0.0), &OpenAir).is_none());
    }

    #[test]
    fn linear_falloff() {
        let p = propagator();
        let e = SoundEvent::new(Vec2::ZERO, 2.0, SoundKind::Footstep);
        let v = p.attenuate(&e, Vec2::new(1.0, 0.0), &OpenAir).unwrap();
        assert!((v - 1.5).abs() < 1e-6);
    }

    #[test]
    fn wall_shrinks_effective_range() {
        let p = propagator();
        let e = SoundEvent::new(Vec2::ZERO, 5.0, SoundKind::Gunshot);
        let wall = WallAtX(2.0);
        // max 10, wall at 2 → effective 2 + 8·0.5 = 6.
        let v = p.attenuate(&e, Vec2::new(3.0, 0.0), &wall).unwrap();
        assert!((v - 5.0 * (1.0 - 3.0 / 6.0)).abs() < 1e-5);
        assert!(p.attenuate(&e, Vec2::new(7.0, 0.0), &wall).is_none());
        // Without the wall the same listener hears it.
        assert!(p.attenuate(&e, Vec2::new(7.0, 0.0), &OpenAir).is_some());
    }

    #[test]
    fn concrete_wall_blocks_completely() {
        let mut p = propagator();
        p.set_wall_concreteness(-4.0);
        assert_eq!(p.config().wall_concreteness, 0.0);
        let e = SoundEvent::new(Vec2::ZERO, 5.0, SoundKind::Gunshot);
        assert!(p.attenuate(&e, Vec2::new(3.0, 0.0), &WallAtX(2.0)).is_none());
    }

    #[test]
    fn silent_event_reaches_nobody() {
        let p = propagator();
        let e = SoundEvent::new(Vec2::ZERO, 0.0, SoundKind::Ambient);
        assert!(p.attenuate(&e, Vec2::ZERO, &OpenAir).is_none());
    }

    #[test]
    fn emit_in_registration_order_and_skips_out_of_range() {
        let p = propagator();
        let _g: Vec<_> = [2, 0, 1].iter().map(|&i| p.registry().register(AgentId(i))).collect();
        let mut ears = Ears::at(&[(0, 1.0, 0.0), (1, 50.0, 0.0), (2, 0.5, 0.0)]);
        let e = SoundEvent::new(Vec2::ZERO, 2.0, SoundKind::Footstep);
        let n = p.emit(&e, &OpenAir, &mut ears);
        assert_eq!(n, 2);
        let order: Vec<_> = ears.heard.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![AgentId(2), AgentId(0)]);
    }

    #[test]
    fn emitter_does_not_hear_itself() {
        let p = propagator();
        let _a = p.registry().register(AgentId(0));
        let _b = p.registry().register(AgentId(1));
        let mut ears = Ears::at(&[(0, 0.0, 0.0), (1, 1.0, 0.0)]);
        let e = SoundEvent::new(Vec2::ZERO, 2.0, SoundKind::Footstep).from_agent(AgentId(0));
        assert_eq!(p.emit(&e, &OpenAir, &mut ears), 1);
        assert_eq!(ears.heard[0].0, AgentId(1));
    }

    #[test]
    fn unregistered_listeners_are_silent() {
        let p = propagator();
        let mut ears = Ears::at(&[(0, 0.0, 0.0)]);
        {
            let _g = p.registry().register(AgentId(0));
        }
        let e = SoundEvent::new(Vec2::ZERO, 2.0, SoundKind::Impact);
        assert_eq!(p.emit(&e, &OpenAir, &mut ears), 0);
    }

    #[test]
    fn ripple_radius_is_nominal_range() {
        let p = propagator();
        let e = SoundEvent::new(Vec2::ZERO, 3.5, SoundKind::Gunshot);
        assert_eq!(p.ripple_radius(&e), 7.0);
    }
}
