//! Strategy dispatch and the memory write-back.
//!
//! # Per-tick flow
//!
//! ```text
//! evaluate(pose, target, world, memory, ctx, rng)
//!   ├─ head-turn lock bookkeeping (vision cone only)
//!   ├─ match strategy → PerceptionResult
//!   └─ memory.target_visible / visible_confidence / suspicion ← result
//! ```

use sn_core::{AgentRng, LayerMask, ObjectId, Occlusion, Pose, SimTime, Vec2};
use sn_memory::AgentMemory;
use tracing::{debug, trace};

use crate::{
    HeadTurn, PerceptionStrategy, ProbabilisticParams, Sample, SightCone, SimpleRadiusParams,
    VisibilitySampler, VisionConeParams,
};

/// What sight rays are tested against.
const SIGHT_MASK: LayerMask = LayerMask::WALLS.union(LayerMask::TARGET);

/// The object being looked for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Target {
    pub object: ObjectId,
    pub position: Vec2,
}

/// Per-call inputs that are not part of the agent's pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PerceptionContext {
    pub now: SimTime,
    /// The agent was pursuing as of the previous tick.
    pub pursuing: bool,
}

/// Verdict of one evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct PerceptionResult {
    pub visible: bool,
    /// In `[0, 1]`; 0 when nothing was seen.
    pub confidence: f32,
    /// A sub-threshold hit: not visible, but worth a look.
    pub suspicious: bool,
}

impl PerceptionResult {
    const UNSEEN: PerceptionResult = PerceptionResult { visible: false, confidence: 0.0, suspicious: false };

    fn seen(confidence: f32) -> Self {
        Self { visible: true, confidence, suspicious: false }
    }

    /// Publish the verdict into the agent's memory.  A suspicious verdict
    /// raises suspicion for `suspicion_duration` seconds.
    pub fn write_to(&self, memory: &mut AgentMemory, suspicion_duration: f32) {
        memory.target_visible = self.visible;
        memory.visible_confidence = self.confidence;
        if self.suspicious {
            memory.suspicion.raise(suspicion_duration);
        }
    }
}

/// Outcome of walking one batch of samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SampleOutcome {
    /// Hit the target at or above threshold.
    Confirmed(f32),
    /// Hit the target below threshold but above the floor.
    Suspicious(f32),
    /// No sample reached the target.
    Unseen,
}

impl SampleOutcome {
    pub fn into_result(self) -> PerceptionResult {
        match self {
            SampleOutcome::Confirmed(c) => PerceptionResult::seen(c),
            SampleOutcome::Suspicious(c) => PerceptionResult { visible: false, confidence: c, suspicious: true },
            SampleOutcome::Unseen => PerceptionResult::UNSEEN,
        }
    }
}

/// Walk `samples` in order; the first one whose capped confidence clears the
/// floor and whose ray reaches the target decides.
pub fn process_samples<I, O>(
    samples:   I,
    ceiling:   f32,
    threshold: f32,
    origin:    Vec2,
    target:    &Target,
    world:     &O,
) -> SampleOutcome
where
    I: IntoIterator<Item = Sample>,
    O: Occlusion + ?Sized,
{
    let floor = threshold * 0.5;
    for sample in samples {
        let s = sample.capped(ceiling);
        if s.confidence < floor {
            continue;
        }
        let Some(hit) = world.raycast(origin, s.direction, s.radius, SIGHT_MASK) else {
            continue;
        };
        trace!(confidence = s.confidence, distance = hit.distance, object = %hit.object, "sample hit");
        if world.is_part_of(hit.object, target.object) {
            return if s.confidence >= threshold {
                SampleOutcome::Confirmed(s.confidence)
            } else {
                SampleOutcome::Suspicious(s.confidence)
            };
        }
    }
    SampleOutcome::Unseen
}

// ── PerceptionEngine ──────────────────────────────────────────────────────────

/// One agent's perception.  Owns the strategy and any state it needs
/// between ticks (head turn, rendering sweep).
#[derive(Clone, Debug)]
pub struct PerceptionEngine {
    strategy: PerceptionStrategy,
    sight: SightCone,
    head: HeadTurn,
    sweep_points: Vec<Vec2>,
}

impl Default for PerceptionEngine {
    fn default() -> Self {
        Self::new(PerceptionStrategy::default())
    }
}

impl PerceptionEngine {
    pub fn new(strategy: PerceptionStrategy) -> Self {
        Self {
            strategy,
            sight: SightCone::default(),
            head: HeadTurn::new(),
            sweep_points: Vec::new(),
        }
    }

    pub fn with_sight(mut self, sight: SightCone) -> Self {
        self.sight = sight;
        self
    }

    pub fn strategy(&self) -> &PerceptionStrategy {
        &self.strategy
    }

    /// Swap the awareness mode.  Strategy-private state is reset.
    pub fn set_strategy(&mut self, strategy: PerceptionStrategy) {
        debug!(from = %self.strategy, to = %strategy, "perception strategy changed");
        self.strategy = strategy;
        self.head = HeadTurn::new();
        self.sweep_points.clear();
    }

    pub fn sight(&self) -> &SightCone {
        &self.sight
    }

    pub fn head_turn(&self) -> &HeadTurn {
        &self.head
    }

    /// End points of the last full-circle sweep (simple-radius mode).
    pub fn sweep_points(&self) -> &[Vec2] {
        &self.sweep_points
    }

    /// Deterministic cone + line-of-sight check for peers and resources.
    pub fn can_see<O: Occlusion + ?Sized>(
        &self,
        pose:   &Pose,
        point:  Vec2,
        object: ObjectId,
        world:  &O,
    ) -> bool {
        self.sight.can_see(pose, point, object, world)
    }

    /// Run the active strategy and write the verdict into `memory`.
    pub fn evaluate<O: Occlusion + ?Sized>(
        &mut self,
        pose:   &Pose,
        target: Option<&Target>,
        world:  &O,
        memory: &mut AgentMemory,
        ctx:    &PerceptionContext,
        rng:    &mut AgentRng,
    ) -> PerceptionResult {
        let result = match target {
            None => PerceptionResult::UNSEEN,
            Some(target) => match &self.strategy {
                PerceptionStrategy::Omniscient => PerceptionResult::seen(1.0),
                PerceptionStrategy::VisionCone(p) => {
                    vision_cone(p, &mut self.head, pose, target, world, ctx, rng)
                }
                PerceptionStrategy::ProbabilisticSampling(p) => {
                    let alert = ctx.pursuing || memory.suspicion.is_active();
                    probabilistic(p, pose, target, world, alert, rng)
                }
                PerceptionStrategy::SimpleRadius(p) => {
                    simple_radius(p, &mut self.sweep_points, pose, target, world)
                }
            },
        };

        let suspicion_duration = match &self.strategy {
            PerceptionStrategy::ProbabilisticSampling(p) => p.suspicion_duration,
            _ => 0.0,
        };
        result.write_to(memory, suspicion_duration);
        result
    }
}

// ── Strategies ────────────────────────────────────────────────────────────────

fn vision_cone<O: Occlusion + ?Sized>(
    p:      &VisionConeParams,
    head:   &mut HeadTurn,
    pose:   &Pose,
    target: &Target,
    world:  &O,
    ctx:    &PerceptionContext,
    rng:    &mut AgentRng,
) -> PerceptionResult {
    let head_offset = match &p.head_turn {
        Some(cfg) => {
            head.update_lock(cfg, ctx.now, ctx.pursuing);
            head.offset(cfg, ctx.now, rng)
        }
        None => 0.0,
    };

    let half = p.view_angle * 0.5;
    let forward = pose.forward();
    for i in 0..p.ray_count {
        let t = if p.ray_count > 1 { i as f32 / (p.ray_count - 1) as f32 } else { 0.5 };
        let uniform = lerp(-half, half, t);
        let fan_angle = if p.jitter {
            let g = rng.gaussian(0.0, 1.0).clamp(-3.0, 3.0);
            let gaussian_angle = lerp(-half, half, (g + 3.0) / 6.0);
            lerp(uniform, gaussian_angle, 0.7)
        } else {
            uniform
        };
        let angle = fan_angle + head_offset;

        let dir = forward.rotated_deg(angle);
        let Some(hit) = world.raycast(pose.position, dir, p.view_distance, SIGHT_MASK) else {
            continue;
        };
        if world.is_part_of(hit.object, target.object) {
            trace!(angle, distance = hit.distance, "vision ray reached target");
            if p.head_turn.is_some_and(|c| c.lock_when_alerted) {
                head.lock(angle);
            }
            return PerceptionResult::seen(1.0);
        }
    }
    PerceptionResult::UNSEEN
}

fn simple_radius<O: Occlusion + ?Sized>(
    p:      &SimpleRadiusParams,
    sweep:  &mut Vec<Vec2>,
    pose:   &Pose,
    target: &Target,
    world:  &O,
) -> PerceptionResult {
    sweep.clear();
    for i in 0..p.sweep_rays {
        let dir = Vec2::from_angle_deg(360.0 * i as f32 / p.sweep_rays as f32);
        let end = world
            .raycast(pose.position, dir, p.radius, LayerMask::WALLS)
            .map_or(pose.position + dir * p.radius, |h| h.point);
        sweep.push(end);
    }

    let distance = pose.position.distance(target.position);
    if distance <= p.radius && world.line_of_sight(pose.position, target.position, LayerMask::WALLS) {
        PerceptionResult::seen(1.0)
    } else {
        PerceptionResult::UNSEEN
    }
}

fn probabilistic<O: Occlusion + ?Sized>(
    p:      &ProbabilisticParams,
    pose:   &Pose,
    target: &Target,
    world:  &O,
    alert:  bool,
    rng:    &mut AgentRng,
) -> PerceptionResult {
    let count = p.sample_count(alert);
    let forward = pose.forward();

    let front = Cone { forward, angle: p.view_angle, distance: p.view_distance, count, ceiling: 1.0 };
    let mut outcome = front.sample(p, pose.position, target, world, rng);

    if outcome == SampleOutcome::Unseen {
        let back = Cone {
            forward:  -forward,
            angle:    p.back_angle,
            distance: p.back_distance,
            count:    count / 2,
            ceiling:  p.back_confidence_ceiling,
        };
        outcome = back.sample(p, pose.position, target, world, rng);
    }

    match outcome {
        SampleOutcome::Confirmed(c) => debug!(confidence = c, "target confirmed"),
        SampleOutcome::Suspicious(c) => debug!(confidence = c, "sub-threshold sighting"),
        SampleOutcome::Unseen => {}
    }
    outcome.into_result()
}

/// One sampled cone of a probabilistic evaluation.
struct Cone {
    forward:  Vec2,
    angle:    f32,
    distance: f32,
    count:    usize,
    ceiling:  f32,
}

impl Cone {
    fn sample<O: Occlusion + ?Sized>(
        &self,
        p:      &ProbabilisticParams,
        origin: Vec2,
        target: &Target,
        world:  &O,
        rng:    &mut AgentRng,
    ) -> SampleOutcome {
        let threshold = p.confidence_threshold;
        if p.min_spacing > 0.0 {
            let samples = VisibilitySampler::generate_spaced(
                self.forward,
                self.angle,
                self.distance,
                self.count,
                p.min_spacing,
                rng,
            );
            process_samples(samples, self.ceiling, threshold, origin, target, world)
        } else {
            let samples = VisibilitySampler::generate(self.forward, self.angle, self.distance, self.count, rng);
            process_samples(samples, self.ceiling, threshold, origin, target, world)
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
