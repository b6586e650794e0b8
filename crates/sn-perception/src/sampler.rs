//! Random direction/radius samples inside a view cone.
//!
//! # Distribution
//!
//! ```text
//! radius = max_radius · √u      u ~ U[0, 1]      (uniform area density)
//! angle  ~ U[−cone/2, +cone/2]                   (degrees from forward)
//! ```
//!
//! # Confidence
//!
//! `min(1 − |angle|/half_angle, 1 − radius/max_radius)`, clamped to `[0, 1]`:
//! 1 on the cone axis at the viewer, 0 on the rim.
//!
//! # Spacing
//!
//! [`VisibilitySampler::generate_spaced`] is the Poisson-disc variant: the
//! first point is drawn as above, then each accepted point gets up to
//! [`SPACING_ATTEMPTS`] candidates at distance `[d, 2d)` around it, and a
//! candidate closer than `d` to any accepted point is rejected.  It stops at
//! `count` samples or when no point has attempts left.

use std::collections::VecDeque;

use sn_core::{AgentRng, Vec2};

/// Candidates tried around each accepted point before it is retired.
pub const SPACING_ATTEMPTS: usize = 30;

/// One probe ray inside a cone.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Unit direction in world space.
    pub direction: Vec2,
    pub radius: f32,
    /// In `[0, 1]`.
    pub confidence: f32,
}

impl Sample {
    /// Copy with confidence limited to `ceiling`.
    #[inline]
    pub fn capped(self, ceiling: f32) -> Sample {
        Sample { confidence: self.confidence.min(ceiling), ..self }
    }
}

/// Pure confidence formula.  Non-increasing in `|angle_deg|` and in `radius`.
pub fn confidence_at(angle_deg: f32, radius: f32, half_angle_deg: f32, max_radius: f32) -> f32 {
    let angle_factor = if half_angle_deg > 0.0 {
        1.0 - angle_deg.abs() / half_angle_deg
    } else {
        1.0
    };
    let radius_factor = if max_radius > 0.0 { 1.0 - radius / max_radius } else { 0.0 };
    angle_factor.min(radius_factor).clamp(0.0, 1.0)
}

/// Stateless sample generator.
pub struct VisibilitySampler;

impl VisibilitySampler {
    /// Lazily draw exactly `count` samples from the cone centred on `forward`
    /// with full width `cone_angle_deg`.
    pub fn generate(
        forward:        Vec2,
        cone_angle_deg: f32,
        max_radius:     f32,
        count:          usize,
        rng:            &mut AgentRng,
    ) -> Samples<'_> {
        Samples {
            rng,
            forward: forward.normalized(),
            half_angle: (cone_angle_deg * 0.5).max(0.0),
            max_radius: max_radius.max(0.0),
            remaining: count,
        }
    }

    /// Like [`generate`](Self::generate), but no two samples end closer than
    /// `min_spacing` to each other.  Yields at most `count` samples; a cone
    /// too small for `count` spaced points yields fewer.
    pub fn generate_spaced(
        forward:        Vec2,
        cone_angle_deg: f32,
        max_radius:     f32,
        count:          usize,
        min_spacing:    f32,
        rng:            &mut AgentRng,
    ) -> SpacedSamples<'_> {
        SpacedSamples {
            rng,
            forward: forward.normalized(),
            half_angle: (cone_angle_deg * 0.5).max(0.0),
            max_radius: max_radius.max(0.0),
            min_spacing: min_spacing.max(f32::EPSILON),
            remaining: count,
            accepted: Vec::new(),
            active: VecDeque::new(),
            attempts: 0,
        }
    }
}

/// Iterator returned by [`VisibilitySampler::generate`].
pub struct Samples<'r> {
    rng: &'r mut AgentRng,
    forward: Vec2,
    half_angle: f32,
    max_radius: f32,
    remaining: usize,
}

impl Iterator for Samples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let u: f32 = self.rng.random();
        let radius = self.max_radius * u.sqrt();
        let angle = if self.half_angle > 0.0 {
            self.rng.gen_range(-self.half_angle..=self.half_angle)
        } else {
            0.0
        };
        Some(Sample {
            direction: self.forward.rotated_deg(angle),
            radius,
            confidence: confidence_at(angle, radius, self.half_angle, self.max_radius),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Samples<'_> {}

/// Iterator returned by [`VisibilitySampler::generate_spaced`].
pub struct SpacedSamples<'r> {
    rng: &'r mut AgentRng,
    forward: Vec2,
    half_angle: f32,
    max_radius: f32,
    min_spacing: f32,
    remaining: usize,
    /// Cone-local points, viewer at the origin.
    accepted: Vec<Vec2>,
    active: VecDeque<Vec2>,
    /// Candidates already tried around `active.front()`.
    attempts: usize,
}

impl SpacedSamples<'_> {
    fn first_point(&mut self) -> Vec2 {
        let u: f32 = self.rng.random();
        let radius = self.max_radius * u.sqrt();
        let angle = if self.half_angle > 0.0 {
            self.rng.gen_range(-self.half_angle..=self.half_angle)
        } else {
            0.0
        };
        self.forward.rotated_deg(angle) * radius
    }

    /// A point in the ring `[d, 2d)` around `centre`, if it lands in the cone.
    fn candidate_around(&mut self, centre: Vec2) -> Option<Vec2> {
        let d = self.min_spacing;
        let r = self.rng.gen_range(d..2.0 * d);
        let theta = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let point = centre + Vec2::new(theta.cos(), theta.sin()) * r;
        let length = point.length();
        let inside = length > f32::EPSILON
            && length <= self.max_radius
            && self.forward.angle_between_deg(point) <= self.half_angle;
        inside.then_some(point)
    }

    fn crowded(&self, point: Vec2) -> bool {
        self.accepted.iter().any(|p| p.distance(point) < self.min_spacing)
    }

    fn accept(&mut self, point: Vec2) -> Sample {
        self.accepted.push(point);
        self.active.push_back(point);
        self.remaining -= 1;

        let radius = point.length();
        let direction = if radius > f32::EPSILON { point * (1.0 / radius) } else { self.forward };
        let angle = self.forward.angle_between_deg(direction);
        Sample {
            direction,
            radius,
            confidence: confidence_at(angle, radius, self.half_angle, self.max_radius),
        }
    }
}

impl Iterator for SpacedSamples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.remaining == 0 {
            return None;
        }
        if self.accepted.is_empty() {
            let first = self.first_point();
            return Some(self.accept(first));
        }
        while let Some(&centre) = self.active.front() {
            while self.attempts < SPACING_ATTEMPTS {
                self.attempts += 1;
                if let Some(point) = self.candidate_around(centre) {
                    if !self.crowded(point) {
                        return Some(self.accept(point));
                    }
                }
            }
            self.active.pop_front();
            self.attempts = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
