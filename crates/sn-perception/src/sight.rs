//! Deterministic front-and-back sight cone.
//!
//! Used for noticing peers and resources, where a reproducible yes/no is
//! worth more than sampling noise: in range of either cone, and no wall
//! between.

use sn_core::{LayerMask, ObjectId, Occlusion, Pose, Vec2};

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SightCone {
    /// Front cone width in degrees.  Default: 90.
    pub view_angle: f32,
    /// Default: 5.
    pub view_distance: f32,
    /// Rear cone width in degrees.  Default: 180.
    pub back_angle: f32,
    /// Default: 5.
    pub back_distance: f32,
}

impl Default for SightCone {
    fn default() -> Self {
        Self { view_angle: 90.0, view_distance: 5.0, back_angle: 180.0, back_distance: 5.0 }
    }
}

impl SightCone {
    /// `true` if `point` lies inside the front or back cone (ignoring walls).
    pub fn contains(&self, pose: &Pose, point: Vec2) -> bool {
        let offset = point - pose.position;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return true;
        }
        let forward = pose.forward();
        let in_front = distance <= self.view_distance
            && forward.angle_between_deg(offset) <= self.view_angle * 0.5;
        let behind = distance <= self.back_distance
            && (-forward).angle_between_deg(offset) <= self.back_angle * 0.5;
        in_front || behind
    }

    /// In a cone, and the wall ray toward `point` is clear or stops on
    /// `object` itself.
    pub fn can_see<O: Occlusion + ?Sized>(
        &self,
        pose:   &Pose,
        point:  Vec2,
        object: ObjectId,
        world:  &O,
    ) -> bool {
        if !self.contains(pose, point) {
            return false;
        }
        let offset = point - pose.position;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return true;
        }
        match world.raycast(pose.position, offset * (1.0 / distance), distance, LayerMask::WALLS) {
            None => true,
            Some(hit) => world.is_part_of(hit.object, object),
        }
    }
}
