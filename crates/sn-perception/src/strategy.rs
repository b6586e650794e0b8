//! Closed set of awareness modes.
//!
//! | Mode                    | Verdict                                          |
//! |-------------------------|--------------------------------------------------|
//! | `Omniscient`            | always visible, confidence 1                     |
//! | `VisionCone`            | any fan ray's first hit is the target            |
//! | `ProbabilisticSampling` | first target hit among random samples decides    |
//! | `SimpleRadius`          | within radius and a direct ray is unobstructed   |

use std::fmt;

use crate::HeadTurnConfig;

/// Ray-fan parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisionConeParams {
    /// Full cone width in degrees.  Default: 90.
    pub view_angle: f32,
    /// Default: 5.
    pub view_distance: f32,
    /// Default: 50.
    pub ray_count: usize,
    /// Pull each ray 70 % toward a Gaussian-distributed angle.  Default: on.
    pub jitter: bool,
    /// Idle head oscillation; `None` keeps the cone fixed.
    pub head_turn: Option<HeadTurnConfig>,
}

impl Default for VisionConeParams {
    fn default() -> Self {
        Self {
            view_angle: 90.0,
            view_distance: 5.0,
            ray_count: 50,
            jitter: true,
            head_turn: Some(HeadTurnConfig::default()),
        }
    }
}

/// Front/back radial sampling parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbabilisticParams {
    /// Front cone width in degrees.  Default: 90.
    pub view_angle: f32,
    /// Default: 5.
    pub view_distance: f32,
    /// Rear cone width in degrees.  Default: 180.
    pub back_angle: f32,
    /// Default: 5.
    pub back_distance: f32,
    /// Confirmation threshold; half of it is the suspicion floor.  Default: 0.3.
    pub confidence_threshold: f32,
    /// Front samples when calm.  Default: 50.
    pub normal_sample_count: usize,
    /// Front samples while pursuing or suspicious.  Default: 150.
    pub alert_sample_count: usize,
    /// Confidence cap for the rear cone.  Default: 0.5.
    pub back_confidence_ceiling: f32,
    /// Seconds a sub-threshold hit keeps the agent suspicious.  Default: 2.
    pub suspicion_duration: f32,
    /// Poisson-disc spacing between samples; 0 draws them independently.
    /// Default: 0.5.
    pub min_spacing: f32,
}

impl ProbabilisticParams {
    #[inline]
    pub fn suspicion_floor(&self) -> f32 {
        self.confidence_threshold * 0.5
    }

    /// Front-cone sample count for the current alert level.
    pub fn sample_count(&self, alert: bool) -> usize {
        if alert { self.alert_sample_count } else { self.normal_sample_count }
    }
}

impl Default for ProbabilisticParams {
    fn default() -> Self {
        Self {
            view_angle: 90.0,
            view_distance: 5.0,
            back_angle: 180.0,
            back_distance: 5.0,
            confidence_threshold: 0.3,
            normal_sample_count: 50,
            alert_sample_count: 150,
            back_confidence_ceiling: 0.5,
            suspicion_duration: 2.0,
            min_spacing: 0.5,
        }
    }
}

/// Circular awareness parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleRadiusParams {
    /// Default: 5.
    pub radius: f32,
    /// Rays in the full-circle rendering sweep; 0 disables it.  Default: 0.
    pub sweep_rays: usize,
}

impl Default for SimpleRadiusParams {
    fn default() -> Self {
        Self { radius: 5.0, sweep_rays: 0 }
    }
}

/// The active awareness mode of one agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerceptionStrategy {
    Omniscient,
    VisionCone(VisionConeParams),
    ProbabilisticSampling(ProbabilisticParams),
    SimpleRadius(SimpleRadiusParams),
}

impl Default for PerceptionStrategy {
    fn default() -> Self {
        PerceptionStrategy::ProbabilisticSampling(ProbabilisticParams::default())
    }
}

impl fmt::Display for PerceptionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PerceptionStrategy::Omniscient => "omniscient",
            PerceptionStrategy::VisionCone(_) => "vision-cone",
            PerceptionStrategy::ProbabilisticSampling(_) => "probabilistic",
            PerceptionStrategy::SimpleRadius(_) => "simple-radius",
        };
        f.write_str(s)
    }
}
