//! Per-guard tunables.

/// Movement, memory and behaviour-selection parameters for one guard.
///
/// Every field has the default the game shipped with; scenario files only
/// override what they need.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentConfig {
    /// World units per second.  Default: 3.
    pub move_speed: f32,
    /// A waypoint counts as reached within this distance.  Default: 0.1.
    pub reach_distance: f32,
    /// Seconds between re-plans toward an unchanged goal.  Default: 0.5.
    pub repath_interval: f32,
    /// Degrees per second.  Default: 360.
    pub turn_rate_deg: f32,
    /// How long a target sighting keeps the guard in pursuit.  Default: 10.
    pub lost_target_timeout: f32,
    /// How long a resource sighting is remembered.  Default: 15.
    pub resource_memory_timeout: f32,
    /// Resources are sought below this fraction of max health.  Default: 0.5.
    pub seek_health_fraction: f32,
    /// Weighted sound importance must exceed this to react.  Default: 0.3.
    pub hearing_threshold: f32,
    /// Default: true.
    pub can_hear: bool,
    /// Suspicion raised while investigating a sound, seconds.  Default: 2.
    pub suspicion_duration: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            reach_distance: 0.1,
            repath_interval: 0.5,
            turn_rate_deg: 360.0,
            lost_target_timeout: 10.0,
            resource_memory_timeout: 15.0,
            seek_health_fraction: 0.5,
            hearing_threshold: 0.3,
            can_hear: true,
            suspicion_duration: 2.0,
        }
    }
}

/// Hit points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::full(100.0)
    }
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn new(current: f32, max: f32) -> Self {
        Self { current: current.clamp(0.0, max), max }
    }

    /// Add `amount`, capped at `max`.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// `current / max`, or 0 for a zero-max body.
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 { self.current / self.max } else { 0.0 }
    }
}
