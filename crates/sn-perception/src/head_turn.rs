//! Idle head oscillation for the vision-cone strategy.
//!
//! ```text
//! offset = sin(t · speed · 2π) · amplitude + gaussian_offset
//! ```
//!
//! `gaussian_offset ~ N(0, gaussian_range)` is redrawn every
//! `jitter_interval` seconds.  On a sighting the head can lock to the angle
//! the target was spotted at; the lock is released `unlock_grace` seconds
//! after pursuit ends.

use sn_core::{AgentRng, SimTime};

/// Tunables.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadTurnConfig {
    /// Peak sinusoidal swing in degrees.  Default: 30.
    pub amplitude_deg: f32,
    /// Oscillations per second.  Default: 0.5.
    pub speed: f32,
    /// Standard deviation of the random offset, degrees.  Default: 10.
    pub gaussian_range: f32,
    /// Seconds between random-offset refreshes.  Default: 2.
    pub jitter_interval: f32,
    /// Default: true.
    pub lock_when_alerted: bool,
    /// Seconds after pursuit ends before the lock is released.  Default: 3.
    pub unlock_grace: f32,
}

impl Default for HeadTurnConfig {
    fn default() -> Self {
        Self {
            amplitude_deg: 30.0,
            speed: 0.5,
            gaussian_range: 10.0,
            jitter_interval: 2.0,
            lock_when_alerted: true,
            unlock_grace: 3.0,
        }
    }
}

/// Per-agent head state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadTurn {
    gaussian_offset: f32,
    last_jitter: Option<SimTime>,
    locked: Option<f32>,
    release_at: Option<SimTime>,
}

impl HeadTurn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current head offset from the body heading, in degrees.
    pub fn offset(&mut self, cfg: &HeadTurnConfig, now: SimTime, rng: &mut AgentRng) -> f32 {
        if cfg.lock_when_alerted {
            if let Some(angle) = self.locked {
                return angle;
            }
        }
        match self.last_jitter {
            // First use starts halfway toward a fresh draw.
            None => {
                self.gaussian_offset = 0.5 * rng.gaussian(0.0, cfg.gaussian_range);
                self.last_jitter = Some(now);
            }
            Some(t) if now.since(t) >= cfg.jitter_interval => {
                self.gaussian_offset = rng.gaussian(0.0, cfg.gaussian_range);
                self.last_jitter = Some(now);
            }
            Some(_) => {}
        }
        let phase = now.secs() * f64::from(cfg.speed) * std::f64::consts::TAU;
        phase.sin() as f32 * cfg.amplitude_deg + self.gaussian_offset
    }

    /// Hold the head at `angle_deg` (relative to body heading).  An existing
    /// lock is kept.
    pub fn lock(&mut self, angle_deg: f32) {
        if self.locked.is_none() {
            self.locked = Some(angle_deg);
        }
        self.release_at = None;
    }

    /// Advance the release countdown.  Pursuit holds the lock; once it stops
    /// the lock lapses after `unlock_grace` seconds.
    pub fn update_lock(&mut self, cfg: &HeadTurnConfig, now: SimTime, pursuing: bool) {
        if self.locked.is_none() {
            return;
        }
        if pursuing {
            self.release_at = None;
            return;
        }
        match self.release_at {
            None => self.release_at = Some(now + cfg.unlock_grace),
            Some(at) if now >= at => {
                self.locked = None;
                self.release_at = None;
            }
            Some(_) => {}
        }
    }

    pub fn locked_angle(&self) -> Option<f32> {
        self.locked
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }
}
