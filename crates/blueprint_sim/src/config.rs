//! Simulation configuration

use glam::DVec3;

/// World-level simulation settings
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Fixed step length in seconds
    pub timestep: f64,
    /// Gravity acceleration, engine frame
    pub gravity: DVec3,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            gravity: DVec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_gravity(mut self, gravity: DVec3) -> Self {
        self.gravity = gravity;
        self
    }
}
