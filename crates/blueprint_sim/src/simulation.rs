//! The frame-stepped simulation loop
//!
//! One step runs pre-step listeners, the solver seam, then post-step
//! listeners, strictly in that order. Physics solving itself is an
//! external collaborator behind the [`Solver`] trait; without one the
//! simulation only advances time.

use crate::config::SimConfig;
use crate::world::SimWorld;

/// Physics solving seam, plugged into the simulation by the host.
pub trait Solver {
    fn solve(&mut self, world: &mut SimWorld, dt: f64);
}

/// Hook pair running around every step
pub trait StepListener {
    /// Runs before the solve; last chance to push input state.
    fn pre_step(&mut self, world: &mut SimWorld);
    /// Runs after the solve, on finalized transforms.
    fn post_step(&mut self, world: &mut SimWorld);
}

/// The stepped simulation owning the world
pub struct Simulation {
    world: SimWorld,
    solver: Option<Box<dyn Solver>>,
    time: f64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: SimWorld::new(config),
            solver: None,
            time: 0.0,
        }
    }

    pub fn set_solver(&mut self, solver: Box<dyn Solver>) {
        self.solver = Some(solver);
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    /// Simulated time in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Step without listeners.
    pub fn step(&mut self) {
        self.step_with(&mut []);
    }

    /// Step with listeners. Pre-step hooks all complete before the solve
    /// starts; post-step hooks only run on finalized state.
    pub fn step_with(&mut self, listeners: &mut [&mut dyn StepListener]) {
        let dt = self.world.config().timestep;
        for listener in listeners.iter_mut() {
            listener.pre_step(&mut self.world);
        }
        if let Some(solver) = self.solver.as_mut() {
            solver.solve(&mut self.world, dt);
        }
        self.time += dt;
        for listener in listeners.iter_mut() {
            listener.post_step(&mut self.world);
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
