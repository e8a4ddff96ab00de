//! Blueprint Sim - Engine-Native Scene Objects
//!
//! This crate is the engine side of the Blueprint toolchain: generational
//! stores for bodies, shapes, constraints, visuals and materials, plus a
//! frame-stepped simulation loop with a pluggable solver seam. It holds
//! and validates state; physics solving itself is an external
//! collaborator.
//!
//! # Features
//!
//! - Generational object stores with use-after-destroy detection
//! - Rigid bodies with overridable computed mass properties
//! - Constraints with six elementary rows and per-axis controller blocks
//!   (target speed, lock, range, friction)
//! - Materials, contact materials and friction models
//! - Handedness conversion helpers for the model/engine boundary
//! - Step loop with pre/post listeners around the solver seam
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   Simulation                    │
//! │   pre-step ─► solver seam ─► post-step          │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │                 SimWorld                  │  │
//! │  │  ┌────────┐ ┌────────┐ ┌─────────────┐    │  │
//! │  │  │ Bodies │ │ Shapes │ │ Constraints │    │  │
//! │  │  └────────┘ └────────┘ └─────────────┘    │  │
//! │  │  ┌─────────┐ ┌───────────────────────┐    │  │
//! │  │  │ Visuals │ │ Materials / Contacts  │    │  │
//! │  │  └─────────┘ └───────────────────────┘    │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use blueprint_sim::prelude::*;
//!
//! let mut simulation = Simulation::new(SimConfig::default());
//! let world = simulation.world_mut();
//!
//! let base = world.create_body(BodyDesc::new("base"));
//! let arm = world.create_body(
//!     BodyDesc::new("arm").with_pose(Isometry::from_position([0.0, 1.0, 0.0].into())),
//! );
//! let hinge = world.create_constraint(
//!     ConstraintDesc::new("pivot", ConstraintKind::Hinge, base).with_body2(arm),
//! )?;
//!
//! simulation.step();
//! println!("angle: {}", simulation.world().constraint_angle(hinge)?);
//! ```

pub mod body;
pub mod config;
pub mod constraint;
pub mod convert;
pub mod error;
pub mod material;
pub mod math;
pub mod shape;
pub mod simulation;
pub mod store;
pub mod visual;
pub mod world;

pub mod prelude {
    //! Common imports for simulation functionality
    pub use crate::body::{
        BodyDesc, BodyHandle, MassProperties, MotionKind, RigidBody, UserValue,
    };
    pub use crate::config::SimConfig;
    pub use crate::constraint::{
        Constraint, ConstraintDesc, ConstraintHandle, ConstraintKind, ConstraintRow,
        ControllerAxis, ControllerBase, ControllerBlock, Dof, FrictionController, LockController,
        RangeController, TargetSpeedController, DEFAULT_COMPLIANCE, DEFAULT_DAMPING,
    };
    pub use crate::convert::{convert_isometry, convert_quat, convert_vector};
    pub use crate::error::{Result, SimError};
    pub use crate::material::{
        ContactMaterial, ContactMaterialDesc, ContactMaterialHandle, FrictionModel,
        FrictionModelHandle, FrictionModelKind, Material, MaterialDesc, MaterialHandle, SolveKind,
    };
    pub use crate::math::Isometry;
    pub use crate::shape::{Shape, ShapeDesc, ShapeHandle, ShapeKind};
    pub use crate::simulation::{Simulation, Solver, StepListener};
    pub use crate::store::{Store, StoreKey};
    pub use crate::visual::{Visual, VisualDesc, VisualHandle, VisualKind};
    pub use crate::world::SimWorld;
}

pub use prelude::*;
