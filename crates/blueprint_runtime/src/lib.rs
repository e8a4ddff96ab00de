//! Blueprint Runtime - Signal Flow For Imported Scenes
//!
//! This crate keeps an imported [`blueprint_sim`] scene in sync with
//! its declarative model while the simulation runs. A session starts
//! from the model source and the scene record alone, so it works the
//! same whether the import happened a moment ago or in an earlier
//! process.
//!
//! # Features
//!
//! - Session start that re-parses the model and re-binds every
//!   synchronized scene object by path and type tag
//! - Stale paths and type changes skipped with a warning, never
//!   aborting the session
//! - Input signals raised by name and pushed into bodies and
//!   constraint controllers before each solve
//! - Output signals refreshed from finalized state after each solve,
//!   converted back into the model's frame
//! - Flat `f64` wire encoding on both directions for host integrations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   re-parse   ┌──────────────────────────┐
//! │ ModelSource │ ───────────► │          Bridge          │
//! └─────────────┘              │  path + type re-binding  │
//! ┌─────────────┐   paths      │  input / output routes   │
//! │    Scene    │ ───────────► └────────────┬─────────────┘
//! └─────────────┘                           │ StepListener
//!                                           ▼
//!                              pre_step ─► solve ─► post_step
//! ```
//!
//! # Example
//!
//! ```ignore
//! use blueprint_model::prelude::*;
//! use blueprint_runtime::prelude::*;
//! use blueprint_sim::prelude::*;
//!
//! let source = ModelSource::File("scene.json".into());
//! let mut bridge = Bridge::start(&source, "rig", &LoaderConfig::new(), &scene)?;
//! bridge.raise_input("drive_speed", SignalValue::Scalar(1.5))?;
//! simulation.step_with(&mut [&mut bridge]);
//! let angle = bridge.poll_output("joint_angle")?;
//! ```

pub mod bridge;
pub mod error;

pub mod prelude {
    //! Common imports for runtime functionality
    pub use crate::bridge::Bridge;
    pub use crate::error::{Result, RuntimeError};
}

pub use prelude::*;
