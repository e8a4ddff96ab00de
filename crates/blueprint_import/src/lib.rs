//! Blueprint Import - Declarative Models Into Engine Scenes
//!
//! This crate turns a sealed [`blueprint_model`] component into live
//! engine objects in a [`blueprint_sim`] world. The walk is all-or-
//! nothing: a failed import destroys everything it created and returns
//! the error, so the world never keeps a partial scene.
//!
//! # Features
//!
//! - Material pass building shape materials, contact materials and
//!   friction models before any shape needs them
//! - Pre-order tree walk creating bodies, shapes and visuals at their
//!   handedness-converted world poses
//! - Deferred connector resolution, so connectors may reference
//!   attachments anywhere in the tree
//! - Default-aware mapping of main interactions onto constraint rows and
//!   of 1D interactions onto controller slots
//! - A scene record pairing every engine object with the declarative
//!   path it came from, for runtime re-binding
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐      ┌──────────────────────────────────┐
//! │ Component │ ───► │              Walker              │
//! └───────────┘      │  materials ─► tree ─► queues     │
//!                    └────────────────┬─────────────────┘
//!                                     ▼
//!                    ┌──────────────────────────────────┐
//!                    │        Connector resolver        │
//!                    │  constraints, row + controller   │
//!                    │             mappers              │
//!                    └────────────────┬─────────────────┘
//!                                     ▼
//!                          SimWorld + Scene record
//! ```
//!
//! # Example
//!
//! ```ignore
//! use blueprint_import::prelude::*;
//! use blueprint_model::prelude::*;
//! use blueprint_sim::prelude::*;
//!
//! let component = load_component("scene.json", "rig", &LoaderConfig::new())?;
//! let mut world = SimWorld::default();
//! let imported = import_component(&component, &mut world)?;
//! for object in imported.scene.objects() {
//!     println!("{} ({})", object.path, object.type_tag);
//! }
//! ```

pub mod constraint_map;
pub mod controller_map;
pub mod error;
pub mod importer;
pub mod materials;
pub mod scene;

mod resolver;

pub mod prelude {
    //! Common imports for import functionality
    pub use crate::constraint_map::{apply_main_interaction, constrained_dofs};
    pub use crate::controller_map::{apply_interaction, slot_for};
    pub use crate::error::{ImportError, Result};
    pub use crate::importer::{import_component, ImportedScene};
    pub use crate::materials::MaterialCatalog;
    pub use crate::scene::{Scene, SceneObject, SceneTarget};
}

pub use prelude::*;
