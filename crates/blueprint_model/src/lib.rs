//! Blueprint Model - Declarative Scene Descriptions
//!
//! This crate provides the declarative side of the Blueprint toolchain: a
//! typed object graph parsed from model files, sealed with stable
//! identities, plus the signal declarations that bridge authored values
//! and live engine state.
//!
//! # Features
//!
//! - Typed node tree (groups, bodies, geometries, attachments, visuals)
//! - Connectors with per-DOF main interactions and 1D controller
//!   interactions
//! - Multi-attachment connectors expanded into pairwise chains
//! - Deterministic pre-order identity assignment at seal time
//! - Dot-separated path resolution for nodes, connectors and signal
//!   targets
//! - Background trimesh loading with a blocking hand-off
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Model file                   │
//! │   { "models": { name: { root, materials,     │
//! │                 inputs, outputs } } }        │
//! └──────────────────────┬───────────────────────┘
//!                        │ parse + seal
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │                 Component                    │
//! │  ┌──────────┐ ┌───────────┐ ┌─────────────┐  │
//! │  │ Node tree│ │ Materials │ │ In/Outputs  │  │
//! │  │ (ids)    │ │           │ │             │  │
//! │  └──────────┘ └───────────┘ └─────────────┘  │
//! │  ┌──────────────────────────────────────┐    │
//! │  │ Mesh slots (background OBJ loading)  │    │
//! │  └──────────────────────────────────────┘    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use blueprint_model::prelude::*;
//!
//! let config = LoaderConfig::new().with_module_path("assets/meshes");
//! let component = load_component("scene.json", "excavator", &config)?;
//!
//! for material in component.materials() {
//!     println!("material {} ({} kg/m^3)", material.name, material.density);
//! }
//!
//! match component.resolve("excavator.arm.joint") {
//!     Some(Resolved::Connector(c)) => println!("hinge {:?}", c.id),
//!     _ => println!("no such connector"),
//! }
//! ```

pub mod defaults;
pub mod error;
pub mod graph;
pub mod loader;
pub mod signals;

pub mod prelude {
    //! Common imports for model functionality
    pub use crate::defaults;
    pub use crate::error::{ModelError, Result};
    pub use crate::graph::{
        AttachmentDef, AxisVariant, BodyDef, Component, Connector, ConnectorKind,
        ContactMaterialDef, DofData, GeometryDef, GeometryShape, Interaction, InteractionId,
        InteractionKind, MainInteraction, MaterialDef, MotionControl, MultiConnector, Node,
        NodeId, NodeKind, Resolved, SignalTarget, VisualDef, VisualShape, CONNECTOR_TAG,
    };
    pub use crate::loader::{
        load_component, parse_component, LoaderConfig, MeshData, MeshSlot, ModelSource,
    };
    pub use crate::signals::{
        InputDef, InputKind, OutputDef, OutputKind, SignalLayout, SignalValue,
    };
}

pub use prelude::*;
