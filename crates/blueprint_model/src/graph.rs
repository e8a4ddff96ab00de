//! The declarative object graph
//!
//! A [`Component`] is the sealed, immutable root of one authored model: a
//! tree of [`Node`]s carrying bodies, geometries, attachments and visuals,
//! plus the connectors that link attachments together. Sealing assigns a
//! stable [`NodeId`]/[`InteractionId`] to every node and interaction in
//! deterministic pre-order; all downstream lookup tables key on these ids,
//! never on addresses.

use std::collections::HashMap;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::loader::MeshSlot;
use crate::signals::{InputDef, OutputDef};

/// Type tag recorded for connector scene objects.
pub const CONNECTOR_TAG: &str = "connector";

/// Stable identity of a node or connector, assigned at seal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Id value before seal assignment
    pub const UNSET: Self = Self(u32::MAX);

    /// Raw id value
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Stable identity of an interaction, assigned at seal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractionId(pub(crate) u32);

impl InteractionId {
    /// Id value before seal assignment
    pub const UNSET: Self = Self(u32::MAX);

    /// Raw id value
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::UNSET
    }
}

fn default_true() -> bool {
    true
}

/// One node of the authored tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Path segment; the loader overwrites the root's name with the model
    /// key
    #[serde(default)]
    pub name: String,
    /// Local position relative to the parent node, authored handedness
    #[serde(default)]
    pub position: DVec3,
    /// Local rotation relative to the parent node, authored handedness
    #[serde(default)]
    pub rotation: DQuat,
    /// Every authored node carries an explicit kind tag
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<Node>,
    /// Connectors owned by this node
    #[serde(default)]
    pub connectors: Vec<Connector>,
    /// Multi-attachment connectors owned by this node, expanded at seal
    #[serde(default)]
    pub multi_connectors: Vec<MultiConnector>,
    #[serde(skip)]
    pub id: NodeId,
}

/// Concrete subtype of a node. Closed set: an unknown kind fails the parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Group,
    Body(BodyDef),
    Geometry(GeometryDef),
    Attachment(AttachmentDef),
    Visual(VisualDef),
}

impl NodeKind {
    /// Type tag recorded on the scene binding for this node kind.
    pub fn type_tag(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Body(_) => "body",
            NodeKind::Geometry(_) => "geometry",
            NodeKind::Attachment(_) => "attachment",
            NodeKind::Visual(_) => "visual",
        }
    }
}

/// How a body is driven by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionControl {
    #[default]
    Dynamics,
    Statics,
    Kinematics,
}

/// Rigid body node payload. `None` mass properties leave the engine's
/// computed values in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDef {
    pub motion_control: MotionControl,
    pub mass: Option<f64>,
    pub inertia_diagonal: Option<DVec3>,
    pub center_of_mass: Option<DVec3>,
}

/// Collision geometry node payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryDef {
    pub shape: GeometryShape,
    /// Name of a shape material declared at the component level
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default = "default_true")]
    pub collisions_enabled: bool,
}

/// Collision shapes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryShape {
    /// Full side lengths; halved into engine half-extents
    Box { lengths: DVec3 },
    Sphere { radius: f64 },
    Cylinder { radius: f64, length: f64 },
    /// Plane equation ax + by + cz + d = 0
    Plane { a: f64, b: f64, c: f64, d: f64 },
    /// External mesh payload, loaded in the background
    Trimesh { source: String },
}

/// Attachment frame node payload. The owning body is inferred at seal time
/// from the nearest enclosing body node; `None` anchors the frame to the
/// world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachmentDef {
    #[serde(skip)]
    pub body: Option<NodeId>,
}

/// Visual shape node payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualDef {
    pub shape: VisualShape,
    /// RGB in [0, 1]
    #[serde(default)]
    pub color: Option<DVec3>,
}

/// Visual shapes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualShape {
    Box { lengths: DVec3 },
    Sphere { radius: f64 },
    Cylinder { radius: f64, length: f64 },
    File { source: String },
}

/// Connector subtype. `Unknown` is produced for unrecognized kinds so the
/// importer can report them as structural errors with the connector name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectorKind {
    Hinge,
    Prismatic,
    Lock,
    Ball,
    Spring,
    Cylindrical,
    #[serde(other)]
    Unknown,
}

/// Links two attachments through one engine constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub name: String,
    #[serde(flatten)]
    pub kind: ConnectorKind,
    /// Root-relative path of the first attachment; its body is the
    /// constraint's reference body and must exist
    pub attachment1: String,
    /// Root-relative path of the second attachment; a body-less attachment
    /// anchors the constraint to the world
    pub attachment2: String,
    #[serde(default)]
    pub main_interaction: MainInteraction,
    /// Auxiliary controller interactions
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(skip)]
    pub id: NodeId,
    #[serde(skip)]
    pub attachment1_id: NodeId,
    #[serde(skip)]
    pub attachment2_id: NodeId,
}

/// A connector spanning more than two attachments. Sealing expands it into
/// a chain of pairwise [`Connector`]s named `<name>_<i>`; the expansion is
/// resolved after all explicit connectors and is never synchronized at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiConnector {
    pub name: String,
    #[serde(flatten)]
    pub kind: ConnectorKind,
    pub attachments: Vec<String>,
    #[serde(default)]
    pub main_interaction: MainInteraction,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(skip)]
    pub expanded: Vec<Connector>,
}

/// Per-degree-of-freedom stiffness and damping of a connector's main
/// interaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MainInteraction {
    pub stiffness: DofData,
    pub damping: DofData,
    #[serde(skip)]
    pub id: InteractionId,
}

/// One value per canonical degree of freedom. `None` marks the field as
/// default.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DofData {
    pub along_normal: Option<f64>,
    pub along_cross: Option<f64>,
    pub along_tangent: Option<f64>,
    pub around_normal: Option<f64>,
    pub around_cross: Option<f64>,
    pub around_tangent: Option<f64>,
}

impl DofData {
    /// All six authored values, translational first.
    pub fn values(&self) -> [Option<f64>; 6] {
        [
            self.along_normal,
            self.along_cross,
            self.along_tangent,
            self.around_normal,
            self.around_cross,
            self.around_tangent,
        ]
    }
}

/// Which controller slot a 1D interaction addresses. Absent means the
/// constraint's primary slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisVariant {
    Translational,
    Rotational,
}

/// Controller-specific fields of a 1D interaction. `Unknown` is the
/// warn-and-skip path for kinds this version does not recognize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionKind {
    Motor {
        #[serde(default)]
        speed: Option<f64>,
        #[serde(default)]
        lock_at_zero_speed: Option<bool>,
    },
    Lock,
    Range {
        /// Degrees for rotational interactions
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Friction {
        #[serde(default)]
        coefficient: Option<f64>,
    },
    #[serde(other)]
    Unknown,
}

/// Auxiliary 1D interaction of a connector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub name: String,
    #[serde(default)]
    pub axis: Option<AxisVariant>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub stiffness: Option<f64>,
    #[serde(default)]
    pub damping: Option<f64>,
    #[serde(default)]
    pub min_force: Option<f64>,
    #[serde(default)]
    pub max_force: Option<f64>,
    #[serde(flatten)]
    pub kind: InteractionKind,
    #[serde(skip)]
    pub id: InteractionId,
}

/// Shape material declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDef {
    pub name: String,
    #[serde(default = "default_density")]
    pub density: f64,
}

fn default_density() -> f64 {
    crate::defaults::DENSITY
}

/// Contact material declaration between two shape materials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMaterialDef {
    pub name: String,
    pub material1: String,
    pub material2: String,
    #[serde(default = "default_youngs")]
    pub youngs_modulus: f64,
    #[serde(default)]
    pub restitution: f64,
    /// Normalized by the Young's modulus when mapped onto the engine
    #[serde(default = "default_contact_damping")]
    pub damping: f64,
    /// Single authored value, duplicated into the engine's direction pair
    #[serde(default)]
    pub surface_viscosity: f64,
    #[serde(default = "default_friction")]
    pub primary_friction_coefficient: f64,
    #[serde(default = "default_friction")]
    pub secondary_friction_coefficient: f64,
    #[serde(default)]
    pub adhesive_force: f64,
    #[serde(default)]
    pub adhesive_overlap: f64,
    /// Presence selects an oriented box friction model instead of scale-box
    #[serde(default)]
    pub friction_reference: Option<String>,
}

fn default_youngs() -> f64 {
    2.0e8
}

fn default_contact_damping() -> f64 {
    1.5e7
}

fn default_friction() -> f64 {
    crate::defaults::FRICTION_COEFFICIENT
}

/// A path resolution result: paths address nodes and connectors.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    Node(&'a Node),
    Connector(&'a Connector),
}

/// A signal target resolution result.
#[derive(Debug, Clone, Copy)]
pub enum SignalTarget<'a> {
    /// A rigid body node
    Body(&'a Node),
    /// A connector addressed as a whole (its main interaction)
    MainInteraction(&'a Connector),
    /// A named auxiliary interaction of a connector
    Interaction(&'a Connector, &'a Interaction),
}

/// The sealed root of one loaded model
#[derive(Debug)]
pub struct Component {
    pub(crate) root: Node,
    pub(crate) materials: Vec<MaterialDef>,
    pub(crate) contact_materials: Vec<ContactMaterialDef>,
    pub(crate) inputs: Vec<InputDef>,
    pub(crate) outputs: Vec<OutputDef>,
    pub(crate) meshes: HashMap<NodeId, MeshSlot>,
}

impl Component {
    /// Root node; its name is the model name and prefixes every path.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Shape material declarations, in authored order.
    pub fn materials(&self) -> &[MaterialDef] {
        &self.materials
    }

    /// Contact material declarations, in authored order.
    pub fn contact_materials(&self) -> &[ContactMaterialDef] {
        &self.contact_materials
    }

    /// Input signal declarations.
    pub fn inputs(&self) -> &[InputDef] {
        &self.inputs
    }

    /// Output signal declarations.
    pub fn outputs(&self) -> &[OutputDef] {
        &self.outputs
    }

    /// Pending mesh payload for a trimesh geometry node.
    pub fn mesh(&self, id: NodeId) -> Option<&MeshSlot> {
        self.meshes.get(&id)
    }

    /// Resolve a full path (root segment included) to a node or connector.
    ///
    /// Returns `None` when the root segment does not match this model or
    /// any later segment fails to resolve.
    pub fn resolve(&self, path: &str) -> Option<Resolved<'_>> {
        match path.split_once('.') {
            None => (path == self.root.name).then_some(Resolved::Node(&self.root)),
            Some((first, rest)) => {
                if first != self.root.name {
                    return None;
                }
                resolve_in(&self.root, rest)
            }
        }
    }

    /// Resolve a root-relative path, as used by connector attachment
    /// references and signal targets.
    pub fn resolve_relative(&self, path: &str) -> Option<Resolved<'_>> {
        resolve_in(&self.root, path)
    }

    /// Resolve a signal target path. A body path targets the body, a
    /// connector path targets its main interaction, and a connector path
    /// followed by an interaction name targets that auxiliary interaction.
    pub fn resolve_signal_target(&self, target: &str) -> Option<SignalTarget<'_>> {
        if let Some(resolved) = resolve_in(&self.root, target) {
            return match resolved {
                Resolved::Node(node) if matches!(node.kind, NodeKind::Body(_)) => {
                    Some(SignalTarget::Body(node))
                }
                Resolved::Node(_) => None,
                Resolved::Connector(connector) => Some(SignalTarget::MainInteraction(connector)),
            };
        }
        let (prefix, last) = target.rsplit_once('.')?;
        match resolve_in(&self.root, prefix)? {
            Resolved::Connector(connector) => connector
                .interactions
                .iter()
                .find(|i| i.name == last)
                .map(|i| SignalTarget::Interaction(connector, i)),
            Resolved::Node(_) => None,
        }
    }
}

/// Walk `path` below `root`: every segment but the last names a child node,
/// the last names a child node or an owned connector.
pub(crate) fn resolve_in<'a>(root: &'a Node, path: &str) -> Option<Resolved<'a>> {
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            if let Some(child) = current.children.iter().find(|c| c.name == segment) {
                return Some(Resolved::Node(child));
            }
            return current
                .connectors
                .iter()
                .chain(current.multi_connectors.iter().flat_map(|m| m.expanded.iter()))
                .find(|c| c.name == segment)
                .map(Resolved::Connector);
        }
        current = current.children.iter().find(|c| c.name == segment)?;
    }
    None
}
