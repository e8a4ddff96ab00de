//! Graph walker: one declarative tree into engine objects
//!
//! The walk is a pre-order traversal. Nodes become bodies, shapes and
//! visuals at their composed world poses; attachments only record where
//! they sit and which body encloses them. Connectors are queued during
//! the walk and resolved afterwards, once every attachment is known.
//! Any failure destroys everything the import created, materials
//! included, so a failed import never leaves a partial scene behind.

use std::collections::HashMap;

use glam::{DQuat, DVec3};

use blueprint_model::graph::{
    BodyDef, Component, Connector, GeometryDef, GeometryShape, MotionControl, Node, NodeId,
    NodeKind, VisualDef, VisualShape,
};
use blueprint_model::ModelError;
use blueprint_sim::body::{BodyDesc, BodyHandle, MotionKind};
use blueprint_sim::constraint::ConstraintHandle;
use blueprint_sim::convert::{convert_isometry, convert_vector};
use blueprint_sim::error::SimError;
use blueprint_sim::math::Isometry;
use blueprint_sim::shape::{ShapeDesc, ShapeHandle, ShapeKind};
use blueprint_sim::visual::{VisualDesc, VisualHandle, VisualKind};
use blueprint_sim::world::SimWorld;

use crate::error::Result;
use crate::materials::MaterialCatalog;
use crate::scene::{Scene, SceneObject, SceneTarget};

/// Everything one import produced: the scene record and the material
/// catalog backing it.
#[derive(Debug)]
pub struct ImportedScene {
    pub scene: Scene,
    pub materials: MaterialCatalog,
}

/// Build the whole component in the world.
///
/// Materials first, then the tree walk, then the queued connectors.
/// On any error the world is restored to its prior object counts and
/// the error is returned.
pub fn import_component(component: &Component, world: &mut SimWorld) -> Result<ImportedScene> {
    let materials = MaterialCatalog::build(component, world)?;
    let mut importer = Importer {
        component,
        materials,
        scene: Scene::default(),
        body_map: HashMap::new(),
        attachment_map: HashMap::new(),
        explicit: Vec::new(),
        implicit: Vec::new(),
        created: Vec::new(),
    };
    match importer.run(world) {
        Ok(()) => Ok(ImportedScene {
            scene: importer.scene,
            materials: importer.materials,
        }),
        Err(err) => {
            log::error!("import failed, rolling the scene back: {err}");
            importer.rollback(world);
            Err(err)
        }
    }
}

/// Where an attachment ended up: its engine-side world pose and the
/// declarative body that owns it, if any.
pub(crate) struct AttachmentAnchor {
    pub(crate) pose: Isometry,
    pub(crate) body: Option<NodeId>,
}

/// A connector waiting for the walk to finish.
pub(crate) struct QueuedConnector<'a> {
    pub(crate) parent_path: String,
    pub(crate) connector: &'a Connector,
}

pub(crate) enum CreatedObject {
    Body(BodyHandle),
    Shape(ShapeHandle),
    Visual(VisualHandle),
    Constraint(ConstraintHandle),
}

pub(crate) struct Importer<'a> {
    pub(crate) component: &'a Component,
    pub(crate) materials: MaterialCatalog,
    pub(crate) scene: Scene,
    pub(crate) body_map: HashMap<NodeId, BodyHandle>,
    pub(crate) attachment_map: HashMap<NodeId, AttachmentAnchor>,
    /// Connectors authored in the model, resolved first
    pub(crate) explicit: Vec<QueuedConnector<'a>>,
    /// Expanded sub-connectors of multi connectors, resolved second
    pub(crate) implicit: Vec<QueuedConnector<'a>>,
    pub(crate) created: Vec<CreatedObject>,
}

impl<'a> Importer<'a> {
    fn run(&mut self, world: &mut SimWorld) -> Result<()> {
        let root = self.component.root();
        self.walk_node(world, root, None, Isometry::IDENTITY, None)?;
        self.resolve_queues(world)
    }

    fn rollback(&mut self, world: &mut SimWorld) {
        for created in self.created.drain(..).rev() {
            match created {
                CreatedObject::Body(handle) => {
                    world.destroy_body(handle);
                }
                CreatedObject::Shape(handle) => {
                    world.destroy_shape(handle);
                }
                CreatedObject::Visual(handle) => {
                    world.destroy_visual(handle);
                }
                CreatedObject::Constraint(handle) => {
                    world.destroy_constraint(handle);
                }
            }
        }
        self.materials.destroy_all(world);
    }

    fn walk_node(
        &mut self,
        world: &mut SimWorld,
        node: &'a Node,
        parent_path: Option<&str>,
        parent_pose: Isometry,
        enclosing_body: Option<BodyHandle>,
    ) -> Result<()> {
        let path = match parent_path {
            None => node.name.clone(),
            Some(parent) => format!("{parent}.{}", node.name),
        };
        let local = convert_isometry(Isometry::new(node.position, node.rotation));
        let world_pose = parent_pose * local;

        let (target, body_below) = match &node.kind {
            NodeKind::Group => (SceneTarget::Group, enclosing_body),
            NodeKind::Body(def) => {
                let handle = self.create_body(world, node, def, world_pose);
                (SceneTarget::Body(handle), Some(handle))
            }
            NodeKind::Geometry(def) => {
                let handle = self.create_shape(world, node, def, world_pose, enclosing_body)?;
                (SceneTarget::Shape(handle), enclosing_body)
            }
            NodeKind::Attachment(def) => {
                self.attachment_map.insert(
                    node.id,
                    AttachmentAnchor {
                        pose: world_pose,
                        body: def.body,
                    },
                );
                (SceneTarget::Group, enclosing_body)
            }
            NodeKind::Visual(def) => {
                let handle = self.create_visual(world, node, def, world_pose, enclosing_body)?;
                (SceneTarget::Visual(handle), enclosing_body)
            }
        };

        self.scene.push(SceneObject {
            path: path.clone(),
            type_tag: node.kind.type_tag().to_string(),
            synchronize: true,
            target,
        });

        for connector in &node.connectors {
            self.explicit.push(QueuedConnector {
                parent_path: path.clone(),
                connector,
            });
        }
        for multi in &node.multi_connectors {
            for connector in &multi.expanded {
                self.implicit.push(QueuedConnector {
                    parent_path: path.clone(),
                    connector,
                });
            }
        }

        for child in &node.children {
            self.walk_node(world, child, Some(&path), world_pose, body_below)?;
        }
        Ok(())
    }

    fn create_body(
        &mut self,
        world: &mut SimWorld,
        node: &Node,
        def: &BodyDef,
        world_pose: Isometry,
    ) -> BodyHandle {
        let motion = match def.motion_control {
            MotionControl::Dynamics => MotionKind::Dynamic,
            MotionControl::Statics => MotionKind::Static,
            MotionControl::Kinematics => MotionKind::Kinematic,
        };
        let handle = world.create_body(
            BodyDesc::new(node.name.clone())
                .with_pose(world_pose)
                .with_motion(motion),
        );
        if let Some(body) = world.body_mut(handle) {
            if let Some(mass) = def.mass {
                body.mass_properties.mass.set(mass);
            }
            if let Some(inertia) = def.inertia_diagonal {
                // Diagonal is axis-magnitudes only; no handedness flip.
                body.mass_properties.inertia_diagonal.set(inertia);
            }
            if let Some(center) = def.center_of_mass {
                body.mass_properties.center_of_mass.set(convert_vector(center));
            }
        }
        self.body_map.insert(node.id, handle);
        self.created.push(CreatedObject::Body(handle));
        handle
    }

    fn create_shape(
        &mut self,
        world: &mut SimWorld,
        node: &Node,
        def: &GeometryDef,
        world_pose: Isometry,
        body: Option<BodyHandle>,
    ) -> Result<ShapeHandle> {
        let (kind, shape_world) = match &def.shape {
            GeometryShape::Box { lengths } => (
                ShapeKind::Box {
                    half_extents: *lengths * 0.5,
                },
                world_pose,
            ),
            GeometryShape::Sphere { radius } => (ShapeKind::Sphere { radius: *radius }, world_pose),
            GeometryShape::Cylinder { radius, length } => (
                ShapeKind::Cylinder {
                    radius: *radius,
                    height: *length,
                },
                world_pose,
            ),
            GeometryShape::Plane { a, b, c, d } => {
                (ShapeKind::Plane, world_pose * plane_pose(*a, *b, *c, *d))
            }
            GeometryShape::Trimesh { source } => {
                let slot = self.component.mesh(node.id).ok_or_else(|| {
                    ModelError::MeshLoad {
                        source_path: source.clone(),
                        reason: "no payload was scheduled for this geometry".to_string(),
                    }
                })?;
                let mesh = slot.wait()?;
                (
                    ShapeKind::TriMesh {
                        vertices: mesh.vertices.iter().map(|&v| convert_vector(v)).collect(),
                        indices: mesh.indices.clone(),
                    },
                    world_pose,
                )
            }
        };

        let local_pose = self.rebase(world, shape_world, body)?;
        let mut desc = ShapeDesc::new(node.name.clone(), kind)
            .with_local_pose(local_pose)
            .with_collisions_enabled(def.collisions_enabled);
        if let Some(body) = body {
            desc = desc.with_body(body);
        }
        if let Some(name) = &def.material {
            if let Some(material) = self.materials.material(name) {
                desc = desc.with_material(material);
            }
        }
        let handle = world.create_shape(desc)?;
        self.created.push(CreatedObject::Shape(handle));
        Ok(handle)
    }

    fn create_visual(
        &mut self,
        world: &mut SimWorld,
        node: &Node,
        def: &VisualDef,
        world_pose: Isometry,
        body: Option<BodyHandle>,
    ) -> Result<VisualHandle> {
        let kind = match &def.shape {
            VisualShape::Box { lengths } => VisualKind::Box {
                half_extents: *lengths * 0.5,
            },
            VisualShape::Sphere { radius } => VisualKind::Sphere { radius: *radius },
            VisualShape::Cylinder { radius, length } => VisualKind::Cylinder {
                radius: *radius,
                height: *length,
            },
            VisualShape::File { source } => VisualKind::Mesh {
                source: source.clone(),
            },
        };
        let local_pose = self.rebase(world, world_pose, body)?;
        let mut desc = VisualDesc::new(node.name.clone(), kind).with_local_pose(local_pose);
        if let Some(body) = body {
            desc = desc.with_body(body);
        }
        if let Some(color) = def.color {
            desc = desc.with_color(color);
        }
        let handle = world.create_visual(desc)?;
        self.created.push(CreatedObject::Visual(handle));
        Ok(handle)
    }

    /// World pose into the owning body's frame; world-fixed objects keep
    /// their world pose.
    fn rebase(
        &self,
        world: &SimWorld,
        pose: Isometry,
        body: Option<BodyHandle>,
    ) -> Result<Isometry> {
        match body {
            Some(handle) => {
                let body_pose = world.body(handle).ok_or(SimError::BodyNotFound(handle))?.pose;
                Ok(body_pose.inverse() * pose)
            }
            None => Ok(pose),
        }
    }
}

/// Pose of a plane shape from its equation, relative to the geometry
/// node: the engine plane's +Z normal is rotated onto the (converted)
/// equation normal, offset to a point on the plane.
fn plane_pose(a: f64, b: f64, c: f64, d: f64) -> Isometry {
    let normal = convert_vector(DVec3::new(a, b, c));
    let length = normal.length();
    let unit = normal / length;
    Isometry::new(
        unit * (-d / length),
        DQuat::from_rotation_arc(DVec3::Z, unit),
    )
}
