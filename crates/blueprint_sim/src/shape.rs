//! Collision shapes

use glam::DVec3;

use crate::body::BodyHandle;
use crate::material::MaterialHandle;
use crate::math::Isometry;
use crate::store::StoreKey;

/// Handle to a collision shape in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub(crate) StoreKey<Shape>);

/// Collision shape geometry
#[derive(Debug, Clone)]
pub enum ShapeKind {
    Box { half_extents: DVec3 },
    Sphere { radius: f64 },
    Cylinder { radius: f64, height: f64 },
    /// Half-space; the surface passes through the pose origin with the
    /// local +Z axis as outward normal
    Plane,
    TriMesh {
        vertices: Vec<DVec3>,
        indices: Vec<[u32; 3]>,
    },
}

/// A collision shape instance
#[derive(Debug, Clone)]
pub struct Shape {
    pub name: String,
    pub kind: ShapeKind,
    /// Owning body; detached shapes are static
    pub body: Option<BodyHandle>,
    /// Offset in the owning body's frame, or a world pose when detached
    pub local_pose: Isometry,
    pub material: Option<MaterialHandle>,
    pub collisions_enabled: bool,
}

/// Description for creating a collision shape
#[derive(Debug, Clone)]
pub struct ShapeDesc {
    pub name: String,
    pub kind: ShapeKind,
    pub body: Option<BodyHandle>,
    pub local_pose: Isometry,
    pub material: Option<MaterialHandle>,
    pub collisions_enabled: bool,
}

impl Default for ShapeDesc {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ShapeKind::Sphere { radius: 0.5 },
            body: None,
            local_pose: Isometry::IDENTITY,
            material: None,
            collisions_enabled: true,
        }
    }
}

impl ShapeDesc {
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: BodyHandle) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_local_pose(mut self, local_pose: Isometry) -> Self {
        self.local_pose = local_pose;
        self
    }

    pub fn with_material(mut self, material: MaterialHandle) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_collisions_enabled(mut self, enabled: bool) -> Self {
        self.collisions_enabled = enabled;
        self
    }
}

impl Shape {
    pub(crate) fn from_desc(desc: ShapeDesc) -> Self {
        Self {
            name: desc.name,
            kind: desc.kind,
            body: desc.body,
            local_pose: desc.local_pose,
            material: desc.material,
            collisions_enabled: desc.collisions_enabled,
        }
    }
}
