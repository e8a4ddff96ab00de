//! Visual instances
//!
//! Purpose-built records for authored visual shapes. The engine carries
//! them alongside the physical objects but does no rendering; a host
//! renderer reads them out.

use glam::DVec3;

use crate::body::BodyHandle;
use crate::math::Isometry;
use crate::store::StoreKey;

/// Handle to a visual instance in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub(crate) StoreKey<Visual>);

/// Visual geometry
#[derive(Debug, Clone)]
pub enum VisualKind {
    Box { half_extents: DVec3 },
    Sphere { radius: f64 },
    Cylinder { radius: f64, height: f64 },
    /// External render mesh, referenced by source path
    Mesh { source: String },
}

/// A visual instance
#[derive(Debug, Clone)]
pub struct Visual {
    pub name: String,
    pub kind: VisualKind,
    pub body: Option<BodyHandle>,
    pub local_pose: Isometry,
    /// RGB in [0, 1]
    pub color: DVec3,
}

/// Description for creating a visual instance
#[derive(Debug, Clone)]
pub struct VisualDesc {
    pub name: String,
    pub kind: VisualKind,
    pub body: Option<BodyHandle>,
    pub local_pose: Isometry,
    pub color: DVec3,
}

impl VisualDesc {
    pub fn new(name: impl Into<String>, kind: VisualKind) -> Self {
        Self {
            name: name.into(),
            kind,
            body: None,
            local_pose: Isometry::IDENTITY,
            color: DVec3::ONE,
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

    pub fn with_color(mut self, color: DVec3) -> Self {
        self.color = color;
        self
    }
}

impl Visual {
    pub(crate) fn from_desc(desc: VisualDesc) -> Self {
        Self {
            name: desc.name,
            kind: desc.kind,
            body: desc.body,
            local_pose: desc.local_pose,
            color: desc.color,
        }
    }
}
