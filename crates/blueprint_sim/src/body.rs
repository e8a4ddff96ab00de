//! Rigid bodies

use glam::DVec3;

use crate::math::Isometry;
use crate::store::StoreKey;

/// Handle to a rigid body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) StoreKey<RigidBody>);

/// How a body participates in the solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionKind {
    /// Fully simulated
    #[default]
    Dynamic,
    /// Never moves
    Static,
    /// Moved by its velocities, unaffected by forces
    Kinematic,
}

/// Value with an engine-computed default and an optional user override
#[derive(Debug, Clone, Copy)]
pub struct UserValue<T> {
    computed: T,
    user: Option<T>,
}

impl<T: Copy> UserValue<T> {
    pub fn new(computed: T) -> Self {
        Self {
            computed,
            user: None,
        }
    }

    /// Effective value: the override if set, otherwise the computed one.
    pub fn get(&self) -> T {
        self.user.unwrap_or(self.computed)
    }

    /// Set a user override.
    pub fn set(&mut self, value: T) {
        self.user = Some(value);
    }

    /// Drop the override and fall back to the computed value.
    pub fn clear(&mut self) {
        self.user = None;
    }

    pub fn is_user_set(&self) -> bool {
        self.user.is_some()
    }

    /// Replace the computed value without touching an override.
    pub fn set_computed(&mut self, value: T) {
        self.computed = value;
    }
}

/// Mass properties with engine-computed defaults
#[derive(Debug, Clone, Copy)]
pub struct MassProperties {
    pub mass: UserValue<f64>,
    pub inertia_diagonal: UserValue<DVec3>,
    pub center_of_mass: UserValue<DVec3>,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: UserValue::new(1.0),
            inertia_diagonal: UserValue::new(DVec3::ONE),
            center_of_mass: UserValue::new(DVec3::ZERO),
        }
    }
}

/// A rigid body
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub name: String,
    /// World pose
    pub pose: Isometry,
    pub motion: MotionKind,
    /// Linear velocity, world frame
    pub velocity: DVec3,
    /// Angular velocity, world frame
    pub angular_velocity: DVec3,
    pub mass_properties: MassProperties,
}

/// Description for creating a rigid body
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub name: String,
    pub pose: Isometry,
    pub motion: MotionKind,
    pub velocity: DVec3,
    pub angular_velocity: DVec3,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            name: String::new(),
            pose: Isometry::IDENTITY,
            motion: MotionKind::Dynamic,
            velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
        }
    }
}

impl BodyDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_pose(mut self, pose: Isometry) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_motion(mut self, motion: MotionKind) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: DVec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }
}

impl RigidBody {
    pub(crate) fn from_desc(desc: BodyDesc) -> Self {
        Self {
            name: desc.name,
            pose: desc.pose,
            motion: desc.motion,
            velocity: desc.velocity,
            angular_velocity: desc.angular_velocity,
            mass_properties: MassProperties::default(),
        }
    }
}
