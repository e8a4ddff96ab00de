//! Handedness conversion at the model/engine boundary
//!
//! The declarative model and the engine disagree about the direction of
//! the first axis. Crossing the boundary negates a vector's first
//! component, and negates a quaternion's first and scalar components.
//! Both conversions are involutions, so the same functions serve both
//! directions.

use glam::{DQuat, DVec3};

use crate::math::Isometry;

/// Convert a vector across the handedness boundary.
#[inline]
pub fn convert_vector(v: DVec3) -> DVec3 {
    DVec3::new(-v.x, v.y, v.z)
}

/// Convert a rotation across the handedness boundary.
#[inline]
pub fn convert_quat(q: DQuat) -> DQuat {
    DQuat::from_xyzw(-q.x, q.y, q.z, -q.w)
}

/// Convert a full pose: vector rule on the position, quaternion rule on
/// the rotation.
#[inline]
pub fn convert_isometry(iso: Isometry) -> Isometry {
    Isometry::new(convert_vector(iso.position), convert_quat(iso.rotation))
}
