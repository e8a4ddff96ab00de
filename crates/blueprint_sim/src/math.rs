//! Isometry math for frames and world poses

use std::ops::Mul;

use glam::{DQuat, DVec3};

/// Rigid transform: a rotation followed by a translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isometry {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl Isometry {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    pub fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            rotation: DQuat::IDENTITY,
        }
    }

    pub fn from_rotation(rotation: DQuat) -> Self {
        Self {
            position: DVec3::ZERO,
            rotation,
        }
    }

    /// Apply this transform to a point.
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.position
    }

    /// Apply only the rotational part to a direction.
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.rotation * vector
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            position: rotation * -self.position,
            rotation,
        }
    }
}

impl Default for Isometry {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Isometry {
    type Output = Isometry;

    /// Compose: `self * rhs` applies `rhs` first, then `self`.
    fn mul(self, rhs: Isometry) -> Isometry {
        Isometry {
            position: self.transform_point(rhs.position),
            rotation: self.rotation * rhs.rotation,
        }
    }
}
