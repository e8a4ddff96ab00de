//! Error types for the simulation world

use thiserror::Error;

/// Simulation world errors
#[derive(Debug, Error)]
pub enum SimError {
    /// Rigid body not found
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(crate::body::BodyHandle),

    /// Constraint not found
    #[error("Constraint not found: {0:?}")]
    ConstraintNotFound(crate::constraint::ConstraintHandle),

    /// Material not found
    #[error("Material not found: {0:?}")]
    MaterialNotFound(crate::material::MaterialHandle),
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
