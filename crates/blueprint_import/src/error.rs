//! Error types for the import pipeline

use blueprint_model::ModelError;
use blueprint_sim::SimError;
use thiserror::Error;

/// Import pipeline errors. Any of these aborts the import; the entry
/// point destroys everything it created before returning.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A connector names an attachment the walker never visited
    #[error("Connector {0:?} references unregistered attachment {1:?}")]
    UnresolvedAttachment(String, String),

    /// The reference side of a connector has no body behind it
    #[error("Connector {0:?} needs a body behind attachment {1:?}")]
    UnresolvedBody(String, String),

    /// Connector subtype this importer does not recognize
    #[error("Connector {0:?} has an unrecognized kind")]
    UnknownConnectorKind(String),

    /// A contact material pairs a shape material that was never declared
    #[error("Contact material {0:?} references unknown material {1:?}")]
    UnknownMaterial(String, String),

    /// Failure surfaced from the model layer
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Failure surfaced from the engine
    #[error("Engine error: {0}")]
    Sim(#[from] SimError),
}

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;
