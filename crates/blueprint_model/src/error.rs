//! Error types for model loading and validation

use std::path::PathBuf;

use thiserror::Error;

/// Model loading and validation errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Source file could not be read
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file is not valid JSON or does not match the model schema
    #[error("failed to parse model file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Source file could not be located in any module path
    #[error("model file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The requested model is not declared in the source file
    #[error("model {name:?} not found in {path}")]
    ModelNotFound { name: String, path: PathBuf },

    /// A node or connector name that cannot form a path segment
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Two siblings under the same parent share a name
    #[error("duplicate name {name:?} under {parent:?}")]
    DuplicateName { name: String, parent: String },

    /// A connector references a path that does not resolve to an attachment
    #[error("connector {connector:?} references {path:?} which is not a known attachment")]
    UnresolvedReference { connector: String, path: String },

    /// An authored physical value outside its valid range
    #[error("invalid value for {what}: {value}")]
    InvalidValue { what: String, value: f64 },

    /// The authored tree violates a structural rule
    #[error("structural error at {path:?}: {reason}")]
    Structure { path: String, reason: String },

    /// A trimesh payload failed to load
    #[error("failed to load mesh {source_path}: {reason}")]
    MeshLoad { source_path: String, reason: String },

    /// A signal value was encoded or decoded with the wrong field count
    #[error("signal value has wrong wire width: expected {expected}, got {got}")]
    WireShape { expected: usize, got: usize },
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
