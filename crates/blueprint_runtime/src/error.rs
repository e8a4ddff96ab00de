//! Runtime error types

use blueprint_model::error::ModelError;
use blueprint_model::signals::SignalLayout;
use thiserror::Error;

/// Errors surfaced by a runtime session
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The session bound no input signal with this name
    #[error("No input signal named {0:?} is bound")]
    UnknownInput(String),
    /// The session bound no output signal with this name
    #[error("No output signal named {0:?} is bound")]
    UnknownOutput(String),
    /// A raised value does not match the input's declared layout
    #[error("Input {name:?} expects a {expected:?} value, got {got:?}")]
    SignalShape {
        name: String,
        expected: SignalLayout,
        got: SignalLayout,
    },
    /// Failure surfaced from the model layer
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
