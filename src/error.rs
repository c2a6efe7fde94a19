//! Error types for the network library
//!
//! Every contract violation in the numeric kernel is a programming error, so
//! operations check their preconditions up front and fail before touching any
//! layer state.

use crate::network::LayerId;
use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Which backpropagation variant a layer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    /// Pulls error from a downstream sink.
    Hidden,
    /// Computes error from a target vector.
    Output,
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleKind::Hidden => write!(f, "hidden"),
            RoleKind::Output => write!(f, "output"),
        }
    }
}

/// Main error type for the library
#[derive(Error, Debug)]
pub enum NetworkError {
    /// A vector or matrix does not have the length the operation requires
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Feedforward or backpropagation before a source was attached
    #[error("Layer {0} has no source attached")]
    SourceNotSet(LayerId),

    /// Hidden backpropagation before a sink was attached
    #[error("Hidden layer {0} has no sink attached")]
    SinkNotSet(LayerId),

    /// Handle does not name a layer of this network
    #[error("Unknown layer {0}")]
    UnknownLayer(LayerId),

    /// Source or sink wiring would break the strict chain
    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    /// Backpropagation variant does not match the layer's role
    #[error("Layer {layer} does not have the {expected} role")]
    WrongRole { layer: LayerId, expected: RoleKind },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        NetworkError::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }
}
