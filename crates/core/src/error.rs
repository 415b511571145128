//! Typed errors for node algorithms.
//!
//! [`NodeError`] covers the failure kinds of the node algorithms and wraps
//! [`PathError`] so path parsing can be chained with `?`.

use nxquery_path::PathError;
use thiserror::Error;

use crate::node::NodeKind;

pub type Result<T, E = NodeError> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A precondition on a non-path argument was violated.
    #[error("invalid argument: {0}")]
    Value(String),

    /// The operation is not defined for this node kind.
    #[error("{operation} is not supported on {kind} nodes")]
    Type { operation: &'static str, kind: NodeKind },

    /// No child or attribute matched the request.
    #[error("{parent} has no member matching {key:?}")]
    Key { parent: String, key: String },

    /// The handle no longer refers to a live object in the container.
    #[error("invalid object: {0}")]
    InvalidObject(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl NodeError {
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    pub fn unsupported(operation: &'static str, kind: NodeKind) -> Self {
        Self::Type { operation, kind }
    }

    pub fn key(parent: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Key { parent: parent.into(), key: key.into() }
    }

    pub fn invalid(context: impl Into<String>) -> Self {
        Self::InvalidObject(context.into())
    }
}
