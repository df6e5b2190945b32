//! Graph-specific error types.

use pt_core::InstanceId;
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Structural validation failures. A failed build never yields a partial graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown component type '{tag}' for instance '{instance}'")]
    UnknownComponentType { instance: InstanceId, tag: String },

    #[error("Duplicate instance id '{id}'")]
    DuplicateId { id: InstanceId },

    #[error("Unresolved connection {connection}: {reason}")]
    UnresolvedConnection { connection: String, reason: String },

    #[error("Arity mismatch on {instance}.{port}: expected {expected} connection(s), found {actual}")]
    ArityMismatch {
        instance: InstanceId,
        port: String,
        expected: String,
        actual: usize,
    },

    #[error("Invalid option '{option}' on '{instance}': {reason}")]
    InvalidOption {
        instance: InstanceId,
        option: String,
        reason: String,
    },

    #[error("Unknown instance '{id}'")]
    UnknownInstance { id: InstanceId },
}
