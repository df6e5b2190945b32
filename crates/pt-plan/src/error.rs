//! Planning error types.

use pt_core::InstanceId;
use thiserror::Error;

pub type PlanResult<T> = Result<T, PlanError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Illegal cycle through {}", join(.members))]
    IllegalCycle { members: Vec<InstanceId> },

    #[error("Inconsistent evaluation hint: {reason}")]
    InconsistentHint { reason: String },

    #[error("Naming collision: '{first}' and '{second}' both map to '{output}'")]
    NamingCollision {
        output: String,
        first: String,
        second: String,
    },

    #[error("Propulsor '{propulsor}' has no output for slipstream input {consumer}")]
    MissingSlipstreamSource {
        propulsor: InstanceId,
        consumer: String,
    },
}

fn join(ids: &[InstanceId]) -> String {
    ids.iter()
        .map(InstanceId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
