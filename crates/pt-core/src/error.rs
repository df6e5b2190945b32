use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: &'static str },

    #[error("Unknown phase '{name}'")]
    UnknownPhase { name: String },

    #[error("Malformed port reference '{value}' (expected 'instance' or 'instance.port')")]
    MalformedPortRef { value: String },
}
