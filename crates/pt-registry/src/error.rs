use thiserror::Error;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown component type '{tag}'")]
    UnknownComponentType { tag: String },

    #[error("Invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },
}
