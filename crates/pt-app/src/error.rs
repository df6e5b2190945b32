//! Error types for the pt-app service layer.

use std::path::PathBuf;

/// Application error wrapping the library crates' errors for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Schema(#[from] pt_schema::SchemaError),

    #[error(transparent)]
    Graph(#[from] pt_graph::GraphError),

    #[error(transparent)]
    Plan(#[from] pt_plan::PlanError),

    #[error("Failed to access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to render output: {0}")]
    Render(String),
}

/// Result type for pt-app operations.
pub type AppResult<T> = Result<T, AppError>;
