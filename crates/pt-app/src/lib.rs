//! Shared application service layer for the power-train configurator.
//!
//! Loads architecture documents through a file-identity cache and exposes the
//! planning, partitioning and renaming operations to the CLI.

pub mod cache;
pub mod config;
pub mod error;
pub mod session;

pub use cache::{CacheStats, FileIdentity, GraphCache, MemoryCache, NoCache};
pub use config::load_plan_options;
pub use error::{AppError, AppResult};
pub use session::{Configurator, GraphSummary};
