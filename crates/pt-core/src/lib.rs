//! pt-core: stable foundation for the power-train configurator.
//!
//! Contains:
//! - ids (instance identifiers and port references shared by every crate)
//! - phase (flight phases and their operating-context markers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod phase;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use phase::Phase;
