//! pt-plan: evaluation order, naming and slipstream wiring for a built graph.
//!
//! Provides:
//! - Sizing order (Kahn) and performance stages with cycle groups (Tarjan)
//! - The promotion table of global port names and phase variants of control parameters
//! - Propulsor-to-aerodynamic-delta slipstream links
//! - [`AssemblyPlan`], bundling all of the above for the model builder

pub mod error;
pub mod naming;
pub mod order;
pub mod plan;
pub mod slipstream;

pub use error::{PlanError, PlanResult};
pub use naming::{
    DEFAULT_PREFIX, NamingOptions, PromotionTable, build_promotion_table, phase_variant,
    rename_control_parameters,
};
pub use order::{EvaluationPlan, Stage, performance_stages, resolve_performance, resolve_sizing};
pub use plan::{AssemblyPlan, PlanOptions, PlannedConnection, PlannedInstance};
pub use slipstream::{SlipstreamLink, resolve_slipstream_links};
