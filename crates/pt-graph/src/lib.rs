//! pt-graph: validated component graph for power-train architectures.
//!
//! Provides:
//! - Graph construction from a parsed document, with bus memberships expanded
//! - Port arity, direction and kind validation
//! - Partitioning into independent branches and branch extraction
//!
//! # Example
//!
//! ```
//! use pt_graph::{build, partition};
//! use pt_registry::Registry;
//! use pt_schema::{ArchitectureDoc, ComponentDef, ConnectionDef};
//!
//! let mut doc = ArchitectureDoc::new("demo");
//! doc.components.push(ComponentDef::new("tank", "fuel_tank"));
//! doc.components.push(ComponentDef::new("engine", "ICE"));
//! doc.components.push(ComponentDef::new("prop", "propeller"));
//! doc.connections.push(ConnectionDef::new("tank", "fuel_out", "engine", "fuel_in"));
//! doc.connections.push(ConnectionDef::new("engine", "shaft_out", "prop", "shaft_in"));
//!
//! let graph = build(&doc, &Registry::standard()).unwrap();
//! assert_eq!(graph.connections().len(), 2);
//! assert_eq!(partition(&graph).len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub mod partition;
pub mod reduce;
pub(crate) mod validate;

pub use builder::{GraphBuilder, build};
pub use error::{GraphError, GraphResult};
pub use graph::{Connection, Graph, Instance};
pub use indexing::IndexMap;
pub use partition::{Branch, extract_single_branch, partition};
pub use reduce::reduced_document;
