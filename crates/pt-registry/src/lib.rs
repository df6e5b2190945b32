//! pt-registry: component type registry for power-train architectures.
//!
//! Provides:
//! - The closed set of component types and their document tags
//! - Per-type category, ports and artifact names
//! - Propulsor mounting positions and the aerodynamic-delta inputs they feed
//!
//! # Example
//!
//! ```
//! use pt_registry::{Category, Registry};
//!
//! let registry = Registry::standard();
//! let bus = registry.lookup("DC_bus").unwrap();
//! assert_eq!(bus.category, Category::Connector);
//! assert!(registry.lookup("dc_bus").is_err());
//! ```

pub mod aero;
pub mod category;
pub mod descriptor;
pub mod error;
pub mod port;
pub mod registry;

pub use aero::{ConsumerInput, Position, Surface};
pub use category::{ArtifactKind, Category};
pub use descriptor::{Artifacts, ComponentType, MAX_BUS_PORTS, TypeDescriptor};
pub use error::{RegistryError, RegistryResult};
pub use port::{Direction, PortKind, PortSpec, SlipstreamTag};
pub use registry::Registry;
