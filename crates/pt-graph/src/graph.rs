//! Core graph data structures.

use std::collections::BTreeMap;

use pt_core::{InstanceId, PortRef};
use pt_registry::{Category, ComponentType, PortSpec, Position};
use pt_schema::OptionValue;
use serde::{Deserialize, Serialize};

use crate::indexing::IndexMap;

/// A component instance with its materialized ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub id: InstanceId,
    pub component_type: ComponentType,
    pub category: Category,
    /// Position exactly as written in the document.
    pub position: Option<String>,
    /// Parsed mounting position; set for propulsors only.
    pub mounting: Option<Position>,
    pub options: BTreeMap<String, OptionValue>,
    pub ports: Vec<PortSpec>,
}

impl Instance {
    pub fn type_tag(&self) -> &'static str {
        self.component_type.tag()
    }

    pub fn port(&self, name: &str) -> Option<&PortSpec> {
        self.ports.iter().find(|p| p.name == name)
    }
}

/// A directed link from a supplier's output port to a consumer's input port.
///
/// Ordering is `(from, to)`, which is also the order edges are stored in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from: PortRef,
    pub to: PortRef,
}

impl Connection {
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// The graph: a validated, immutable set of instances and connections.
///
/// Only [`crate::GraphBuilder`] produces one. Instances keep document order,
/// connections are sorted, so two builds of one document compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub(crate) name: String,
    pub(crate) instances: Vec<Instance>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) control_parameters: Vec<String>,
    pub(crate) index: IndexMap,
}

impl Graph {
    /// Architecture name from the source document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All instances, in document order.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// All connections, sorted.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Declared control-parameter names.
    pub fn control_parameters(&self) -> &[String] {
        &self.control_parameters
    }

    /// Contiguous index of every instance.
    pub fn index(&self) -> &IndexMap {
        &self.index
    }

    /// Get an instance by ID.
    pub fn instance(&self, id: &InstanceId) -> Option<&Instance> {
        self.index.get(id).map(|i| &self.instances[i])
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.index.get(id).is_some()
    }

    /// Port declaration behind a port reference.
    pub fn port(&self, port: &PortRef) -> Option<&PortSpec> {
        self.instance(&port.instance)?.port(&port.port)
    }

    /// Connections leaving an instance.
    pub fn outgoing<'a>(&'a self, id: &'a InstanceId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.from.instance == id)
    }

    /// Connections arriving at an instance.
    pub fn incoming<'a>(&'a self, id: &'a InstanceId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.to.instance == id)
    }

    /// Every port of every instance, in instance then port order.
    pub fn port_refs(&self) -> impl Iterator<Item = (PortRef, &PortSpec)> + '_ {
        self.instances.iter().flat_map(|inst| {
            inst.ports
                .iter()
                .map(move |p| (PortRef::new(inst.id.clone(), p.name.clone()), p))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connections_order_by_source_then_target() {
        let a = Connection::new(PortRef::new("a", "out"), PortRef::new("z", "in"));
        let b = Connection::new(PortRef::new("b", "out"), PortRef::new("c", "in"));
        let c = Connection::new(PortRef::new("a", "out"), PortRef::new("b", "in"));
        let mut v = vec![a.clone(), b.clone(), c.clone()];
        v.sort();
        assert_eq!(v, [c, a, b]);
    }

    #[test]
    fn connection_display() {
        let c = Connection::new(
            PortRef::new("battery_pack_1", "dc_out"),
            PortRef::new("dc_bus_1", "input_1"),
        );
        assert_eq!(c.to_string(), "battery_pack_1.dc_out -> dc_bus_1.input_1");
    }
}
