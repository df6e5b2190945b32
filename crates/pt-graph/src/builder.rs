//! Graph construction from a parsed architecture document.

use std::collections::{HashMap, HashSet};

use pt_core::{InstanceId, PortRef};
use pt_registry::{
    Category, Direction, PortKind, PortSpec, Position, Registry, RegistryError, TypeDescriptor,
};
use pt_schema::{ArchitectureDoc, BusDef, ComponentDef, ConnectionDef, MemberRef};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Connection, Graph, Instance};
use crate::indexing::IndexMap;
use crate::validate;

/// Builder turning an [`ArchitectureDoc`] into a validated, immutable [`Graph`].
///
/// Steps, each failing the whole build:
/// 1. resolve every type tag through the registry
/// 2. reject duplicate instance ids
/// 3. materialize ports from the type descriptors
/// 4. fold explicit connections, then bus memberships, into the edge set
/// 5. check endpoints and per-port connection counts
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'r> {
    registry: &'r Registry,
}

impl<'r> GraphBuilder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Build and validate the graph.
    pub fn build(&self, doc: &ArchitectureDoc) -> GraphResult<Graph> {
        let descriptors = self.resolve_types(doc)?;
        check_unique_ids(doc)?;

        let instances = doc
            .components
            .iter()
            .zip(descriptors)
            .map(|(def, desc)| materialize(def, desc))
            .collect::<GraphResult<Vec<_>>>()?;
        let index = IndexMap::new(instances.iter().map(|inst| inst.id.clone()));

        let mut wiring = Wiring::new(&instances, &index);
        for connection in &doc.connections {
            wiring.connect_explicit(connection)?;
        }
        for bus in &doc.buses {
            wiring.connect_bus(bus)?;
        }
        let mut connections = wiring.connections;
        connections.sort();

        validate::validate_endpoints(&instances, &index, &connections)?;
        validate::validate_arity(&instances, &connections)?;

        tracing::info!(
            name = %doc.name,
            instances = instances.len(),
            connections = connections.len(),
            "built power-train graph"
        );

        Ok(Graph {
            name: doc.name.clone(),
            instances,
            connections,
            control_parameters: doc.control_parameters.clone(),
            index,
        })
    }

    fn resolve_types(&self, doc: &ArchitectureDoc) -> GraphResult<Vec<&'r TypeDescriptor>> {
        doc.components
            .iter()
            .map(|def| {
                self.registry
                    .lookup(&def.type_tag)
                    .map_err(|e| registry_error(&def.id, e))
            })
            .collect()
    }
}

/// Build a graph with a one-off builder.
pub fn build(doc: &ArchitectureDoc, registry: &Registry) -> GraphResult<Graph> {
    GraphBuilder::new(registry).build(doc)
}

fn registry_error(instance: &str, err: RegistryError) -> GraphError {
    match err {
        RegistryError::UnknownComponentType { tag } => GraphError::UnknownComponentType {
            instance: InstanceId::new(instance),
            tag,
        },
        RegistryError::InvalidOption { option, reason } => GraphError::InvalidOption {
            instance: InstanceId::new(instance),
            option,
            reason,
        },
    }
}

fn check_unique_ids(doc: &ArchitectureDoc) -> GraphResult<()> {
    let mut seen = HashSet::new();
    for def in &doc.components {
        if !seen.insert(def.id.as_str()) {
            return Err(GraphError::DuplicateId {
                id: InstanceId::new(def.id.as_str()),
            });
        }
    }
    Ok(())
}

fn materialize(def: &ComponentDef, desc: &TypeDescriptor) -> GraphResult<Instance> {
    let ports = desc
        .ports(&def.options)
        .map_err(|e| registry_error(&def.id, e))?;

    let mounting = if desc.category == Category::Propulsor {
        let position = match &def.position {
            Some(p) => p.parse::<Position>().map_err(|e| registry_error(&def.id, e))?,
            None => Position::DEFAULT,
        };
        Some(position)
    } else {
        if let Some(p) = &def.position {
            tracing::warn!(instance = %def.id, position = %p, "position ignored for non-propulsor");
        }
        None
    };

    Ok(Instance {
        id: InstanceId::new(def.id.as_str()),
        component_type: desc.component_type,
        category: desc.category,
        position: def.position.clone(),
        mounting,
        options: def.options.clone(),
        ports,
    })
}

/// Edge set under construction, with per-port connection counts.
struct Wiring<'a> {
    instances: &'a [Instance],
    index: &'a IndexMap,
    connections: Vec<Connection>,
    counts: HashMap<PortRef, usize>,
}

impl<'a> Wiring<'a> {
    fn new(instances: &'a [Instance], index: &'a IndexMap) -> Self {
        Self {
            instances,
            index,
            connections: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn instance(&self, id: &str, label: &str) -> GraphResult<&'a Instance> {
        let instances = self.instances;
        self.index
            .get(&InstanceId::new(id))
            .map(|i| &instances[i])
            .ok_or_else(|| unresolved(label, format!("unknown instance '{id}'")))
    }

    fn count(&self, instance: &Instance, port: &PortSpec) -> usize {
        self.counts
            .get(&PortRef::new(instance.id.clone(), port.name.as_str()))
            .copied()
            .unwrap_or(0)
    }

    /// Whether a port can take one more connection without breaking its arity.
    fn has_room(&self, instance: &Instance, port: &PortSpec) -> bool {
        let (_, max) = port.arity();
        max.is_none_or(|max| self.count(instance, port) < max)
    }

    fn port(
        &self,
        instance: &'a Instance,
        name: &str,
        direction: Direction,
        label: &str,
    ) -> GraphResult<&'a PortSpec> {
        let spec = instance.port(name).ok_or_else(|| {
            unresolved(
                label,
                format!(
                    "'{}' ({}) has no port '{}'",
                    instance.id,
                    instance.type_tag(),
                    name
                ),
            )
        })?;
        if spec.direction != direction {
            let expected = match direction {
                Direction::In => "an input",
                Direction::Out => "an output",
            };
            return Err(unresolved(
                label,
                format!("{}.{} is not {}", instance.id, name, expected),
            ));
        }
        Ok(spec)
    }

    fn push(&mut self, from: PortRef, to: PortRef) {
        *self.counts.entry(from.clone()).or_default() += 1;
        *self.counts.entry(to.clone()).or_default() += 1;
        tracing::debug!(from = %from, to = %to, "connected");
        self.connections.push(Connection::new(from, to));
    }

    fn connect_explicit(&mut self, def: &ConnectionDef) -> GraphResult<()> {
        let label = format!(
            "{}.{} -> {}.{}",
            def.from.instance, def.from.port, def.to.instance, def.to.port
        );
        let from_inst = self.instance(&def.from.instance, &label)?;
        let to_inst = self.instance(&def.to.instance, &label)?;
        let from = self.port(from_inst, &def.from.port, Direction::Out, &label)?;
        let to = self.port(to_inst, &def.to.port, Direction::In, &label)?;
        if from.kind != to.kind {
            return Err(unresolved(
                &label,
                format!("port kinds differ ({:?} vs {:?})", from.kind, to.kind),
            ));
        }
        self.push(
            PortRef::new(from_inst.id.clone(), from.name.as_str()),
            PortRef::new(to_inst.id.clone(), to.name.as_str()),
        );
        Ok(())
    }

    fn connect_bus(&mut self, def: &BusDef) -> GraphResult<()> {
        let bus_label = format!("bus '{}'", def.bus);
        let bus = self.instance(&def.bus, &bus_label)?;
        if !bus.ports.iter().any(|p| p.bus) {
            return Err(unresolved(
                &bus_label,
                format!("'{}' ({}) has no bus ports", bus.id, bus.type_tag()),
            ));
        }

        for member in &def.inputs {
            let label = format!("{} input '{}'", bus_label, member);
            let bus_port = self.free_bus_port(bus, Direction::In)?;
            let member_port = self.member_port(member, Direction::Out, bus_port.kind, &label)?;
            self.push(member_port, PortRef::new(bus.id.clone(), bus_port.name.as_str()));
        }
        for member in &def.outputs {
            let label = format!("{} output '{}'", bus_label, member);
            let bus_port = self.free_bus_port(bus, Direction::Out)?;
            let member_port = self.member_port(member, Direction::In, bus_port.kind, &label)?;
            self.push(PortRef::new(bus.id.clone(), bus_port.name.as_str()), member_port);
        }
        Ok(())
    }

    fn free_bus_port(&self, bus: &'a Instance, direction: Direction) -> GraphResult<&'a PortSpec> {
        let mut declared = 0;
        for port in bus.ports.iter().filter(|p| p.bus && p.direction == direction) {
            declared += 1;
            if self.count(bus, port) == 0 {
                return Ok(port);
            }
        }
        let side = match direction {
            Direction::In => "input_*",
            Direction::Out => "output_*",
        };
        Err(GraphError::ArityMismatch {
            instance: bus.id.clone(),
            port: side.to_string(),
            expected: format!("{declared} in total"),
            actual: declared + 1,
        })
    }

    fn member_port(
        &self,
        member: &str,
        direction: Direction,
        kind: PortKind,
        label: &str,
    ) -> GraphResult<PortRef> {
        let member: MemberRef = member
            .parse()
            .map_err(|e: pt_core::CoreError| unresolved(label, e.to_string()))?;
        let instance = self.instance(member.instance.as_str(), label)?;

        let spec = match &member.port {
            Some(name) => {
                let spec = self.port(instance, name, direction, label)?;
                if spec.kind != kind {
                    return Err(unresolved(
                        label,
                        format!("port kinds differ ({:?} vs {:?})", spec.kind, kind),
                    ));
                }
                spec
            }
            None => instance
                .ports
                .iter()
                .find(|p| p.direction == direction && p.kind == kind && self.has_room(instance, p))
                .ok_or_else(|| {
                    unresolved(
                        label,
                        format!(
                            "'{}' ({}) has no free {:?} port of kind {:?}",
                            instance.id,
                            instance.type_tag(),
                            direction,
                            kind
                        ),
                    )
                })?,
        };
        Ok(PortRef::new(instance.id.clone(), spec.name.as_str()))
    }
}

fn unresolved(label: &str, reason: String) -> GraphError {
    GraphError::UnresolvedConnection {
        connection: label.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::standard()
    }

    fn doc(components: &[(&str, &str)]) -> ArchitectureDoc {
        let mut doc = ArchitectureDoc::new("test");
        for (id, tag) in components {
            doc.components.push(ComponentDef::new(*id, *tag));
        }
        doc
    }

    #[test]
    fn empty_document_builds() {
        let graph = build(&ArchitectureDoc::new("empty"), &registry()).unwrap();
        assert!(graph.instances().is_empty());
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn unknown_type_names_instance() {
        let d = doc(&[("x_1", "flux_capacitor")]);
        assert_eq!(
            build(&d, &registry()).unwrap_err(),
            GraphError::UnknownComponentType {
                instance: "x_1".into(),
                tag: "flux_capacitor".into()
            }
        );
    }

    #[test]
    fn unknown_type_reported_before_duplicates() {
        let d = doc(&[("a", "fuel_tank"), ("a", "fuel_tank"), ("b", "nope")]);
        assert!(matches!(
            build(&d, &registry()).unwrap_err(),
            GraphError::UnknownComponentType { .. }
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let d = doc(&[("tank", "fuel_tank"), ("tank", "fuel_tank")]);
        assert_eq!(
            build(&d, &registry()).unwrap_err(),
            GraphError::DuplicateId { id: "tank".into() }
        );
    }

    #[test]
    fn direction_is_checked() {
        let mut d = doc(&[("prop", "propeller"), ("motor", "PMSM")]);
        d.connections
            .push(ConnectionDef::new("prop", "shaft_in", "motor", "shaft_out"));
        assert!(matches!(
            build(&d, &registry()).unwrap_err(),
            GraphError::UnresolvedConnection { .. }
        ));
    }

    #[test]
    fn kinds_must_match() {
        let mut d = doc(&[("tank", "fuel_tank"), ("motor", "PMSM"), ("prop", "propeller")]);
        d.connections
            .push(ConnectionDef::new("tank", "fuel_out", "motor", "ac_in"));
        d.connections
            .push(ConnectionDef::new("motor", "shaft_out", "prop", "shaft_in"));
        let err = build(&d, &registry()).unwrap_err();
        match err {
            GraphError::UnresolvedConnection { reason, .. } => {
                assert!(reason.contains("kinds differ"), "{reason}")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn oversized_bus_is_an_option_error() {
        let mut d = doc(&[]);
        d.components
            .push(ComponentDef::new("bus", "DC_bus").with_option("number_of_inputs", i64::MAX));
        assert!(matches!(
            build(&d, &registry()).unwrap_err(),
            GraphError::InvalidOption { ref instance, ref option, .. }
                if instance.as_str() == "bus" && option == "number_of_inputs"
        ));
    }

    #[test]
    fn bad_position_is_an_option_error() {
        let mut d = doc(&[("prop", "propeller")]);
        d.components[0].position = Some("on_the_roof".into());
        assert!(matches!(
            build(&d, &registry()).unwrap_err(),
            GraphError::InvalidOption { ref option, .. } if option == "position"
        ));
    }

    #[test]
    fn bus_membership_fills_ports_in_order() {
        let mut d = doc(&[
            ("bat_a", "battery_pack"),
            ("bat_b", "battery_pack"),
            ("bus", "DC_bus"),
            ("inv", "inverter"),
            ("motor", "PMSM"),
            ("prop", "propeller"),
        ]);
        d.components[2] = ComponentDef::new("bus", "DC_bus").with_option("number_of_inputs", 2i64);
        d.buses.push(BusDef {
            bus: "bus".into(),
            inputs: vec!["bat_a".into(), "bat_b.dc_out".into()],
            outputs: vec!["inv".into()],
            members: vec![],
        });
        d.connections.push(ConnectionDef::new("inv", "ac_out", "motor", "ac_in"));
        d.connections
            .push(ConnectionDef::new("motor", "shaft_out", "prop", "shaft_in"));

        let graph = build(&d, &registry()).unwrap();
        let into_bus: Vec<String> = graph
            .incoming(&"bus".into())
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            into_bus,
            ["bat_a.dc_out -> bus.input_1", "bat_b.dc_out -> bus.input_2"]
        );
        assert_eq!(graph.outgoing(&"bus".into()).count(), 1);
    }

    #[test]
    fn bus_overflow_is_arity_mismatch() {
        let mut d = doc(&[("bat_a", "battery_pack"), ("bat_b", "battery_pack"), ("bus", "DC_bus")]);
        d.buses.push(BusDef {
            bus: "bus".into(),
            inputs: vec!["bat_a".into(), "bat_b".into()],
            outputs: vec![],
            members: vec![],
        });
        assert!(matches!(
            build(&d, &registry()).unwrap_err(),
            GraphError::ArityMismatch { ref instance, .. } if instance.as_str() == "bus"
        ));
    }

    #[test]
    fn membership_on_non_bus_rejected() {
        let mut d = doc(&[("bat", "battery_pack"), ("inv", "inverter")]);
        d.buses.push(BusDef {
            bus: "inv".into(),
            inputs: vec!["bat".into()],
            outputs: vec![],
            members: vec![],
        });
        assert!(matches!(
            build(&d, &registry()).unwrap_err(),
            GraphError::UnresolvedConnection { .. }
        ));
    }
}
