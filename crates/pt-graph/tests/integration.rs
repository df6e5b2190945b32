//! Integration tests for pt-graph.

use std::path::{Path, PathBuf};

use pt_core::InstanceId;
use pt_graph::{GraphError, build, extract_single_branch, partition, reduced_document};
use pt_registry::Registry;
use pt_schema::{ArchitectureDoc, ComponentDef, ConnectionDef};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos/architectures")
        .join(name)
}

fn load(name: &str) -> ArchitectureDoc {
    pt_schema::load(&fixture(name)).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e))
}

fn ids(list: &[&str]) -> Vec<InstanceId> {
    list.iter().map(|s| InstanceId::from(*s)).collect()
}

#[test]
fn fixtures_build() {
    let registry = Registry::standard();
    for name in [
        "single_chain.yaml",
        "feedback_loop.yaml",
        "criss_cross.yaml",
        "twin_chains.yaml",
        "legacy_v0.yaml",
    ] {
        build(&load(name), &registry).unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
    }
}

#[test]
fn build_is_deterministic() {
    let registry = Registry::standard();
    let doc = load("criss_cross.yaml");
    assert_eq!(build(&doc, &registry).unwrap(), build(&doc, &registry).unwrap());
}

#[test]
fn bus_memberships_become_connections() {
    let graph = build(&load("single_chain.yaml"), &Registry::standard()).unwrap();
    let edges: Vec<String> = graph.connections().iter().map(|c| c.to_string()).collect();
    assert_eq!(
        edges,
        [
            "battery_pack_1.dc_out -> dc_bus_1.input_1",
            "dc_bus_1.output_1 -> inverter_1.dc_in",
            "inverter_1.ac_out -> motor_1.ac_in",
            "motor_1.shaft_out -> propeller_1.shaft_in",
        ]
    );
}

#[test]
fn legacy_members_feed_the_bus() {
    let graph = build(&load("legacy_v0.yaml"), &Registry::standard()).unwrap();
    let bus = InstanceId::from("dc_bus_1");
    let feeders: Vec<&str> = graph
        .incoming(&bus)
        .map(|c| c.from.instance.as_str())
        .collect();
    assert_eq!(feeders, ["battery_pack_1"]);
}

#[test]
fn missing_required_connection() {
    let mut doc = load("single_chain.yaml");
    doc.connections
        .retain(|c| c.to.instance != "propeller_1");
    let err = build(&doc, &Registry::standard()).unwrap_err();
    assert_eq!(
        err,
        GraphError::ArityMismatch {
            instance: "propeller_1".into(),
            port: "shaft_in".into(),
            expected: "exactly 1".into(),
            actual: 0,
        }
    );
}

#[test]
fn second_connection_into_an_input() {
    let mut doc = load("single_chain.yaml");
    doc.components.push(ComponentDef::new("motor_2", "PMSM"));
    doc.components.push(ComponentDef::new("inverter_2", "inverter"));
    doc.connections
        .push(ConnectionDef::new("motor_2", "shaft_out", "propeller_1", "shaft_in"));
    doc.connections
        .push(ConnectionDef::new("inverter_2", "ac_out", "motor_2", "ac_in"));
    let err = build(&doc, &Registry::standard()).unwrap_err();
    assert!(
        matches!(err, GraphError::ArityMismatch { ref instance, actual: 2, .. } if instance.as_str() == "propeller_1"),
        "{err}"
    );
}

#[test]
fn unknown_endpoint() {
    let mut doc = load("single_chain.yaml");
    doc.connections
        .push(ConnectionDef::new("ghost_1", "dc_out", "inverter_1", "dc_in"));
    assert!(matches!(
        build(&doc, &Registry::standard()).unwrap_err(),
        GraphError::UnresolvedConnection { .. }
    ));
}

#[test]
fn shared_converter_keeps_one_branch() {
    let graph = build(&load("criss_cross.yaml"), &Registry::standard()).unwrap();
    let branches = partition(&graph);
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0].nodes.len(), graph.instances().len());
    assert_eq!(branches[0].edges, graph.connections());

    let converter_out: Vec<String> = graph
        .outgoing(&"dc_dc_converter_1".into())
        .map(|c| c.to.to_string())
        .collect();
    assert_eq!(converter_out, ["dc_bus_a.input_2", "dc_bus_b.input_2"]);
}

#[test]
fn independent_chains_split() {
    let graph = build(&load("twin_chains.yaml"), &Registry::standard()).unwrap();
    let branches = partition(&graph);
    assert_eq!(branches.len(), 2);
    assert_eq!(
        branches[0].nodes,
        ids(&["battery_pack_1", "dc_bus_1", "inverter_1", "motor_1", "propeller_1"])
    );
    assert_eq!(
        branches[1].nodes,
        ids(&["fuel_system_1", "fuel_tank_1", "gearbox_1", "propeller_2", "turboshaft_1"])
    );
    assert_eq!(branches[0].edges.len() + branches[1].edges.len(), graph.connections().len());
}

#[test]
fn extract_from_any_member() {
    let graph = build(&load("twin_chains.yaml"), &Registry::standard()).unwrap();
    let a = extract_single_branch(&graph, &"fuel_tank_1".into()).unwrap();
    let b = extract_single_branch(&graph, &"propeller_2".into()).unwrap();
    assert_eq!(a, b);
    assert!(a.contains(&"turboshaft_1".into()));
    assert!(!a.contains(&"battery_pack_1".into()));
}

#[test]
fn extract_unknown_seed() {
    let graph = build(&load("twin_chains.yaml"), &Registry::standard()).unwrap();
    assert_eq!(
        extract_single_branch(&graph, &"nope".into()).unwrap_err(),
        GraphError::UnknownInstance { id: "nope".into() }
    );
}

#[test]
fn reduced_document_round_trip() {
    let registry = Registry::standard();
    let graph = build(&load("twin_chains.yaml"), &registry).unwrap();
    let branch = extract_single_branch(&graph, &"battery_pack_1".into()).unwrap();

    let doc = reduced_document(&graph, &branch);
    assert_eq!(doc.name, "twin_chains_branch_battery_pack_1");
    assert!(doc.buses.is_empty());
    assert_eq!(
        doc.control_parameters,
        ["settings:battery_pack_1:mission:soc_min", "settings:aircraft:cruise:altitude"]
    );

    let path = std::env::temp_dir().join("pt_graph_reduced_round_trip.yaml");
    pt_schema::save(&path, &doc).unwrap();
    let reloaded = pt_schema::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(reloaded, doc);

    let reduced = build(&reloaded, &registry).unwrap();
    let branches = partition(&reduced);
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0], branch);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// `chains` battery-to-propeller chains; a set `links[i]` wires chain `i`'s bus
    /// voltage into chain `i + 1`'s battery control input.
    fn chains_doc(chains: usize, links: &[bool]) -> ArchitectureDoc {
        let mut doc = ArchitectureDoc::new("generated");
        for i in 0..chains {
            let battery = format!("battery_pack_{i}");
            let bus = format!("dc_bus_{i}");
            let inverter = format!("inverter_{i}");
            let motor = format!("motor_{i}");
            let prop = format!("propeller_{i}");
            doc.components.push(ComponentDef::new(battery.clone(), "battery_pack"));
            doc.components.push(ComponentDef::new(bus.clone(), "DC_bus"));
            doc.components.push(ComponentDef::new(inverter.clone(), "inverter"));
            doc.components.push(ComponentDef::new(motor.clone(), "PMSM"));
            doc.components
                .push(ComponentDef::new(prop.clone(), "propeller").with_position("in_the_back"));
            doc.connections
                .push(ConnectionDef::new(battery, "dc_out", bus.clone(), "input_1"));
            doc.connections
                .push(ConnectionDef::new(bus, "output_1", inverter.clone(), "dc_in"));
            doc.connections
                .push(ConnectionDef::new(inverter, "ac_out", motor.clone(), "ac_in"));
            doc.connections
                .push(ConnectionDef::new(motor, "shaft_out", prop, "shaft_in"));
        }
        for i in 0..chains.saturating_sub(1) {
            if links.get(i).copied().unwrap_or(false) {
                doc.connections.push(ConnectionDef::new(
                    format!("dc_bus_{i}"),
                    "voltage_out",
                    format!("battery_pack_{}", i + 1),
                    "control_in",
                ));
            }
        }
        doc
    }

    proptest! {
        #[test]
        fn partition_is_total_and_disjoint(
            chains in 1usize..6,
            links in prop::collection::vec(any::<bool>(), 0..6),
        ) {
            let graph = build(&chains_doc(chains, &links), &Registry::standard()).unwrap();
            let branches = partition(&graph);

            let mut nodes: Vec<InstanceId> =
                branches.iter().flat_map(|b| b.nodes.iter().cloned()).collect();
            nodes.sort();
            let mut expected: Vec<InstanceId> =
                graph.instances().iter().map(|i| i.id.clone()).collect();
            expected.sort();
            prop_assert_eq!(nodes, expected);

            let mut edges: Vec<_> = branches.iter().flat_map(|b| b.edges.iter().cloned()).collect();
            edges.sort();
            prop_assert_eq!(edges, graph.connections().to_vec());

            let merged = links.iter().take(chains.saturating_sub(1)).filter(|l| **l).count();
            prop_assert_eq!(branches.len(), chains - merged);

            for branch in &branches {
                for edge in &branch.edges {
                    prop_assert!(branch.contains(&edge.from.instance));
                    prop_assert!(branch.contains(&edge.to.instance));
                }
            }
        }
    }
}
