//! Writing a single branch back out as a standalone document.

use pt_core::InstanceId;
use pt_schema::{ArchitectureDoc, ComponentDef, ConnectionDef};

use crate::graph::Graph;
use crate::partition::Branch;

/// Document describing only the instances and connections of `branch`.
///
/// Every edge is written as an explicit connection, including those that came
/// from bus memberships, so the result has no bus section. Parsing and
/// building the result gives a graph equal to the branch.
pub fn reduced_document(graph: &Graph, branch: &Branch) -> ArchitectureDoc {
    let components = graph
        .instances()
        .iter()
        .filter(|inst| branch.contains(&inst.id))
        .map(|inst| ComponentDef {
            id: inst.id.to_string(),
            type_tag: inst.type_tag().to_string(),
            position: inst.position.clone(),
            options: inst.options.clone(),
        })
        .collect();

    let connections = branch
        .edges
        .iter()
        .map(|c| {
            ConnectionDef::new(
                c.from.instance.as_str(),
                c.from.port.as_str(),
                c.to.instance.as_str(),
                c.to.port.as_str(),
            )
        })
        .collect();

    let control_parameters = graph
        .control_parameters()
        .iter()
        .filter(|name| keeps_parameter(graph, branch, name))
        .cloned()
        .collect();

    let seed = branch.first().map_or("empty", InstanceId::as_str);
    let mut doc = ArchitectureDoc::new(format!("{}_branch_{}", graph.name(), seed));
    doc.components = components;
    doc.connections = connections;
    doc.control_parameters = control_parameters;
    doc
}

/// Parameters naming a branch member are kept, as are those naming no instance at all.
fn keeps_parameter(graph: &Graph, branch: &Branch, name: &str) -> bool {
    let mut names_instance = false;
    for segment in name.split(':') {
        let id = segment.into();
        if branch.contains(&id) {
            return true;
        }
        names_instance |= graph.contains(&id);
    }
    !names_instance
}
