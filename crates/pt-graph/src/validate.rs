//! Structural checks run on the frozen edge set.

use std::collections::HashMap;

use pt_core::PortRef;
use pt_registry::{Direction, PortSpec};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Connection, Instance};
use crate::indexing::IndexMap;

/// Every connection runs from an existing output port to an existing input port of the same kind.
pub fn validate_endpoints(
    instances: &[Instance],
    index: &IndexMap,
    connections: &[Connection],
) -> GraphResult<()> {
    for connection in connections {
        let label = connection.to_string();
        let from = endpoint(instances, index, &connection.from, Direction::Out, &label)?;
        let to = endpoint(instances, index, &connection.to, Direction::In, &label)?;
        if from.kind != to.kind {
            return Err(GraphError::UnresolvedConnection {
                connection: label,
                reason: format!("port kinds differ ({:?} vs {:?})", from.kind, to.kind),
            });
        }
    }
    Ok(())
}

fn endpoint<'a>(
    instances: &'a [Instance],
    index: &IndexMap,
    port: &PortRef,
    direction: Direction,
    label: &str,
) -> GraphResult<&'a PortSpec> {
    let spec = index
        .get(&port.instance)
        .and_then(|i| instances[i].port(&port.port))
        .ok_or_else(|| GraphError::UnresolvedConnection {
            connection: label.to_string(),
            reason: format!("no such port {port}"),
        })?;
    if spec.direction != direction {
        return Err(GraphError::UnresolvedConnection {
            connection: label.to_string(),
            reason: format!("{port} has the wrong direction"),
        });
    }
    Ok(spec)
}

/// Every port carries a number of connections its arity allows.
///
/// Instances are checked in document order and ports in declaration order, so
/// the first violation reported is deterministic.
pub fn validate_arity(instances: &[Instance], connections: &[Connection]) -> GraphResult<()> {
    let mut counts: HashMap<&PortRef, usize> = HashMap::new();
    for connection in connections {
        *counts.entry(&connection.from).or_default() += 1;
        *counts.entry(&connection.to).or_default() += 1;
    }

    for instance in instances {
        for port in &instance.ports {
            let key = PortRef::new(instance.id.clone(), port.name.as_str());
            let actual = counts.get(&key).copied().unwrap_or(0);
            if !port.accepts(actual) {
                return Err(GraphError::ArityMismatch {
                    instance: instance.id.clone(),
                    port: port.name.clone(),
                    expected: arity_label(port),
                    actual,
                });
            }
        }
    }
    Ok(())
}

fn arity_label(port: &PortSpec) -> String {
    match port.arity() {
        (min, Some(max)) if min == max => format!("exactly {min}"),
        (0, Some(max)) => format!("at most {max}"),
        (min, Some(max)) => format!("{min} to {max}"),
        (min, None) => format!("at least {min}"),
    }
}
