//! Links from propulsor performance outputs to the aerodynamic-delta consumers.

use pt_core::{InstanceId, PortRef};
use pt_graph::Graph;
use pt_registry::{ArtifactKind, Category, Direction, Position, Registry, SlipstreamTag};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlipstreamLink {
    pub producer: PortRef,
    /// `slipstream_<surface>.<input>_<propulsor id>`
    pub consumer: PortRef,
    pub tag: SlipstreamTag,
}

/// Match every propulsor's slipstream outputs to the inputs its mounting position feeds.
///
/// Matching goes by [`SlipstreamTag`], never by port name. A mandatory input
/// without a producer fails the whole resolution; optional ones are skipped.
pub fn resolve_slipstream_links(graph: &Graph, registry: &Registry) -> PlanResult<Vec<SlipstreamLink>> {
    let mut links = Vec::new();

    for instance in graph.instances() {
        if instance.category != Category::Propulsor
            || registry
                .descriptor(instance.component_type)
                .artifact(ArtifactKind::Slipstream)
                .is_none()
        {
            continue;
        }
        let position = instance.mounting.unwrap_or(Position::DEFAULT);

        for input in position.consumers() {
            let producer = instance
                .ports
                .iter()
                .find(|p| p.direction == Direction::Out && p.slipstream == Some(input.tag));
            let consumer = consumer_port(input.surface.consumer_name(), input.input, &instance.id);

            match producer {
                Some(port) => links.push(SlipstreamLink {
                    producer: PortRef::new(instance.id.clone(), port.name.as_str()),
                    consumer,
                    tag: input.tag,
                }),
                None if input.mandatory => {
                    return Err(PlanError::MissingSlipstreamSource {
                        propulsor: instance.id.clone(),
                        consumer: format!("{}.{}", input.surface.consumer_name(), input.input),
                    });
                }
                None => {
                    tracing::debug!(
                        propulsor = %instance.id,
                        input = input.input,
                        "optional slipstream input left unconnected"
                    );
                }
            }
        }
    }

    Ok(links)
}

fn consumer_port(consumer: &str, input: &str, propulsor: &InstanceId) -> PortRef {
    PortRef::new(consumer, format!("{input}_{propulsor}"))
}
