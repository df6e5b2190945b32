//! The assembly plan handed to the model builder.

use pt_core::{InstanceId, Phase, PortRef};
use pt_graph::Graph;
use pt_registry::{Artifacts, Category, Registry};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::PlanResult;
use crate::naming::{NamingOptions, PromotionTable, build_promotion_table, rename_control_parameters};
use crate::order::{EvaluationPlan, resolve_performance};
use crate::slipstream::{SlipstreamLink, resolve_slipstream_links};

/// Planning configuration; every field has a default so a partial YAML file is enough.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanOptions {
    /// Explicit total order over instance ids used to break ties between stages.
    pub hint: Option<Vec<InstanceId>>,
    /// Produce control-parameter variants for this phase.
    pub phase: Option<Phase>,
    pub naming: NamingOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedInstance {
    pub id: InstanceId,
    pub type_tag: String,
    pub category: Category,
    pub artifacts: Artifacts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedConnection {
    pub from: PortRef,
    pub to: PortRef,
    pub from_name: String,
    pub to_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyPlan {
    pub name: String,
    pub instances: Vec<PlannedInstance>,
    pub connections: Vec<PlannedConnection>,
    pub evaluation: EvaluationPlan,
    pub promotion: PromotionTable,
    pub slipstream: Vec<SlipstreamLink>,
}

impl AssemblyPlan {
    pub fn build(graph: &Graph, registry: &Registry, options: &PlanOptions) -> PlanResult<Self> {
        let evaluation = resolve_performance(graph, options.hint.as_deref())?;

        let mut promotion = build_promotion_table(graph, &options.naming)?;
        if let Some(phase) = options.phase {
            let variants = rename_control_parameters(graph.control_parameters(), phase)?;
            promotion = promotion.with_phase_variants(variants);
        }

        let slipstream = resolve_slipstream_links(graph, registry)?;

        let instances = graph
            .instances()
            .iter()
            .map(|inst| PlannedInstance {
                id: inst.id.clone(),
                type_tag: inst.type_tag().to_string(),
                category: inst.category,
                artifacts: registry.descriptor(inst.component_type).artifacts(),
            })
            .collect();

        let promoted = |port: &PortRef| promotion.name(port).unwrap_or_default().to_string();
        let connections = graph
            .connections()
            .iter()
            .map(|c| PlannedConnection {
                from: c.from.clone(),
                to: c.to.clone(),
                from_name: promoted(&c.from),
                to_name: promoted(&c.to),
            })
            .collect();

        let plan = AssemblyPlan {
            name: graph.name().to_string(),
            instances,
            connections,
            evaluation,
            promotion,
            slipstream,
        };
        tracing::info!(
            name = %plan.name,
            instances = plan.instances.len(),
            slipstream_links = plan.slipstream.len(),
            "assembled plan"
        );
        Ok(plan)
    }

    /// SHA-256 of the canonical JSON form, as lowercase hex.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        let json = serde_json::to_string(self).unwrap_or_default();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
