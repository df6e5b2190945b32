//! Global variable names for ports and phase variants of control parameters.

use std::collections::{BTreeMap, HashMap};

use pt_core::{Phase, PortRef};
use pt_graph::Graph;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

pub const DEFAULT_PREFIX: &str = "data:propulsion:he_power_train";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingOptions {
    /// Leading `:`-separated segments of every promoted name; may be empty.
    pub prefix: String,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Port-to-global-name table, plus the control-parameter phase variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionTable {
    #[serde(with = "port_entries")]
    ports: BTreeMap<PortRef, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    phase_variants: BTreeMap<String, String>,
}

impl PromotionTable {
    pub fn name(&self, port: &PortRef) -> Option<&str> {
        self.ports.get(port).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PortRef, &str)> + '_ {
        self.ports.iter().map(|(p, n)| (p, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Attach the phase-specific control-parameter names.
    pub fn with_phase_variants(mut self, variants: BTreeMap<String, String>) -> Self {
        self.phase_variants = variants;
        self
    }

    pub fn phase_variants(&self) -> &BTreeMap<String, String> {
        &self.phase_variants
    }

    pub fn phase_variant(&self, control_parameter: &str) -> Option<&str> {
        self.phase_variants.get(control_parameter).map(String::as_str)
    }
}

/// Name every port of every instance:
/// `<prefix>:<category namespace>:<type tag>:<instance id>:<port>`.
pub fn build_promotion_table(graph: &Graph, options: &NamingOptions) -> PlanResult<PromotionTable> {
    let mut ports = BTreeMap::new();
    let mut owners: HashMap<String, PortRef> = HashMap::new();

    for instance in graph.instances() {
        for port in &instance.ports {
            let mut segments: Vec<&str> = Vec::with_capacity(5);
            if !options.prefix.is_empty() {
                segments.push(&options.prefix);
            }
            segments.extend([
                instance.category.namespace(),
                instance.type_tag(),
                instance.id.as_str(),
                port.name.as_str(),
            ]);
            let name = segments.join(":");
            let port_ref = PortRef::new(instance.id.clone(), port.name.as_str());

            if let Some(first) = owners.get(&name) {
                return Err(PlanError::NamingCollision {
                    output: name,
                    first: first.to_string(),
                    second: port_ref.to_string(),
                });
            }
            owners.insert(name.clone(), port_ref.clone());
            ports.insert(port_ref, name);
        }
    }

    tracing::debug!(graph = graph.name(), names = ports.len(), "built promotion table");
    Ok(PromotionTable {
        ports,
        phase_variants: BTreeMap::new(),
    })
}

/// Phase-specific name of one control parameter.
///
/// The last segment that is a phase marker is replaced by `phase`'s marker;
/// with no marker present, `:<phase>` is appended.
pub fn phase_variant(name: &str, phase: Phase) -> String {
    let mut segments: Vec<&str> = name.split(':').collect();
    match segments
        .iter()
        .rposition(|s| Phase::from_marker(s).is_some())
    {
        Some(i) => segments[i] = phase.marker(),
        None => segments.push(phase.marker()),
    }
    segments.join(":")
}

/// Map every control parameter to its `phase` variant; two inputs may not share an output.
pub fn rename_control_parameters<S: AsRef<str>>(
    names: &[S],
    phase: Phase,
) -> PlanResult<BTreeMap<String, String>> {
    let mut renamed = BTreeMap::new();
    let mut sources: HashMap<String, &str> = HashMap::new();

    for name in names {
        let name = name.as_ref();
        let variant = phase_variant(name, phase);
        match sources.get(&variant) {
            Some(first) if *first != name => {
                return Err(PlanError::NamingCollision {
                    output: variant,
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
            Some(_) => continue,
            None => {
                sources.insert(variant.clone(), name);
                renamed.insert(name.to_string(), variant);
            }
        }
    }
    Ok(renamed)
}

/// Serialized as a list of `{instance, port, name}` records; JSON map keys must be strings.
mod port_entries {
    use std::collections::BTreeMap;

    use pt_core::{InstanceId, PortRef};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Entry {
        instance: InstanceId,
        port: String,
        name: String,
    }

    pub fn serialize<S: Serializer>(
        ports: &BTreeMap<PortRef, String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(ports.iter().map(|(p, name)| Entry {
            instance: p.instance.clone(),
            port: p.port.clone(),
            name: name.clone(),
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<PortRef, String>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|e| (PortRef::new(e.instance, e.port), e.name))
            .collect())
    }
}
