//! Component types and their structural descriptors.

use std::collections::BTreeMap;
use std::str::FromStr;

use pt_schema::OptionValue;
use serde::{Deserialize, Serialize};

use crate::category::{ArtifactKind, Category};
use crate::error::{RegistryError, RegistryResult};
use crate::port::{Direction, PortKind, PortSpec, PortTemplate, SlipstreamTag};

/// Every component type the configurator knows about.
///
/// The textual tag used in documents is [`ComponentType::tag`]; parsing a tag
/// is the only way to obtain a type, so an unregistered tag never gets past
/// the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentType {
    Propeller,
    DuctedFan,
    Pmsm,
    Ice,
    Turboshaft,
    DcBus,
    DcSplitter,
    DcCableHarness,
    DcSspc,
    DcDcConverter,
    Inverter,
    Rectifier,
    Gearbox,
    FuelSystem,
    BatteryPack,
    Generator,
    PemfcStack,
    FuelTank,
    GaseousHydrogenTank,
}

impl ComponentType {
    pub const ALL: [ComponentType; 19] = [
        ComponentType::Propeller,
        ComponentType::DuctedFan,
        ComponentType::Pmsm,
        ComponentType::Ice,
        ComponentType::Turboshaft,
        ComponentType::DcBus,
        ComponentType::DcSplitter,
        ComponentType::DcCableHarness,
        ComponentType::DcSspc,
        ComponentType::DcDcConverter,
        ComponentType::Inverter,
        ComponentType::Rectifier,
        ComponentType::Gearbox,
        ComponentType::FuelSystem,
        ComponentType::BatteryPack,
        ComponentType::Generator,
        ComponentType::PemfcStack,
        ComponentType::FuelTank,
        ComponentType::GaseousHydrogenTank,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ComponentType::Propeller => "propeller",
            ComponentType::DuctedFan => "ducted_fan",
            ComponentType::Pmsm => "PMSM",
            ComponentType::Ice => "ICE",
            ComponentType::Turboshaft => "turboshaft",
            ComponentType::DcBus => "DC_bus",
            ComponentType::DcSplitter => "DC_splitter",
            ComponentType::DcCableHarness => "DC_cable_harness",
            ComponentType::DcSspc => "DC_SSPC",
            ComponentType::DcDcConverter => "DC_dc_converter",
            ComponentType::Inverter => "inverter",
            ComponentType::Rectifier => "rectifier",
            ComponentType::Gearbox => "gearbox",
            ComponentType::FuelSystem => "fuel_system",
            ComponentType::BatteryPack => "battery_pack",
            ComponentType::Generator => "generator",
            ComponentType::PemfcStack => "PEMFC_stack",
            ComponentType::FuelTank => "fuel_tank",
            ComponentType::GaseousHydrogenTank => "gaseous_hydrogen_tank",
        }
    }

    /// CamelCase stem of the artifact names (`SizingBatteryPack`, ...).
    fn stem(self) -> &'static str {
        match self {
            ComponentType::Propeller => "Propeller",
            ComponentType::DuctedFan => "DuctedFan",
            ComponentType::Pmsm => "PMSM",
            ComponentType::Ice => "ICE",
            ComponentType::Turboshaft => "Turboshaft",
            ComponentType::DcBus => "DCBus",
            ComponentType::DcSplitter => "DCSplitter",
            ComponentType::DcCableHarness => "HarnessDC",
            ComponentType::DcSspc => "DCSSPC",
            ComponentType::DcDcConverter => "DCDCConverter",
            ComponentType::Inverter => "Inverter",
            ComponentType::Rectifier => "Rectifier",
            ComponentType::Gearbox => "Gearbox",
            ComponentType::FuelSystem => "FuelSystem",
            ComponentType::BatteryPack => "BatteryPack",
            ComponentType::Generator => "Generator",
            ComponentType::PemfcStack => "PEMFCStack",
            ComponentType::FuelTank => "FuelTank",
            ComponentType::GaseousHydrogenTank => "GaseousHydrogenTank",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ComponentType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|t| t.tag() == s)
            .ok_or_else(|| RegistryError::UnknownComponentType { tag: s.to_string() })
    }
}

/// Artifact names the model-builder instantiates for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifacts {
    pub sizing: Option<String>,
    pub performance: Option<String>,
    pub slipstream: Option<String>,
}

/// Upper bound on the bus ports of one direction set through an option.
pub const MAX_BUS_PORTS: usize = 64;

/// How many bus ports of one direction a type exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BusCount {
    Fixed(usize),
    FromOption { key: &'static str, default: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BusLayout {
    pub kind: PortKind,
    pub inputs: BusCount,
    pub outputs: BusCount,
}

/// Structural requirements of one component type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub component_type: ComponentType,
    pub category: Category,
    pub(crate) bus: Option<BusLayout>,
    pub(crate) ports: Vec<PortTemplate>,
}

impl TypeDescriptor {
    pub fn tag(&self) -> &'static str {
        self.component_type.tag()
    }

    /// Artifact name for one kind, or `None` when the category does not take part.
    pub fn artifact(&self, kind: ArtifactKind) -> Option<String> {
        if !self.category.participates_in(kind) {
            return None;
        }
        let prefix = match kind {
            ArtifactKind::Sizing => "Sizing",
            ArtifactKind::Performance => "Performances",
            ArtifactKind::Slipstream => "Slipstream",
        };
        Some(format!("{}{}", prefix, self.component_type.stem()))
    }

    pub fn artifacts(&self) -> Artifacts {
        Artifacts {
            sizing: self.artifact(ArtifactKind::Sizing),
            performance: self.artifact(ArtifactKind::Performance),
            slipstream: self.artifact(ArtifactKind::Slipstream),
        }
    }

    /// Materialize the ports of one instance.
    ///
    /// Bus ports come first (`input_1..`, then `output_1..`), followed by the
    /// fixed ports in declaration order.
    pub fn ports(&self, options: &BTreeMap<String, OptionValue>) -> RegistryResult<Vec<PortSpec>> {
        let mut ports = Vec::with_capacity(self.ports.len());
        if let Some(layout) = self.bus {
            let inputs = bus_count(layout.inputs, options)?;
            let outputs = bus_count(layout.outputs, options)?;
            ports.extend((1..=inputs).map(|k| bus_port(format!("input_{k}"), Direction::In, layout.kind)));
            ports.extend(
                (1..=outputs).map(|k| bus_port(format!("output_{k}"), Direction::Out, layout.kind)),
            );
        }
        ports.extend(self.ports.iter().map(PortTemplate::materialize));
        Ok(ports)
    }

    /// Copy of this descriptor with one more slipstream output.
    pub fn with_slipstream_output(mut self, name: &'static str, tag: SlipstreamTag) -> Self {
        self.ports.push(PortTemplate::slipstream(name, tag));
        self
    }

    /// Copy of this descriptor without one fixed port.
    pub fn without_port(mut self, name: &str) -> Self {
        self.ports.retain(|p| p.name != name);
        self
    }
}

fn bus_port(name: String, direction: Direction, kind: PortKind) -> PortSpec {
    PortSpec {
        name,
        direction,
        kind,
        required: true,
        bus: true,
        sizing: true,
        slipstream: None,
    }
}

fn bus_count(count: BusCount, options: &BTreeMap<String, OptionValue>) -> RegistryResult<usize> {
    match count {
        BusCount::Fixed(n) => Ok(n),
        BusCount::FromOption { key, default } => match options.get(key) {
            None => Ok(default),
            Some(value) => match value.as_int() {
                Some(n) if n >= 1 => usize::try_from(n)
                    .ok()
                    .filter(|n| *n <= MAX_BUS_PORTS)
                    .ok_or_else(|| RegistryError::InvalidOption {
                        option: key.to_string(),
                        reason: format!("{n} exceeds the limit of {MAX_BUS_PORTS}"),
                    }),
                _ => Err(RegistryError::InvalidOption {
                    option: key.to_string(),
                    reason: format!("expected a positive integer, got '{value}'"),
                }),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for t in ComponentType::ALL {
            assert_eq!(t.tag().parse::<ComponentType>().unwrap(), t);
        }
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert!("dc_bus".parse::<ComponentType>().is_err());
        assert!("pmsm".parse::<ComponentType>().is_err());
    }
}
