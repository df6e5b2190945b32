//! The type table.

use crate::category::Category;
use crate::descriptor::{BusCount, BusLayout, ComponentType, TypeDescriptor};
use crate::error::RegistryResult;
use crate::port::{Direction, PortTemplate, SlipstreamTag};

use crate::port::PortKind::{ElectricalBus as Elec, FluidLine as Fluid, MechanicalShaft as Shaft};

/// Read-only table correlating component types with their structural requirements.
///
/// A registry is an ordinary value: build one with [`Registry::standard`] and
/// pass it to every operation that needs it.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Indexed by `ComponentType as usize`.
    descriptors: Vec<TypeDescriptor>,
}

impl Registry {
    /// The built-in component catalogue.
    pub fn standard() -> Self {
        let descriptors = ComponentType::ALL.into_iter().map(standard_descriptor).collect();
        Self { descriptors }
    }

    /// Resolve a textual type tag.
    pub fn lookup(&self, tag: &str) -> RegistryResult<&TypeDescriptor> {
        let ty: ComponentType = tag.parse()?;
        Ok(self.descriptor(ty))
    }

    pub fn descriptor(&self, ty: ComponentType) -> &TypeDescriptor {
        &self.descriptors[ty as usize]
    }

    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    /// A new registry with one descriptor replaced.
    pub fn with_descriptor(mut self, descriptor: TypeDescriptor) -> Self {
        let idx = descriptor.component_type as usize;
        self.descriptors[idx] = descriptor;
        self
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_descriptor(ty: ComponentType) -> TypeDescriptor {
    use ComponentType as T;

    let (category, bus, ports): (Category, Option<BusLayout>, Vec<PortTemplate>) = match ty {
        T::Propeller => (
            Category::Propulsor,
            None,
            vec![
                PortTemplate::power_in("shaft_in", Shaft),
                PortTemplate::slipstream("thrust", SlipstreamTag::Thrust),
                PortTemplate::slipstream("induced_velocity", SlipstreamTag::InducedVelocity),
            ],
        ),
        T::DuctedFan => (
            Category::Propulsor,
            None,
            vec![
                PortTemplate::power_in("shaft_in", Shaft),
                PortTemplate::slipstream("thrust", SlipstreamTag::Thrust),
                PortTemplate::slipstream("induced_velocity", SlipstreamTag::InducedVelocity),
                PortTemplate::slipstream("jet_velocity", SlipstreamTag::JetVelocity),
            ],
        ),
        T::Pmsm => (
            Category::PropulsiveLoad,
            None,
            vec![
                PortTemplate::power_in("ac_in", Elec),
                PortTemplate::power_out("shaft_out", Shaft),
            ],
        ),
        T::Ice | T::Turboshaft => (
            Category::PropulsiveLoad,
            None,
            vec![
                PortTemplate::power_in("fuel_in", Fluid),
                PortTemplate::power_out("shaft_out", Shaft),
            ],
        ),
        T::DcBus => (
            Category::Connector,
            Some(BusLayout {
                kind: Elec,
                inputs: BusCount::FromOption {
                    key: "number_of_inputs",
                    default: 1,
                },
                outputs: BusCount::FromOption {
                    key: "number_of_outputs",
                    default: 1,
                },
            }),
            vec![PortTemplate::signal("voltage_out", Direction::Out)],
        ),
        T::DcSplitter => (
            Category::Connector,
            Some(BusLayout {
                kind: Elec,
                inputs: BusCount::Fixed(2),
                outputs: BusCount::Fixed(1),
            }),
            vec![],
        ),
        T::DcCableHarness | T::DcSspc | T::DcDcConverter => (
            Category::Connector,
            None,
            vec![
                PortTemplate::power_in("dc_in", Elec),
                PortTemplate::power_out("dc_out", Elec),
            ],
        ),
        T::Inverter => (
            Category::Connector,
            None,
            vec![
                PortTemplate::power_in("dc_in", Elec),
                PortTemplate::power_out("ac_out", Elec),
            ],
        ),
        T::Rectifier => (
            Category::Connector,
            None,
            vec![
                PortTemplate::power_in("ac_in", Elec),
                PortTemplate::power_out("dc_out", Elec),
            ],
        ),
        T::Gearbox => (
            Category::Connector,
            None,
            vec![
                PortTemplate::power_in("shaft_in", Shaft),
                PortTemplate::power_out("shaft_out_1", Shaft),
                PortTemplate::power_out("shaft_out_2", Shaft).optional(),
            ],
        ),
        T::FuelSystem => (
            Category::Connector,
            None,
            vec![
                PortTemplate::power_in("fuel_in", Fluid),
                PortTemplate::power_out("fuel_out", Fluid),
            ],
        ),
        T::BatteryPack => (
            Category::Storage,
            None,
            vec![
                PortTemplate::power_out("dc_out", Elec),
                PortTemplate::signal("control_in", Direction::In),
            ],
        ),
        T::Generator => (
            Category::Source,
            None,
            vec![
                PortTemplate::power_in("shaft_in", Shaft),
                PortTemplate::power_out("ac_out", Elec),
            ],
        ),
        T::PemfcStack => (
            Category::Source,
            None,
            vec![
                PortTemplate::power_in("h2_in", Fluid),
                PortTemplate::power_out("dc_out", Elec),
                PortTemplate::signal("control_in", Direction::In),
            ],
        ),
        T::FuelTank => (
            Category::Tank,
            None,
            vec![PortTemplate::power_out("fuel_out", Fluid)],
        ),
        T::GaseousHydrogenTank => (
            Category::Tank,
            None,
            vec![PortTemplate::power_out("h2_out", Fluid)],
        ),
    };

    TypeDescriptor {
        component_type: ty,
        category,
        bus,
        ports,
    }
}
