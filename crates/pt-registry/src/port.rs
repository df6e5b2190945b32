//! Port declarations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    Scalar,
    Vector,
    ElectricalBus,
    MechanicalShaft,
    FluidLine,
}

/// Compatibility tag matching propulsor outputs to aerodynamic-delta inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlipstreamTag {
    Thrust,
    InducedVelocity,
    SwirlAngle,
    JetVelocity,
}

/// A materialized port declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    pub name: String,
    pub direction: Direction,
    pub kind: PortKind,
    /// Required ports must carry a connection.
    pub required: bool,
    /// Bus ports take exactly one connection each; fan-in and fan-out happen through them.
    pub bus: bool,
    /// Ports outside the sizing relation only feed performance evaluation.
    pub sizing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slipstream: Option<SlipstreamTag>,
}

impl PortSpec {
    /// Allowed number of attached connections as `(min, max)`; `None` is unbounded.
    pub fn arity(&self) -> (usize, Option<usize>) {
        let min = usize::from(self.required);
        if self.bus {
            (1, Some(1))
        } else {
            match self.direction {
                Direction::In => (min, Some(1)),
                Direction::Out => (min, None),
            }
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        let (min, max) = self.arity();
        count >= min && max.is_none_or(|max| count <= max)
    }
}

/// Static port declaration in the type table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PortTemplate {
    pub name: &'static str,
    pub direction: Direction,
    pub kind: PortKind,
    pub required: bool,
    pub sizing: bool,
    pub slipstream: Option<SlipstreamTag>,
}

impl PortTemplate {
    pub const fn power_in(name: &'static str, kind: PortKind) -> Self {
        Self {
            name,
            direction: Direction::In,
            kind,
            required: true,
            sizing: true,
            slipstream: None,
        }
    }

    pub const fn power_out(name: &'static str, kind: PortKind) -> Self {
        Self {
            name,
            direction: Direction::Out,
            kind,
            required: true,
            sizing: true,
            slipstream: None,
        }
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Control or feedback signal: optional and performance-only.
    pub const fn signal(name: &'static str, direction: Direction) -> Self {
        Self {
            name,
            direction,
            kind: PortKind::Scalar,
            required: false,
            sizing: false,
            slipstream: None,
        }
    }

    /// Per-time-step performance result exported to the aerodynamic deltas.
    pub const fn slipstream(name: &'static str, tag: SlipstreamTag) -> Self {
        Self {
            name,
            direction: Direction::Out,
            kind: PortKind::Vector,
            required: false,
            sizing: false,
            slipstream: Some(tag),
        }
    }

    pub fn materialize(&self) -> PortSpec {
        PortSpec {
            name: self.name.to_string(),
            direction: self.direction,
            kind: self.kind,
            required: self.required,
            bus: false,
            sizing: self.sizing,
            slipstream: self.slipstream,
        }
    }
}
