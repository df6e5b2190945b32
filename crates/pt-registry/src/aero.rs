//! Propulsor mounting positions and the aerodynamic-delta inputs they feed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::port::SlipstreamTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    OnTheWing,
    InTheNose,
    InTheBack,
}

impl Position {
    pub const DEFAULT: Position = Position::InTheNose;

    pub fn as_str(self) -> &'static str {
        match self {
            Position::OnTheWing => "on_the_wing",
            Position::InTheNose => "in_the_nose",
            Position::InTheBack => "in_the_back",
        }
    }

    /// Aerodynamic-delta inputs a propulsor at this position must or may feed.
    pub fn consumers(self) -> &'static [ConsumerInput] {
        match self {
            Position::OnTheWing => WING_MOUNTED,
            Position::InTheNose => NOSE_MOUNTED,
            Position::InTheBack => &[],
        }
    }
}

impl FromStr for Position {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_the_wing" => Ok(Position::OnTheWing),
            "in_the_nose" => Ok(Position::InTheNose),
            "in_the_back" => Ok(Position::InTheBack),
            other => Err(RegistryError::InvalidOption {
                option: "position".to_string(),
                reason: format!(
                    "'{other}' is not one of on_the_wing, in_the_nose, in_the_back"
                ),
            }),
        }
    }
}

/// Lifting surface whose aerodynamic coefficients receive a slipstream delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Wing,
    Fuselage,
}

impl Surface {
    /// Name of the consuming block in the assembled model.
    pub fn consumer_name(self) -> &'static str {
        match self {
            Surface::Wing => "slipstream_wing",
            Surface::Fuselage => "slipstream_fuselage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerInput {
    pub surface: Surface,
    pub input: &'static str,
    pub tag: SlipstreamTag,
    pub mandatory: bool,
}

const fn input(
    surface: Surface,
    input: &'static str,
    tag: SlipstreamTag,
    mandatory: bool,
) -> ConsumerInput {
    ConsumerInput {
        surface,
        input,
        tag,
        mandatory,
    }
}

const WING_MOUNTED: &[ConsumerInput] = &[
    input(Surface::Wing, "thrust", SlipstreamTag::Thrust, true),
    input(Surface::Wing, "induced_velocity", SlipstreamTag::InducedVelocity, true),
    input(Surface::Wing, "swirl_angle", SlipstreamTag::SwirlAngle, false),
];

const NOSE_MOUNTED: &[ConsumerInput] = &[
    input(Surface::Wing, "thrust", SlipstreamTag::Thrust, true),
    input(Surface::Wing, "induced_velocity", SlipstreamTag::InducedVelocity, true),
    input(Surface::Fuselage, "thrust", SlipstreamTag::Thrust, true),
    input(Surface::Fuselage, "induced_velocity", SlipstreamTag::InducedVelocity, true),
];
