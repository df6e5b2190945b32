//! Flight phases and the operating-context markers that name them.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Operating context a control parameter can be specialised for.
///
/// `Mission` is the mission-wide context; every other variant is one
/// segment of the mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Mission,
    TaxiOut,
    Takeoff,
    InitialClimb,
    Climb,
    Cruise,
    Descent,
    Reserve,
    TaxiIn,
    Landing,
}

impl Phase {
    pub const ALL: [Phase; 10] = [
        Phase::Mission,
        Phase::TaxiOut,
        Phase::Takeoff,
        Phase::InitialClimb,
        Phase::Climb,
        Phase::Cruise,
        Phase::Descent,
        Phase::Reserve,
        Phase::TaxiIn,
        Phase::Landing,
    ];

    /// Marker used inside variable names for this phase.
    pub fn marker(self) -> &'static str {
        match self {
            Phase::Mission => "mission",
            Phase::TaxiOut => "taxi_out",
            Phase::Takeoff => "takeoff",
            Phase::InitialClimb => "initial_climb",
            Phase::Climb => "climb",
            Phase::Cruise => "cruise",
            Phase::Descent => "descent",
            Phase::Reserve => "reserve",
            Phase::TaxiIn => "taxi_in",
            Phase::Landing => "landing",
        }
    }

    /// Recognize a name segment as a phase marker.
    pub fn from_marker(segment: &str) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| p.marker() == segment)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl FromStr for Phase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::from_marker(s).ok_or_else(|| CoreError::UnknownPhase {
            name: s.to_string(),
        })
    }
}
