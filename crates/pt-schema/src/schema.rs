//! Architecture document schema definitions.

use std::collections::BTreeMap;
use std::str::FromStr;

use pt_core::{CoreError, InstanceId, PortRef};
use serde::{Deserialize, Serialize};

/// A declarative power-train architecture: the parsed form of one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArchitectureDoc {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buses: Vec<BusDef>,
    #[serde(default)]
    pub control_parameters: Vec<String>,
}

impl ArchitectureDoc {
    /// Create an empty document at the latest schema version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            components: Vec::new(),
            connections: Vec::new(),
            buses: Vec::new(),
            control_parameters: Vec::new(),
        }
    }

    pub fn component(&self, id: &str) -> Option<&ComponentDef> {
        self.components.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ComponentDef {
    pub id: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Mounting location, meaningful for propulsors (`on_the_wing`, `in_the_nose`, `in_the_back`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionValue>,
}

impl ComponentDef {
    pub fn new(id: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_tag: type_tag.into(),
            position: None,
            options: BTreeMap::new(),
        }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Scalar option value. Nested lists and maps are rejected at parse time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{v}"),
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

/// Explicit point-to-point link, in the direction power or signal is delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConnectionDef {
    pub from: EndpointDef,
    pub to: EndpointDef,
}

impl ConnectionDef {
    pub fn new(
        from_instance: impl Into<String>,
        from_port: impl Into<String>,
        to_instance: impl Into<String>,
        to_port: impl Into<String>,
    ) -> Self {
        Self {
            from: EndpointDef {
                instance: from_instance.into(),
                port: from_port.into(),
            },
            to: EndpointDef {
                instance: to_instance.into(),
                port: to_port.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EndpointDef {
    pub instance: String,
    pub port: String,
}

impl From<&EndpointDef> for PortRef {
    fn from(e: &EndpointDef) -> Self {
        PortRef::new(e.instance.as_str(), e.port.as_str())
    }
}

/// Bus membership: every input member feeds the bus, the bus feeds every output member.
///
/// Members are written `instance` (first free compatible port) or `instance.port`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BusDef {
    pub bus: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Version 0 spelling of `inputs`; emptied by migration.
    #[serde(default, skip_serializing)]
    pub members: Vec<String>,
}

/// A parsed bus member reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub instance: InstanceId,
    pub port: Option<String>,
}

impl FromStr for MemberRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::MalformedPortRef {
            value: s.to_string(),
        };
        let mut parts = s.split('.');
        let instance = parts.next().ok_or_else(malformed)?;
        let port = parts.next();
        if parts.next().is_some() {
            return Err(malformed());
        }
        pt_core::check_identifier(instance).map_err(|_| malformed())?;
        if let Some(port) = port {
            pt_core::check_identifier(port).map_err(|_| malformed())?;
        }
        Ok(MemberRef {
            instance: InstanceId::new(instance),
            port: port.map(str::to_string),
        })
    }
}
