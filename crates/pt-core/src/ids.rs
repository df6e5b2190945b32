use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Identifier of a component instance, unique within one architecture document.
///
/// Ordering is plain string ordering; every deterministic tie-break in the
/// configurator relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Create an instance ID without checking the identifier rules.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create an instance ID, rejecting values that break [`check_identifier`].
    pub fn parse(id: &str) -> CoreResult<Self> {
        check_identifier(id)?;
        Ok(Self(id.to_string()))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A port on a specific instance: the endpoint of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
    pub instance: InstanceId,
    pub port: String,
}

impl PortRef {
    pub fn new(instance: impl Into<InstanceId>, port: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.port)
    }
}

/// Identifiers are non-empty and made of ASCII letters, digits, `_` and `-`.
///
/// Promoted variable names join identifiers with `:` and reduced documents
/// write `instance.port` member references, so neither character may appear.
pub fn check_identifier(value: &str) -> CoreResult<()> {
    if value.is_empty() {
        return Err(CoreError::InvalidIdentifier {
            value: value.to_string(),
            reason: "must not be empty",
        });
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CoreError::InvalidIdentifier {
            value: value.to_string(),
            reason: "only ASCII letters, digits, '_' and '-' are allowed",
        });
    }
    Ok(())
}
