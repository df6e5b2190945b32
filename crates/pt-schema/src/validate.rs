//! Structural document checks.
//!
//! Only the shape of each record is checked here. Cross-references (does the
//! connected instance exist, is the type tag known) belong to the graph builder.

use pt_core::check_identifier;

use crate::ParseError;
use crate::schema::{ArchitectureDoc, MemberRef};

pub fn validate_document(doc: &ArchitectureDoc) -> Result<(), ParseError> {
    if doc.version > crate::migrate::LATEST_VERSION {
        return Err(ParseError {
            location: "version".to_string(),
            reason: format!(
                "unsupported version {} (latest is {})",
                doc.version,
                crate::migrate::LATEST_VERSION
            ),
        });
    }

    if doc.name.trim().is_empty() {
        return Err(ParseError {
            location: "name".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    for (i, component) in doc.components.iter().enumerate() {
        identifier(&component.id, || format!("components[{i}].id"))?;
        identifier(&component.type_tag, || format!("components[{i}].type"))?;
        if let Some(position) = &component.position {
            identifier(position, || format!("components[{i}].position"))?;
        }
        for key in component.options.keys() {
            identifier(key, || format!("components[{i}].options"))?;
        }
    }

    for (i, connection) in doc.connections.iter().enumerate() {
        identifier(&connection.from.instance, || {
            format!("connections[{i}].from.instance")
        })?;
        identifier(&connection.from.port, || format!("connections[{i}].from.port"))?;
        identifier(&connection.to.instance, || format!("connections[{i}].to.instance"))?;
        identifier(&connection.to.port, || format!("connections[{i}].to.port"))?;
    }

    for (i, bus) in doc.buses.iter().enumerate() {
        identifier(&bus.bus, || format!("buses[{i}].bus"))?;
        if !bus.members.is_empty() {
            return Err(ParseError {
                location: format!("buses[{i}].members"),
                reason: "'members' was replaced by 'inputs' in version 1".to_string(),
            });
        }
        let members = bus
            .inputs
            .iter()
            .enumerate()
            .map(|(j, m)| (format!("buses[{i}].inputs[{j}]"), m))
            .chain(
                bus.outputs
                    .iter()
                    .enumerate()
                    .map(|(j, m)| (format!("buses[{i}].outputs[{j}]"), m)),
            );
        for (location, member) in members {
            member.parse::<MemberRef>().map_err(|e| ParseError {
                location,
                reason: e.to_string(),
            })?;
        }
    }

    for (i, name) in doc.control_parameters.iter().enumerate() {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ParseError {
                location: format!("control_parameters[{i}]"),
                reason: format!("'{name}' must be non-empty and contain no whitespace"),
            });
        }
        if name.split(':').any(str::is_empty) {
            return Err(ParseError {
                location: format!("control_parameters[{i}]"),
                reason: format!("'{name}' has an empty ':' segment"),
            });
        }
    }

    Ok(())
}

fn identifier(value: &str, location: impl FnOnce() -> String) -> Result<(), ParseError> {
    check_identifier(value).map_err(|e| ParseError {
        location: location(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BusDef, ComponentDef, ConnectionDef};

    fn doc() -> ArchitectureDoc {
        let mut doc = ArchitectureDoc::new("t");
        doc.components.push(ComponentDef::new("battery_pack_1", "battery_pack"));
        doc.components.push(ComponentDef::new("dc_bus_1", "DC_bus"));
        doc
    }

    #[test]
    fn valid_document_passes() {
        let mut d = doc();
        d.connections
            .push(ConnectionDef::new("battery_pack_1", "dc_out", "dc_bus_1", "input_1"));
        assert!(validate_document(&d).is_ok());
    }

    #[test]
    fn empty_id_is_located() {
        let mut d = doc();
        d.components[1].id = String::new();
        let err = validate_document(&d).unwrap_err();
        assert_eq!(err.location, "components[1].id");
    }

    #[test]
    fn bad_bus_member_is_located() {
        let mut d = doc();
        d.buses.push(BusDef {
            bus: "dc_bus_1".to_string(),
            inputs: vec!["battery_pack_1".to_string(), "x.y.z".to_string()],
            outputs: vec![],
            members: vec![],
        });
        let err = validate_document(&d).unwrap_err();
        assert_eq!(err.location, "buses[0].inputs[1]");
    }

    #[test]
    fn future_version_rejected() {
        let mut d = doc();
        d.version = 99;
        let err = validate_document(&d).unwrap_err();
        assert_eq!(err.location, "version");
    }

    #[test]
    fn control_parameter_segments() {
        let mut d = doc();
        d.control_parameters.push("settings::soc".to_string());
        assert!(validate_document(&d).is_err());
    }
}
