//! Schema migration framework.

use crate::ParseError;
use crate::schema::ArchitectureDoc;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut doc: ArchitectureDoc) -> Result<ArchitectureDoc, ParseError> {
    while doc.version < LATEST_VERSION {
        doc = migrate_one_version(doc)?;
    }
    Ok(doc)
}

fn migrate_one_version(doc: ArchitectureDoc) -> Result<ArchitectureDoc, ParseError> {
    match doc.version {
        0 => migrate_v0_to_v1(doc),
        v => Err(ParseError {
            location: "version".to_string(),
            reason: format!("no migration path from version {}", v),
        }),
    }
}

/// Version 0 listed bus feeders under `members`.
fn migrate_v0_to_v1(mut doc: ArchitectureDoc) -> Result<ArchitectureDoc, ParseError> {
    for bus in &mut doc.buses {
        let legacy = std::mem::take(&mut bus.members);
        bus.inputs.extend(legacy);
    }
    doc.version = 1;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BusDef;

    #[test]
    fn migrate_latest_is_noop() {
        let doc = ArchitectureDoc::new("noop");
        let migrated = migrate_to_latest(doc.clone()).unwrap();
        assert_eq!(migrated, doc);
    }

    #[test]
    fn migrate_bus_members_to_inputs() {
        let mut doc = ArchitectureDoc::new("legacy");
        doc.version = 0;
        doc.buses.push(BusDef {
            bus: "dc_bus_1".to_string(),
            inputs: vec![],
            outputs: vec!["inverter_1".to_string()],
            members: vec!["battery_pack_1".to_string(), "generator_1".to_string()],
        });

        let migrated = migrate_to_latest(doc).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        let bus = &migrated.buses[0];
        assert_eq!(bus.inputs, ["battery_pack_1", "generator_1"]);
        assert!(bus.members.is_empty());
        assert_eq!(bus.outputs, ["inverter_1"]);
    }
}
