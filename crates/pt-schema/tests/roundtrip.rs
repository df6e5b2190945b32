use std::path::Path;

use pt_schema::*;

fn sample() -> ArchitectureDoc {
    let mut doc = ArchitectureDoc::new("round_trip");
    doc.components.push(
        ComponentDef::new("propeller_1", "propeller").with_position("on_the_wing"),
    );
    doc.components.push(
        ComponentDef::new("dc_bus_1", "DC_bus")
            .with_option("number_of_inputs", 2i64)
            .with_option("number_of_outputs", 1i64),
    );
    doc.components.push(
        ComponentDef::new("battery_pack_1", "battery_pack").with_option("cell_chemistry", "li_ion"),
    );
    doc.connections
        .push(ConnectionDef::new("battery_pack_1", "dc_out", "dc_bus_1", "input_1"));
    doc.buses.push(BusDef {
        bus: "dc_bus_1".to_string(),
        inputs: vec!["dc_dc_converter_1.dc_out".to_string()],
        outputs: vec!["inverter_1".to_string()],
        members: vec![],
    });
    doc.control_parameters
        .push("settings:battery_pack_1:mission:soc_min".to_string());
    doc
}

#[test]
fn roundtrip_yaml() {
    let doc = sample();
    let path = std::env::temp_dir().join("pt_schema_roundtrip.yaml");
    save(&path, &doc).unwrap();
    let loaded = load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(doc, loaded);
}

#[test]
fn roundtrip_json() {
    let doc = sample();
    let path = std::env::temp_dir().join("pt_schema_roundtrip.json");
    save(&path, &doc).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(text.trim_start().starts_with('{'));
    assert_eq!(load_json(&text).unwrap(), doc);
}

#[test]
fn unknown_top_level_key() {
    let err = load_yaml("version: 1\nname: x\nwiring: []\n").unwrap_err();
    assert!(err.reason.contains("wiring"), "{}", err.reason);
}

#[test]
fn unknown_record_key() {
    let yaml = "version: 1\nname: x\ncomponents:\n  - { id: a, type: fuel_tank, colour: red }\n";
    assert!(load_yaml(yaml).is_err());
}

#[test]
fn missing_required_field() {
    let yaml = "version: 1\nname: x\ncomponents:\n  - { id: a }\n";
    let err = load_yaml(yaml).unwrap_err();
    assert!(err.reason.contains("type"), "{}", err.reason);
}

#[test]
fn wrong_value_type() {
    let yaml = "version: 1\nname: x\ncomponents: { id: a }\n";
    assert!(load_yaml(yaml).is_err());
}

#[test]
fn ill_formed_identifier_is_located() {
    let yaml = "version: 1\nname: x\ncomponents:\n  - { id: a, type: fuel_tank }\n  - { id: 'b c', type: fuel_tank }\n";
    let err = load_yaml(yaml).unwrap_err();
    assert_eq!(err.location, "components[1].id");
}

#[test]
fn legacy_fixture_migrates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/architectures/legacy_v0.yaml");
    let doc = load(&path).unwrap();
    assert_eq!(doc.version, LATEST_VERSION);
    assert_eq!(doc.buses[0].inputs, ["battery_pack_1"]);
    assert!(doc.buses[0].members.is_empty());
}

#[test]
fn missing_file_is_a_read_error() {
    let err = load(Path::new("/definitely/not/here.yaml")).unwrap_err();
    assert!(matches!(err, SchemaError::Read { .. }));
}
