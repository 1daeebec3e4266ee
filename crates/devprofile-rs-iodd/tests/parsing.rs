// crates/devprofile-rs-iodd/tests/parsing.rs

use devprofile_rs::model::{
    AccessRights, ArrayElement, DataTypeRef, Direction, EventKind, MenuItem, ParameterFlags,
    PrimitiveType, Role, StringEncoding,
};
use devprofile_rs::{Config, Grammar};
use devprofile_rs_iodd::load_iodd;
use std::fs;
use std::path::PathBuf;

/// Helper function to load a test file from the `tests/data/` directory.
fn load_test_file(name: &str) -> Vec<u8> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);

    fs::read(&path).unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

#[test]
fn test_minimal_document() {
    let profile = load_iodd(&load_test_file("minimal.xml"), &Config::default())
        .expect("Failed to parse minimal IODD");

    assert_eq!(profile.grammar, Grammar::Markup);
    assert_eq!(profile.document.schema_version, "1.1");
    assert_eq!(profile.vendor.id, 42);
    assert_eq!(profile.vendor.name, "Example Sensors");
    assert_eq!(profile.identity.device_id, 1001);

    assert_eq!(profile.parameters.len(), 1);
    let p = &profile.parameters[0];
    assert_eq!(p.index, 10);
    assert_eq!(p.access, AccessRights::ReadOnly);
    assert_eq!(p.default.as_deref(), Some("0"));
    assert_eq!(profile.text(&p.name, &["en".to_string()]), "Setpoint");
}

#[test]
fn test_identity_and_variants() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();

    // Hexadecimal attributes are accepted.
    assert_eq!(profile.identity.vendor_id, 0x0136);
    assert_eq!(profile.identity.device_id, 0x0A0B0C);
    assert_eq!(profile.identity.revision.as_deref(), Some("2"));
    assert_eq!(profile.document.copyright.as_deref(), Some("Example Sensors GmbH"));

    assert_eq!(profile.variants.len(), 2);
    assert_eq!(profile.variants[0].symbol.as_deref(), Some("ds100-pic.png"));
    assert!(profile.variants[1].description.is_none());

    let features = profile.features.as_ref().expect("Features missing");
    assert!(features.block_parameter);
    let locks = features.access_locks.as_ref().unwrap();
    assert!(!locks.parameter);
    assert!(locks.data_storage);
}

#[test]
fn test_text_fallback_order() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();
    let name = &profile.identity.product_name;

    let german = vec!["de".to_string(), "en".to_string()];
    assert_eq!(profile.text(name, &german), "DS Abstandssensor");

    // No German text for the device family: falls back to the primary language.
    let family = profile.identity.device_family.as_ref().unwrap();
    assert_eq!(profile.text(family, &german), "Distance");

    // Unknown languages fall back to the primary language as well.
    assert_eq!(profile.text(name, &["fr".to_string()]), "DS Distance Sensor");
    assert_eq!(profile.texts.languages, vec!["en", "de"]);
}

#[test]
fn test_variables() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();

    assert_eq!(profile.standard_variables.len(), 2);
    assert_eq!(profile.standard_variables[1].fixed_length_restriction, Some(32));
    assert_eq!(profile.standard_variables[1].excluded_from_data_storage, Some(true));

    let mode = profile.parameter("V_Mode").unwrap();
    assert_eq!(mode.data_type, DataTypeRef::Custom("DT_SwitchMode".into()));
    assert!(mode.description.is_some());

    let threshold = profile.parameter_by_index(65).unwrap();
    assert_eq!(threshold.default.as_deref(), Some("0x0100"));
    assert_eq!(threshold.constraints.len(), 1);
    assert!(!threshold.flags.contains(ParameterFlags::DYNAMIC));

    let temperature = profile.parameter("V_Temperature").unwrap();
    assert!(temperature.flags.contains(ParameterFlags::DYNAMIC));
    assert_eq!(
        temperature.data_type,
        DataTypeRef::Primitive(PrimitiveType::Integer { bits: 16 })
    );

    let tag = profile.parameter("V_Tag").unwrap();
    assert!(tag.flags.contains(ParameterFlags::EXCLUDED_FROM_DATA_STORAGE));
    assert_eq!(
        tag.data_type,
        DataTypeRef::Primitive(PrimitiveType::String {
            length: 16,
            encoding: StringEncoding::Ascii
        })
    );

    let history = profile.parameter("V_History").unwrap();
    assert_eq!(
        history.data_type,
        DataTypeRef::Array {
            count: 4,
            element: ArrayElement::Primitive(PrimitiveType::Float32),
            subindex_access: true
        }
    );
    assert_eq!(history.data_type.bit_length(), Some(128));
}

#[test]
fn test_record_variable() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();
    let calibration = profile.parameter("V_Calibration").unwrap();

    assert_eq!(calibration.access, AccessRights::WriteOnly);
    let nodes = calibration.record_items.nodes();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].bit_offset, 8);
    assert_eq!(nodes[0].bit_length, 16);
    assert_eq!(nodes[0].access_restriction, Some(AccessRights::ReadWrite));
    assert_eq!(nodes[1].enumeration.len(), 2);
    assert!(nodes[1].description.is_some());
}

#[test]
fn test_custom_record_type_is_flattened() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();
    let pd_in = profile.custom_types.get("DT_PDIn").unwrap();

    assert_eq!(
        pd_in.data_type,
        DataTypeRef::Record {
            bit_length: 32,
            subindex_access: false
        }
    );
    let layout = &pd_in.items;
    assert_eq!(layout.len(), 5);
    assert_eq!(layout.roots().collect::<Vec<_>>(), vec![0, 1, 4]);
    assert_eq!(layout.children(1).collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(layout.depth(3), 1);

    // The bit length of a referenced custom type is filled in.
    let mode = layout.get(4).unwrap();
    assert_eq!(mode.data_type, DataTypeRef::Custom("DT_SwitchMode".into()));
    assert_eq!(mode.bit_length, 8);
}

#[test]
fn test_process_data() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();
    let pd = &profile.process_data;

    assert_eq!(pd.collection_id.as_deref(), Some("P_Data"));
    let input = pd.get(Direction::Input).unwrap();
    assert_eq!(input.bit_length, 32);
    assert_eq!(input.data_type, DataTypeRef::Custom("DT_PDIn".into()));
    let output = pd.get(Direction::Output).unwrap();
    assert_eq!(output.bit_length, 8);
    assert_eq!(pd.items().count(), 2);
}

#[test]
fn test_diagnostics() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();

    assert_eq!(profile.error_types.len(), 2);
    assert!(profile.error_types[0].standard);
    assert_eq!(profile.error_types[1].additional_code, 0x30);

    assert_eq!(profile.events.len(), 2);
    assert!(profile.events[0].standard);
    assert_eq!(profile.events[1].kind, Some(EventKind::Warning));
}

#[test]
fn test_user_interface() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();
    let ui = &profile.user_interface;

    assert_eq!(ui.menus.len(), 3);
    let param_menu = ui.menu("M_Param").unwrap();
    assert_eq!(param_menu.items.len(), 4);
    match &param_menu.items[1] {
        MenuItem::Variable {
            variable_id,
            unit_code,
            access_restriction,
            buttons,
            ..
        } => {
            assert_eq!(variable_id, "V_Threshold");
            assert_eq!(unit_code.as_deref(), Some("1013"));
            assert_eq!(*access_restriction, Some(AccessRights::ReadOnly));
            assert_eq!(buttons.len(), 1);
        }
        other => panic!("Expected a variable reference, got {:?}", other),
    }
    assert!(matches!(
        param_menu.items[2],
        MenuItem::RecordItem { subindex: 1, .. }
    ));

    let roles: Vec<_> = ui.role_sets.iter().map(|s| s.role).collect();
    assert_eq!(roles, vec![Role::Observer, Role::Specialist]);
}

#[test]
fn test_communication_wiring_and_test() {
    let profile = load_iodd(&load_test_file("distance_sensor.xml"), &Config::default()).unwrap();

    let comm = profile.communication.as_ref().unwrap();
    assert_eq!(comm.bitrate.as_deref(), Some("COM2"));
    assert_eq!(comm.m_sequence_capability, Some(0x0B));

    let wiring = profile.wiring.as_ref().unwrap();
    assert_eq!(wiring.wires.len(), 4);
    assert_eq!(wiring.wires[3].color.as_deref(), Some("BK"));

    let slots: Vec<_> = profile.test.entries.iter().map(|e| e.slot).collect();
    assert_eq!(slots, vec![1, 7]);
    assert_eq!(profile.test.entries[1].triggers.len(), 1);
}

#[test]
fn test_conditional_process_data_variants() {
    let profile = load_iodd(&load_test_file("switching_module.xml"), &Config::default()).unwrap();
    let pd = &profile.process_data;

    assert_eq!(pd.collection_id.as_deref(), Some("P_Standard"));
    let condition = pd.condition.as_ref().unwrap();
    assert_eq!(condition.variable_id, "V_PdSelect");
    assert_eq!(condition.subindex, None);
    assert_eq!(condition.value, "0");
    assert_eq!(pd.get(Direction::Input).unwrap().bit_length, 16);
    assert!(pd.get(Direction::Output).is_none());

    assert_eq!(pd.alternatives.len(), 1);
    let extended = &pd.alternatives[0];
    assert_eq!(extended.id, "P_Extended");
    assert_eq!(extended.condition.as_ref().unwrap().value, "1");
    let input = extended.input.as_ref().unwrap();
    assert_eq!(input.bit_length, 64);
    assert_eq!(
        input.data_type,
        DataTypeRef::Array {
            count: 4,
            element: ArrayElement::Custom("DT_Channel".into()),
            subindex_access: false,
        }
    );
    assert_eq!(extended.output.as_ref().unwrap().bit_length, 8);

    let labels: Vec<String> = pd.all_items().map(|(label, _)| label).collect();
    assert_eq!(labels, ["input", "P_Extended/input", "P_Extended/output"]);
}

#[test]
fn test_record_item_info() {
    let profile = load_iodd(&load_test_file("switching_module.xml"), &Config::default()).unwrap();
    let limits = profile.parameters.iter().find(|p| p.id == "V_Limits").unwrap();

    assert_eq!(limits.record_item_info.len(), 2);
    let low = &limits.record_item_info[0];
    assert_eq!(low.subindex, 1);
    assert_eq!(low.default.as_deref(), Some("100"));
    assert_eq!(low.modifies_other_variables, Some(true));
    assert_eq!(low.excluded_from_data_storage, None);
    let high = &limits.record_item_info[1];
    assert_eq!(high.subindex, 2);
    assert_eq!(high.excluded_from_data_storage, Some(false));

    // Single values of a variable live in its inline datatype.
    let select = profile.parameters.iter().find(|p| p.id == "V_PdSelect").unwrap();
    let values: Vec<&str> = select.enumeration.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, ["0", "1"]);
}

#[test]
fn test_array_of_custom_type() {
    let profile = load_iodd(&load_test_file("switching_module.xml"), &Config::default()).unwrap();
    let channels = profile.parameters.iter().find(|p| p.id == "V_Channels").unwrap();

    assert_eq!(
        channels.data_type,
        DataTypeRef::Array {
            count: 4,
            element: ArrayElement::Custom("DT_Channel".into()),
            subindex_access: true,
        }
    );
    assert_eq!(channels.record_item_info[0].subindex, 3);
    assert_eq!(
        devprofile_rs::validate::resolved_bit_length(&channels.data_type, &profile.custom_types),
        Some(64)
    );
}
