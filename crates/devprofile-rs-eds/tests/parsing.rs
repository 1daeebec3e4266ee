// crates/devprofile-rs-eds/tests/parsing.rs

use devprofile_rs::model::{AccessRights, DataTypeRef, MenuItem, ParameterFlags, PrimitiveType, StringEncoding};
use devprofile_rs::{Config, Grammar};
use devprofile_rs_eds::load_eds;
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

fn en() -> Vec<String> {
    vec!["en".to_string()]
}

#[test]
fn test_minimal_document() {
    let profile = load_eds(&load_test_file("minimal.eds"), &Config::default())
        .expect("Failed to parse minimal EDS");

    assert_eq!(profile.grammar, Grammar::SectionText);
    assert_eq!(profile.document.schema_version, "1.0");
    assert_eq!(profile.document.release_date.as_deref(), Some("04-03-2024"));
    assert_eq!(profile.vendor.id, 42);
    assert_eq!(profile.vendor.name, "Example Sensors");
    assert_eq!(profile.identity.device_id, 1001);
    assert_eq!(profile.identity.revision.as_deref(), Some("1.2"));
    assert_eq!(profile.text(&profile.identity.product_name, &en()), "Minimal Module");

    assert_eq!(profile.parameters.len(), 1);
    let p = &profile.parameters[0];
    assert_eq!(p.id, "Param10");
    assert_eq!(p.index, 10);
    assert_eq!(p.access, AccessRights::ReadOnly);
    assert_eq!(p.default.as_deref(), Some("0"));
    assert_eq!(
        p.data_type,
        DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 16 })
    );
    assert_eq!(profile.text(&p.name, &en()), "Setpoint");
    assert!(p.description.is_none());

    // Keys without a model field are kept verbatim.
    assert_eq!(
        profile.extension("File", "DescText"),
        Some("\"Minimal test device\"")
    );
    assert!(profile.process_data.is_empty());
    assert!(profile.opaque_sections.is_empty());
}

#[test]
fn test_device_identity() {
    let profile = load_eds(&load_test_file("io_module.eds"), &Config::default()).unwrap();

    // Hexadecimal codes are accepted.
    assert_eq!(profile.identity.vendor_id, 0x1234);
    assert_eq!(profile.vendor.id, 0x1234);
    assert_eq!(profile.identity.device_id, 77);
    assert_eq!(profile.identity.revision.as_deref(), Some("3.14"));
    // Adjacent strings are concatenated.
    assert_eq!(
        profile.text(&profile.identity.product_name, &en()),
        "AIO-4 Analog Module"
    );
    assert_eq!(profile.extension("Device", "ProdType"), Some("12"));
    assert_eq!(profile.extension("Device", "Catalog"), Some("\"AIO-4-A\""));
    assert_eq!(profile.extension("File", "CreateTime"), Some("10:30:00"));
}

#[test]
fn test_parameters() {
    let profile = load_eds(&load_test_file("io_module.eds"), &Config::default()).unwrap();
    assert_eq!(profile.parameters.len(), 8);
    assert_eq!(profile.extension("Params", "MaxInst"), Some("8"));

    let mode = profile.parameter("Param1").expect("Param1 missing");
    assert_eq!(mode.access, AccessRights::ReadOnly);
    assert!(mode.flags.contains(ParameterFlags::ENUMERATED));
    assert_eq!(mode.enumeration.len(), 4);
    assert_eq!(mode.enumeration[2].value, "2");
    assert_eq!(profile.text(&mode.enumeration[2].name, &en()), "Window");

    let input = profile.parameter("Param2").unwrap();
    assert_eq!(
        input.data_type,
        DataTypeRef::Primitive(PrimitiveType::Integer { bits: 16 })
    );
    assert_eq!(input.access, AccessRights::ReadWrite);
    assert_eq!(input.unit.as_deref(), Some("mV"));
    assert_eq!(input.min.as_deref(), Some("-10000"));
    assert_eq!(input.link_path.as_deref(), Some("6,\"20 04 24 01 30 03\""));
    assert_eq!(input.scaling.as_deref(), Some("1,10,0,0,,,,"));
    assert_eq!(input.decimal_places, Some(0));
    let help = input.description.as_ref().expect("help text missing");
    assert_eq!(profile.text(help, &en()), "Channel 1 value");

    let filter = profile.parameter("Param4").unwrap();
    assert_eq!(filter.data_type, DataTypeRef::Primitive(PrimitiveType::Float32));
    assert_eq!(filter.default.as_deref(), Some("2.5"));
    assert_eq!(filter.scaling, None);
    assert_eq!(filter.decimal_places, Some(1));

    let tag = profile.parameter("Param5").unwrap();
    assert_eq!(
        tag.data_type,
        DataTypeRef::Primitive(PrimitiveType::String {
            length: 16,
            encoding: StringEncoding::Utf8
        })
    );
    assert_eq!(tag.default.as_deref(), Some("AIO \"north\""));
    assert_eq!(tag.min, None);

    let status = profile.parameter_by_index(8).unwrap();
    assert_eq!(
        status.data_type,
        DataTypeRef::Primitive(PrimitiveType::BitString { bits: 16 })
    );
    assert_eq!(status.access, AccessRights::ReadOnly);
    assert_eq!(status.flags.bits(), 0x0100);
}

#[test]
fn test_groups_become_menus() {
    let profile = load_eds(&load_test_file("io_module.eds"), &Config::default()).unwrap();
    let menus = &profile.user_interface.menus;
    assert_eq!(menus.len(), 3);
    assert_eq!(menus[0].id, "Group1");
    assert_eq!(profile.text(menus[0].name.as_ref().unwrap(), &en()), "Inputs");
    assert_eq!(
        menus[1].items,
        vec![MenuItem::variable("Param6"), MenuItem::variable("Param7")]
    );
}

#[test]
fn test_assemblies_become_process_data() {
    let profile = load_eds(&load_test_file("io_module.eds"), &Config::default()).unwrap();

    let input = profile.process_data.input.as_ref().expect("input assembly missing");
    assert_eq!(input.id, "Assem100");
    assert_eq!(input.bit_length, 48);
    let nodes = input.items.nodes();
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[1].reference.as_deref(), Some("Param3"));
    assert_eq!(nodes[1].bit_offset, 16);
    // Padding has no name and no reference.
    assert_eq!(nodes[2].bit_offset, 32);
    assert!(nodes[2].reference.is_none());
    assert!(nodes[2].name.is_none());
    assert_eq!(nodes[3].reference.as_deref(), Some("Param1"));
    assert_eq!(
        nodes[3].data_type,
        DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 })
    );

    let output = profile.process_data.output.as_ref().expect("output assembly missing");
    assert_eq!(output.bit_length, 24);
    assert_eq!(output.items.nodes()[0].data_type, DataTypeRef::Primitive(PrimitiveType::Boolean));
    assert_eq!(output.items.nodes()[2].bit_offset, 8);
}

#[test]
fn test_unmodeled_sections_are_opaque() {
    let profile = load_eds(&load_test_file("io_module.eds"), &Config::default()).unwrap();
    let names: Vec<&str> = profile
        .opaque_sections
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, ["Device Classification", "Connection Manager"]);

    let manager = &profile.opaque_sections[1];
    assert!(manager.body.starts_with("$ exclusive owner connection"));
    assert!(manager.body.ends_with("\"Exclusive Owner\",\"\";"));
}

#[test]
fn test_section_and_key_names_are_case_insensitive() {
    let eds = "[device]\nvendcode = 1;\nPRODCODE = 2;\nProdName = \"X\";\n";
    let profile = load_eds(eds.as_bytes(), &Config::default()).unwrap();
    assert_eq!(profile.identity.vendor_id, 1);
    assert_eq!(profile.identity.device_id, 2);
}
