// crates/devprofile-rs-eds/tests/robustness.rs

//! Integration tests focused on error handling and edge cases.
//!
//! Malformed entries, invalid values, dangling references and oversized
//! input must be reported with the right error kind, never with a panic.

use devprofile_rs::{Config, Limits, ParseError};
use devprofile_rs_eds::{load_eds, save_eds_to_string};

/// A minimal valid document used as a base for creating corrupted test cases.
const MINIMAL_VALID_EDS: &str = "[File]
    Revision = 1.0;

[Device]
    VendCode = 42;
    ProdCode = 7;
    ProdName = \"Device\";

[Params]
    Param1 = 0,,0x0010,0xC6,1,\"A\",\"\",\"\",0,255,0,,,,,,,,,;

[Groups]
    Group1 = \"Main\",1,1;

[Assembly]
    Assem100 = \"Input\",\"\",1,0x0000,,,8,Param1;
";

fn load(eds: &str) -> Result<devprofile_rs::DeviceProfile, ParseError> {
    load_eds(eds.as_bytes(), &Config::default())
}

fn path_of(result: Result<devprofile_rs::DeviceProfile, ParseError>) -> String {
    match result {
        Err(ParseError::InvalidStructure { path, .. })
        | Err(ParseError::UnresolvedReference { path, .. })
        | Err(ParseError::ValueOutOfRange { path, .. }) => path,
        other => panic!("Expected a path-carrying error, got {:?}", other),
    }
}

#[test]
fn test_minimal_template_is_valid() {
    let profile = load(MINIMAL_VALID_EDS).expect("template must parse");
    assert!(profile.process_data.input.is_some());
}

// --- Syntax ---

#[test]
fn test_unterminated_entry() {
    let eds = format!("{}    Trailing = 1\n", MINIMAL_VALID_EDS);
    assert!(matches!(load(&eds), Err(ParseError::Syntax { .. })));
}

#[test]
fn test_quote_inside_bare_field() {
    // Without its ';' the entry runs into the next line.
    let eds = MINIMAL_VALID_EDS.replace("ProdCode = 7;", "ProdCode = 7");
    assert!(matches!(load(&eds), Err(ParseError::Syntax { .. })));
}

#[test]
fn test_entry_before_first_section() {
    let eds = format!("Orphan = 1;\n{}", MINIMAL_VALID_EDS);
    match load(&eds) {
        Err(ParseError::Syntax { location, .. }) => assert_eq!(location, "line 1"),
        other => panic!("Expected Syntax, got {:?}", other),
    }
}

#[test]
fn test_unterminated_string() {
    let eds = MINIMAL_VALID_EDS.replace("ProdName = \"Device\";", "ProdName = \"Device;");
    assert!(matches!(load(&eds), Err(ParseError::Syntax { .. })));
}

#[test]
fn test_non_numeric_code() {
    let eds = MINIMAL_VALID_EDS.replace("VendCode = 42;", "VendCode = forty-two;");
    assert!(matches!(load(&eds), Err(ParseError::Syntax { .. })));
}

#[test]
fn test_empty_input() {
    assert_eq!(path_of(load("")), "Device");
    assert_eq!(path_of(load("$ only a comment\n")), "Device");
}

// --- Structure ---

#[test]
fn test_missing_device_section() {
    let eds = MINIMAL_VALID_EDS.replace("[Device]", "[Devices]");
    // The renamed section is opaque, so [Device] is missing.
    assert_eq!(path_of(load(&eds)), "Device");
}

#[test]
fn test_missing_vendor_code() {
    let eds = MINIMAL_VALID_EDS.replace("    VendCode = 42;\n", "");
    assert_eq!(path_of(load(&eds)), "Device/VendCode");
}

#[test]
fn test_wrong_field_count() {
    let eds = MINIMAL_VALID_EDS.replace("0,255,0,,,,,,,,,;", "0,255,0,,,,,,,,;");
    assert_eq!(path_of(load(&eds)), "Params/Param1");
}

#[test]
fn test_duplicate_section() {
    let eds = format!("{}\n[Device]\n    VendCode = 1;\n", MINIMAL_VALID_EDS);
    assert_eq!(path_of(load(&eds)), "Device");
}

#[test]
fn test_duplicate_key_ignores_case() {
    let eds = MINIMAL_VALID_EDS.replace("ProdCode = 7;", "ProdCode = 7;\n    PRODCODE = 8;");
    assert!(matches!(load(&eds), Err(ParseError::InvalidStructure { .. })));
}

#[test]
fn test_group_count_mismatch() {
    let eds = MINIMAL_VALID_EDS.replace("Group1 = \"Main\",1,1;", "Group1 = \"Main\",2,1;");
    assert_eq!(path_of(load(&eds)), "Groups/Group1");
}

#[test]
fn test_minor_revision_without_major() {
    let eds = MINIMAL_VALID_EDS.replace("ProdCode = 7;", "ProdCode = 7;\n    MinRev = 2;");
    assert_eq!(path_of(load(&eds)), "Device/MinRev");
}

// --- Values ---

#[test]
fn test_descriptor_out_of_range() {
    let eds = MINIMAL_VALID_EDS.replace("0x0010,0xC6", "0x1010,0xC6");
    assert_eq!(path_of(load(&eds)), "Params/Param1/Descriptor");
}

#[test]
fn test_unknown_type_code() {
    let eds = MINIMAL_VALID_EDS.replace("0xC6,1", "0xEE,1");
    assert_eq!(path_of(load(&eds)), "Params/Param1/DataType");
}

#[test]
fn test_size_does_not_match_type() {
    let eds = MINIMAL_VALID_EDS.replace("0xC6,1", "0xC6,2");
    assert_eq!(path_of(load(&eds)), "Params/Param1/DataSize");
}

#[test]
fn test_default_out_of_range() {
    let eds = MINIMAL_VALID_EDS.replace("0,255,0,", "0,255,300,");
    match load(&eds) {
        Err(ParseError::ValueOutOfRange { path, value, .. }) => {
            assert_eq!(path, "Parameter[Param1]/@defaultValue");
            assert_eq!(value, "300");
        }
        other => panic!("Expected ValueOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_vendor_code_wider_than_16_bits() {
    let eds = MINIMAL_VALID_EDS.replace("VendCode = 42;", "VendCode = 70000;");
    assert_eq!(path_of(load(&eds)), "Device/VendCode");
}

// --- References ---

#[test]
fn test_enumeration_without_parameter() {
    let eds = MINIMAL_VALID_EDS.replace("[Groups]", "    Enum9 = 0,\"Off\";\n\n[Groups]");
    match load(&eds) {
        Err(ParseError::UnresolvedReference { path, id }) => {
            assert_eq!(path, "Params/Enum9");
            assert_eq!(id, "Param9");
        }
        other => panic!("Expected UnresolvedReference, got {:?}", other),
    }
}

#[test]
fn test_group_references_unknown_parameter() {
    let eds = MINIMAL_VALID_EDS.replace("Group1 = \"Main\",1,1;", "Group1 = \"Main\",1,5;");
    assert!(matches!(
        load(&eds),
        Err(ParseError::UnresolvedReference { id, .. }) if id == "Param5"
    ));
}

#[test]
fn test_assembly_references_unknown_parameter() {
    let eds = MINIMAL_VALID_EDS.replace("8,Param1;", "8,Param3;");
    assert!(matches!(
        load(&eds),
        Err(ParseError::UnresolvedReference { id, .. }) if id == "Param3"
    ));
}

#[test]
fn test_assembly_members_exceed_size() {
    let eds = MINIMAL_VALID_EDS.replace("8,Param1;", "8,Param1,8,;");
    assert_eq!(
        path_of(load(&eds)),
        "ProcessData[input]/RecordItem[1]/@bitOffset"
    );
}

#[test]
fn test_unrecognized_assembly_is_opaque() {
    let eds = MINIMAL_VALID_EDS.replace("\"Input\",\"\",1", "\"Config\",\"\",1");
    let profile = load(&eds).unwrap();
    assert!(profile.process_data.is_empty());
    assert_eq!(profile.opaque_sections.len(), 1);
    assert_eq!(profile.opaque_sections[0].name, "Assembly");
    assert_eq!(
        profile.opaque_sections[0].body,
        "Assem100 = \"Config\",\"\",1,0x0000,,,8,Param1;"
    );
}

#[test]
fn test_quoted_strings_in_braced_group_are_opaque_text() {
    let eds = format!(
        "{}\n[Capacity]\n    TSpec1 = {{\"tx\", 8}};\n    TSpec2 = {{\"rx, slow\", 16}}, 2;\n",
        MINIMAL_VALID_EDS
    );
    let profile = load(&eds).unwrap();
    let capacity = profile
        .opaque_sections
        .iter()
        .find(|s| s.name == "Capacity")
        .expect("capacity section kept");
    assert_eq!(
        capacity.body,
        "TSpec1 = {\"tx\", 8};\n    TSpec2 = {\"rx, slow\", 16}, 2;"
    );

    let written = save_eds_to_string(&profile, &Config::default()).unwrap();
    let reparsed = load(&written).unwrap();
    assert_eq!(profile.opaque_sections, reparsed.opaque_sections);
}

// --- Encodings ---

fn latin1_document() -> Vec<u8> {
    let mut bytes = MINIMAL_VALID_EDS
        .replace("ProdName = \"Device\";", "ProdName = \"Ger?t\";")
        .into_bytes();
    let at = bytes
        .iter()
        .position(|&b| b == b'?')
        .expect("placeholder missing");
    bytes[at] = 0xE4; // 'ä' in ISO-8859-1
    bytes
}

#[test]
fn test_latin1_without_configuration_is_rejected() {
    assert!(matches!(
        load_eds(&latin1_document(), &Config::default()),
        Err(ParseError::Encoding { .. })
    ));
}

#[test]
fn test_latin1_with_configured_encoding() {
    let mut config = Config::default();
    config.languages.section_text_encoding = Some("windows-1252".into());
    let profile = load_eds(&latin1_document(), &config).unwrap();
    assert_eq!(
        profile.text(&profile.identity.product_name, &config.languages.fallback_order),
        "Gerät"
    );
}

#[test]
fn test_utf16_with_byte_order_mark() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in MINIMAL_VALID_EDS.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let profile = load_eds(&bytes, &Config::default()).unwrap();
    assert_eq!(profile.identity.vendor_id, 42);
}

// --- Resource Limits ---

#[test]
fn test_input_size_limit() {
    let config = Config {
        limits: Limits {
            max_input_bytes: 64,
            ..Limits::default()
        },
        ..Config::default()
    };
    assert!(matches!(
        load_eds(MINIMAL_VALID_EDS.as_bytes(), &config),
        Err(ParseError::ResourceLimitExceeded {
            limit: "max_input_bytes",
            ..
        })
    ));
}

#[test]
fn test_element_limit() {
    let config = Config {
        limits: Limits {
            max_elements: 5,
            ..Limits::default()
        },
        ..Config::default()
    };
    assert!(matches!(
        load_eds(MINIMAL_VALID_EDS.as_bytes(), &config),
        Err(ParseError::ResourceLimitExceeded {
            limit: "max_elements",
            ..
        })
    ));
}
