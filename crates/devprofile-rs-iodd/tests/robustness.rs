// crates/devprofile-rs-iodd/tests/robustness.rs

//! Integration tests focused on error handling and edge cases.
//!
//! These tests ensure the parser reports malformed documents, invalid
//! values, dangling references and resource abuse with the right error kind,
//! without panicking.

use devprofile_rs::{Config, Limits, ParseError};
use devprofile_rs_iodd::load_iodd;

/// A minimal valid IODD used as a base for creating corrupted test cases.
const MINIMAL_VALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<IODevice xmlns="http://www.io-link.com/IODD/2010/10" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.io-link.com/IODD/2010/10 IODD1.1.xsd">
  <DocumentInfo version="V1.0"/>
  <ProfileBody>
    <DeviceIdentity vendorId="42" vendorName="ACME" deviceId="7">
      <DeviceName textId="TI_Name"/>
    </DeviceIdentity>
    <DeviceFunction>
      <VariableCollection>
        <Variable id="V_A" index="10" accessRights="ro" defaultValue="0">
          <Datatype xsi:type="UIntegerT" bitLength="8"/>
          <Name textId="TI_A"/>
        </Variable>
      </VariableCollection>
    </DeviceFunction>
  </ProfileBody>
  <ExternalTextCollection>
    <PrimaryLanguage xml:lang="en">
      <Text id="TI_Name" value="Device"/>
      <Text id="TI_A" value="A"/>
    </PrimaryLanguage>
  </ExternalTextCollection>
</IODevice>"#;

fn load(xml: &str) -> Result<devprofile_rs::DeviceProfile, ParseError> {
    load_iodd(xml.as_bytes(), &Config::default())
}

#[test]
fn test_minimal_template_is_valid() {
    assert!(load(MINIMAL_VALID_XML).is_ok());
}

#[test]
fn test_malformed_xml() {
    let xml = MINIMAL_VALID_XML.replace("</ProfileBody>", "</ProfileBdy>");
    assert!(matches!(load(&xml), Err(ParseError::Syntax { .. })));
}

#[test]
fn test_missing_device_name() {
    let xml = MINIMAL_VALID_XML.replace(r#"<DeviceName textId="TI_Name"/>"#, "");
    assert!(matches!(load(&xml), Err(ParseError::InvalidStructure { .. })));
}

#[test]
fn test_missing_mandatory_element() {
    let xml = MINIMAL_VALID_XML.replace(r#"<DocumentInfo version="V1.0"/>"#, "");
    assert!(matches!(load(&xml), Err(ParseError::InvalidStructure { .. })));
}

#[test]
fn test_unsupported_schema_major() {
    let xml = MINIMAL_VALID_XML.replace("IODD1.1.xsd", "IODD2.0.xsd");
    assert_eq!(
        load(&xml),
        Err(ParseError::UnsupportedSchemaVersion {
            found: "2.0".into()
        })
    );
}

#[test]
fn test_unresolved_text_reference() {
    let xml = MINIMAL_VALID_XML.replace(r#"<Name textId="TI_A"/>"#, r#"<Name textId="TI_Missing"/>"#);
    match load(&xml) {
        Err(ParseError::UnresolvedReference { path, id }) => {
            assert_eq!(id, "TI_Missing");
            assert!(path.contains("V_A"), "path was {}", path);
        }
        other => panic!("Expected UnresolvedReference, got {:?}", other),
    }
}

#[test]
fn test_text_only_in_secondary_language_is_unresolved() {
    let xml = MINIMAL_VALID_XML
        .replace(r#"<Text id="TI_A" value="A"/>"#, "")
        .replace(
            "</PrimaryLanguage>",
            r#"</PrimaryLanguage><Language xml:lang="de"><Text id="TI_A" value="A"/></Language>"#,
        );
    assert!(matches!(
        load(&xml),
        Err(ParseError::UnresolvedReference { .. })
    ));
}

#[test]
fn test_unresolved_datatype_reference() {
    let xml = MINIMAL_VALID_XML.replace(
        r#"<Datatype xsi:type="UIntegerT" bitLength="8"/>"#,
        r#"<DatatypeRef datatypeId="DT_Nowhere"/>"#,
    );
    assert!(matches!(
        load(&xml),
        Err(ParseError::UnresolvedReference { .. })
    ));
}

#[test]
fn test_duplicate_index() {
    let second = r#"<Variable id="V_B" index="0x0A" accessRights="rw">
          <Datatype xsi:type="BooleanT"/>
          <Name textId="TI_A"/>
        </Variable>
      </VariableCollection>"#;
    let xml = MINIMAL_VALID_XML.replace("</VariableCollection>", second);
    assert!(matches!(load(&xml), Err(ParseError::InvalidStructure { .. })));
}

#[test]
fn test_default_value_out_of_range() {
    let xml = MINIMAL_VALID_XML.replace(r#"defaultValue="0""#, r#"defaultValue="256""#);
    match load(&xml) {
        Err(ParseError::ValueOutOfRange { path, value, .. }) => {
            assert_eq!(value, "256");
            assert!(path.ends_with("@defaultValue"), "path was {}", path);
        }
        other => panic!("Expected ValueOutOfRange, got {:?}", other),
    }
}

#[test]
fn test_index_out_of_range() {
    let xml = MINIMAL_VALID_XML.replace(r#"index="10""#, r#"index="0x10000""#);
    assert!(matches!(load(&xml), Err(ParseError::ValueOutOfRange { .. })));
}

#[test]
fn test_non_numeric_index() {
    let xml = MINIMAL_VALID_XML.replace(r#"index="10""#, r#"index="ten""#);
    assert!(matches!(load(&xml), Err(ParseError::Syntax { .. })));
}

#[test]
fn test_overlapping_record_items() {
    let record = r#"<Datatype xsi:type="RecordT" bitLength="16">
            <RecordItem subindex="1" bitOffset="0">
              <SimpleDatatype xsi:type="UIntegerT" bitLength="16"/><Name textId="TI_A"/>
            </RecordItem>
            <RecordItem subindex="2" bitOffset="8">
              <SimpleDatatype xsi:type="UIntegerT" bitLength="8"/><Name textId="TI_A"/>
            </RecordItem>
          </Datatype>"#;
    let xml = MINIMAL_VALID_XML
        .replace(r#"<Datatype xsi:type="UIntegerT" bitLength="8"/>"#, record)
        .replace(r#" defaultValue="0""#, "");
    assert!(matches!(load(&xml), Err(ParseError::InvalidStructure { .. })));
}

#[test]
fn test_entity_expansion_is_refused() {
    let xml = MINIMAL_VALID_XML.replacen(
        "\n<IODevice",
        "\n<!DOCTYPE IODevice [<!ENTITY lol \"lol\"><!ENTITY lol2 \"&lol;&lol;&lol;\">]>\n<IODevice",
        1,
    );
    assert!(matches!(
        load(&xml),
        Err(ParseError::ResourceLimitExceeded {
            limit: "entity_declarations",
            ..
        })
    ));
}

#[test]
fn test_external_entity_is_refused() {
    let xml = MINIMAL_VALID_XML.replacen(
        "\n<IODevice",
        "\n<!DOCTYPE IODevice SYSTEM \"file:///etc/passwd\">\n<IODevice",
        1,
    );
    assert!(matches!(
        load(&xml),
        Err(ParseError::ResourceLimitExceeded {
            limit: "external_references",
            ..
        })
    ));
}

#[test]
fn test_depth_limit() {
    let config = Config {
        limits: Limits {
            max_depth: 4,
            ..Limits::default()
        },
        ..Config::default()
    };
    let result = load_iodd(MINIMAL_VALID_XML.as_bytes(), &config);
    assert!(matches!(
        result,
        Err(ParseError::ResourceLimitExceeded {
            limit: "max_depth",
            max: 4,
            ..
        })
    ));
}

#[test]
fn test_size_limit() {
    let config = Config {
        limits: Limits {
            max_input_bytes: 128,
            ..Limits::default()
        },
        ..Config::default()
    };
    let result = load_iodd(MINIMAL_VALID_XML.as_bytes(), &config);
    assert!(matches!(
        result,
        Err(ParseError::ResourceLimitExceeded {
            limit: "max_input_bytes",
            ..
        })
    ));
}

#[test]
fn test_declared_latin1_encoding() {
    let xml = MINIMAL_VALID_XML
        .replace(r#"encoding="UTF-8""#, r#"encoding="ISO-8859-1""#)
        .replace(r#"value="Device""#, "value=\"Ger\u{e4}t\"");
    // Re-encode as Latin-1: every char of the document is below U+0100.
    let bytes: Vec<u8> = xml.chars().map(|c| c as u32 as u8).collect();
    let profile = load_iodd(&bytes, &Config::default()).unwrap();
    let name = &profile.identity.product_name;
    assert_eq!(profile.text(name, &["en".to_string()]), "Ger\u{e4}t");
}

#[test]
fn test_undeclared_invalid_utf8() {
    let mut bytes = MINIMAL_VALID_XML.as_bytes().to_vec();
    let pos = MINIMAL_VALID_XML.find("Device\"").unwrap();
    bytes[pos] = 0xFF;
    assert!(matches!(
        load_iodd(&bytes, &Config::default()),
        Err(ParseError::Encoding { .. })
    ));
}

#[test]
fn test_utf16_with_bom() {
    let xml = MINIMAL_VALID_XML.replace(r#" encoding="UTF-8""#, "");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in xml.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let profile = load_iodd(&bytes, &Config::default()).unwrap();
    assert_eq!(profile.vendor.name, "ACME");
}

#[test]
fn test_wrong_root_element() {
    let xml = r#"<?xml version="1.0"?><EDS/>"#;
    assert!(matches!(load(xml), Err(ParseError::InvalidStructure { .. })));
}

#[test]
fn test_empty_input() {
    assert!(load("").is_err());
}
