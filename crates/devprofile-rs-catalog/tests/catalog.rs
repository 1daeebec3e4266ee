// crates/devprofile-rs-catalog/tests/catalog.rs

//! End-to-end behavior of the catalog: ingest, export, delete.

use devprofile_rs::config::Limits;
use devprofile_rs::{Config, Grammar, ParseError};
use devprofile_rs_catalog::{Catalog, CatalogError, ContainerError, StoreError, checksum, dispatch};
use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn load_test_file(name: &str) -> Vec<u8> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);

    fs::read(&path).unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

fn catalog() -> Catalog {
    let _ = env_logger::builder().is_test(true).try_init();
    Catalog::open_in_memory(Config::default()).unwrap()
}

fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(body).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_stored_profile_equals_parsed_profile() {
    let config = Config::default();
    let catalog = catalog();
    for name in [
        "minimal.xml",
        "distance_sensor.xml",
        "switching_module.xml",
        "minimal.eds",
        "io_module.eds",
    ] {
        let bytes = load_test_file(name);
        let grammar = dispatch::detect(&bytes).unwrap();
        let parsed = dispatch::parse(&bytes, grammar, &config).unwrap();

        let id = catalog.ingest(&bytes).unwrap();
        let exported = catalog.export(&id, None).unwrap();
        let reparsed = dispatch::parse(&exported, grammar, &config)
            .unwrap_or_else(|e| panic!("{}: export does not re-parse: {}", name, e));
        assert_eq!(parsed, reparsed, "{} did not survive the round trip", name);
    }
}

#[test]
fn test_export_is_deterministic() {
    let catalog = catalog();
    let id = catalog.ingest(&load_test_file("distance_sensor.xml")).unwrap();
    let first = catalog.export(&id, None).unwrap();
    let second = catalog.export(&id, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_ingest_is_idempotent() {
    let catalog = catalog();
    let bytes = load_test_file("minimal.xml");
    let first = catalog.ingest(&bytes).unwrap();
    let second = catalog.ingest(&bytes).unwrap();
    assert_eq!(first, second);
    assert_eq!(catalog.profile_ids().unwrap(), vec![first.clone()]);
    assert_eq!(catalog.find_by_checksum(&checksum(&bytes)).unwrap(), Some(first));
}

#[test]
fn test_minimal_document_scenario() {
    let config = Config::default();
    let catalog = catalog();
    let id = catalog.ingest(&load_test_file("minimal.xml")).unwrap();

    let exported = catalog.export(&id, None).unwrap();
    let profile = dispatch::parse(&exported, Grammar::Markup, &config).unwrap();
    assert_eq!(profile.identity.vendor_id, 42);
    assert_eq!(profile.identity.device_id, 1001);
    assert_eq!(profile.parameters.len(), 1);
    let setpoint = &profile.parameters[0];
    assert_eq!(setpoint.index, 10);
    assert_eq!(setpoint.default.as_deref(), Some("0"));
    assert_eq!(setpoint.access.as_str(), "ro");

    let report = catalog.run_quality(&id).unwrap();
    assert_eq!(report.score, 100.0);
    assert!(report.records.is_empty());
}

#[test]
fn test_export_prefers_configured_grammar() {
    let mut config = Config::default();
    config.export.target_grammar = Some(Grammar::SectionText);
    let catalog = Catalog::open_in_memory(config).unwrap();
    let id = catalog.ingest(&load_test_file("minimal.xml")).unwrap();

    let exported = catalog.export(&id, None).unwrap();
    assert_eq!(dispatch::detect(&exported).unwrap(), Grammar::SectionText);
    // An explicit grammar wins over the configured one.
    let exported = catalog.export(&id, Some(Grammar::Markup)).unwrap();
    assert_eq!(dispatch::detect(&exported).unwrap(), Grammar::Markup);
}

#[test]
fn test_delete_removes_profile_and_reports() {
    let catalog = catalog();
    let bytes = load_test_file("minimal.eds");
    let id = catalog.ingest(&bytes).unwrap();
    catalog.run_quality(&id).unwrap();

    catalog.delete(&id).unwrap();
    assert!(catalog.profile_ids().unwrap().is_empty());
    assert!(catalog.reports(&id).unwrap().is_empty());
    assert_eq!(catalog.find_by_checksum(&checksum(&bytes)).unwrap(), None);
    assert!(matches!(
        catalog.delete(&id),
        Err(CatalogError::Store(StoreError::NotFound(_)))
    ));

    // The same content can come back under a new id.
    let again = catalog.ingest(&bytes).unwrap();
    assert_ne!(again, id);
}

#[test]
fn test_parse_failure_stores_nothing() {
    let catalog = catalog();
    let mut broken = load_test_file("minimal.xml");
    broken.truncate(broken.len() / 2);
    let err = catalog.ingest(&broken).unwrap_err();
    assert_eq!(err.kind(), "ParseError");
    assert!(catalog.profile_ids().unwrap().is_empty());
}

#[test]
fn test_oversized_document_is_rejected() {
    let config = Config {
        limits: Limits {
            max_input_bytes: 256,
            ..Limits::default()
        },
        ..Config::default()
    };
    let catalog = Catalog::open_in_memory(config).unwrap();
    let err = catalog.ingest(&load_test_file("distance_sensor.xml")).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Parse(ParseError::ResourceLimitExceeded {
            limit: "max_input_bytes",
            ..
        })
    ));
}

#[test]
fn test_container_total_size_is_bounded() {
    let xml = load_test_file("distance_sensor.xml");
    let archive = zip_of(&[("a.xml", &xml[..]), ("b.xml", &xml[..]), ("c.xml", &xml[..])]);
    let config = Config {
        limits: Limits {
            max_container_total_bytes: 2 * xml.len() as u64,
            ..Limits::default()
        },
        ..Config::default()
    };
    let catalog = Catalog::open_in_memory(config).unwrap();
    let err = catalog.ingest_container(&archive).unwrap_err();
    assert_eq!(err.kind(), "ResourceLimitExceeded");
    assert!(matches!(
        err,
        CatalogError::Container(ContainerError::Limit(ParseError::ResourceLimitExceeded {
            limit: "max_container_total_bytes",
            ..
        }))
    ));
    assert!(catalog.profile_ids().unwrap().is_empty());
}

#[test]
fn test_container_ingest() {
    let catalog = catalog();
    let xml = load_test_file("minimal.xml");
    let eds = load_test_file("minimal.eds");
    let inner = zip_of(&[("module.eds", &eds[..])]);
    let outer = zip_of(&[
        ("sensor.xml", &xml[..]),
        ("icon.png", &b"\x89PNG\r\n\x1a\n"[..]),
        ("bundle.zip", &inner[..]),
    ]);

    let outcomes = catalog.ingest_container(&outer).unwrap();
    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["bundle.zip!/module.eds", "sensor.xml"]);
    assert!(outcomes.iter().all(|o| o.result.is_ok()));
    assert_eq!(catalog.profile_ids().unwrap().len(), 2);
}

#[test]
fn test_container_nesting_limit() {
    let catalog = catalog();
    let xml = load_test_file("minimal.xml");
    let innermost = zip_of(&[("sensor.xml", &xml[..])]);
    let middle = zip_of(&[("inner.zip", &innermost[..])]);
    let outer = zip_of(&[("middle.zip", &middle[..])]);

    let err = catalog.ingest_container(&outer).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Container(ContainerError::Limit(ParseError::ResourceLimitExceeded {
            limit: "max_container_depth",
            ..
        }))
    ));
    assert_eq!(err.kind(), "ResourceLimitExceeded");
    assert!(catalog.profile_ids().unwrap().is_empty());
}

#[test]
fn test_batch_ingest_keeps_order() {
    let catalog = catalog();
    let docs = vec![
        load_test_file("minimal.xml"),
        b"not a device description".to_vec(),
        load_test_file("minimal.eds"),
    ];
    let results = catalog.ingest_batch(&docs);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
    assert_ne!(results[0].as_ref().unwrap(), results[2].as_ref().unwrap());
}

#[test]
fn test_file_backed_catalog_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let bytes = load_test_file("io_module.eds");

    let id = {
        let catalog = Catalog::open(&path, Config::default()).unwrap();
        let id = catalog.ingest(&bytes).unwrap();
        catalog.run_quality(&id).unwrap();
        id
    };

    let catalog = Catalog::open(&path, Config::default()).unwrap();
    assert_eq!(catalog.ingest(&bytes).unwrap(), id);
    assert_eq!(catalog.reports(&id).unwrap().len(), 1);
}
