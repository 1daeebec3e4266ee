// crates/devprofile-rs-catalog/src/store/mapper/root.rs

//! The root row: grammar, source, identity, vendor and document metadata.

use super::{parse_column, text_id, text_ref};
use crate::error::StoreError;
use devprofile_rs::grammar::Grammar;
use devprofile_rs::model::{DeviceProfile, DocumentInfo, TextRef};
use rusqlite::{Connection, OptionalExtension, params};

/// What the root row keeps about the ingested document itself.
pub(crate) struct SourceRecord<'a> {
    pub checksum: &'a str,
    pub bytes: &'a [u8],
    pub ingested_at: &'a str,
}

pub(super) fn insert(
    conn: &Connection,
    id: &str,
    profile: &DeviceProfile,
    source: &SourceRecord<'_>,
) -> rusqlite::Result<()> {
    let identity = &profile.identity;
    let document = &profile.document;
    conn.execute(
        "INSERT INTO profiles (id, checksum, grammar, source, ingested_at, \
             vendor_id, vendor_name, identity_vendor_id, device_id, product_name, revision, \
             vendor_text, vendor_url, device_family, schema_version, release_date, \
             document_version, copyright, process_data_collection_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        params![
            id,
            source.checksum,
            profile.grammar.as_str(),
            source.bytes,
            source.ingested_at,
            profile.vendor.id,
            profile.vendor.name,
            identity.vendor_id,
            identity.device_id,
            identity.product_name.id(),
            identity.revision,
            text_id(&identity.vendor_text),
            text_id(&identity.vendor_url),
            text_id(&identity.device_family),
            document.schema_version,
            document.release_date,
            document.version,
            document.copyright,
            profile.process_data.collection_id,
        ],
    )?;
    Ok(())
}

pub(super) fn load(conn: &Connection, id: &str) -> Result<DeviceProfile, StoreError> {
    let row = conn
        .query_row(
            "SELECT grammar, vendor_id, vendor_name, identity_vendor_id, device_id, product_name, \
                 revision, vendor_text, vendor_url, device_family, schema_version, release_date, \
                 document_version, copyright, process_data_collection_id \
             FROM profiles WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, Option<String>>(8)?,
                    row.get::<_, Option<String>>(9)?,
                    DocumentInfo {
                        schema_version: row.get(10)?,
                        release_date: row.get(11)?,
                        version: row.get(12)?,
                        copyright: row.get(13)?,
                    },
                    row.get::<_, Option<String>>(14)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    let (
        grammar,
        vendor_id,
        vendor_name,
        identity_vendor_id,
        device_id,
        product_name,
        revision,
        vendor_text,
        vendor_url,
        device_family,
        document,
        collection_id,
    ) = row;

    let grammar: Grammar = parse_column("profiles", "grammar", &grammar)?;
    let mut profile = DeviceProfile::new(grammar);
    profile.vendor.id = vendor_id;
    profile.vendor.name = vendor_name;
    profile.identity.vendor_id = identity_vendor_id;
    profile.identity.device_id = device_id;
    profile.identity.product_name = TextRef(product_name);
    profile.identity.revision = revision;
    profile.identity.vendor_text = text_ref(vendor_text);
    profile.identity.vendor_url = text_ref(vendor_url);
    profile.identity.device_family = text_ref(device_family);
    profile.document = document;
    profile.process_data.collection_id = collection_id;
    Ok(profile)
}

/// Raw source bytes and grammar of the document stored under `id`.
pub(crate) fn load_source(conn: &Connection, id: &str) -> Result<(Grammar, Vec<u8>), StoreError> {
    let (grammar, bytes) = conn
        .query_row(
            "SELECT grammar, source FROM profiles WHERE id = ?1",
            params![id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?)),
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    Ok((parse_column("profiles", "grammar", &grammar)?, bytes))
}
