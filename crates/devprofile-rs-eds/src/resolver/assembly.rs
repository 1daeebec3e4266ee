// crates/devprofile-rs-eds/src/resolver/assembly.rs

//! `[Assembly]`: input and output assemblies become process data.
//!
//! An `AssemN` entry reads `name, path, size, descriptor, reserved,
//! reserved` followed by `(member size in bits, member reference)` pairs,
//! where a reference is `ParamK` or empty for padding. The section is only
//! modeled when every entry has that shape, every name states its direction
//! and there is at most one assembly per direction. Anything else is kept as
//! an opaque section by the caller.

use super::utils::{TextSink, direction_of, key_number, optional, required};
use crate::lexer::{Entry, Section};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{
    DataTypeRef, Direction, Parameter, PrimitiveType, ProcessData, ProcessDataItem, RecordLayout,
    RecordNode,
};
use devprofile_rs::numeric::{parse_u16, parse_u32};
use log::{debug, trace};

/// Fields preceding the member pairs.
pub(crate) const HEADER_FIELDS: usize = 6;

struct Assembly<'a> {
    number: u16,
    direction: Direction,
    entry: &'a Entry,
}

/// Returns `None` when the section does not have the modeled shape.
pub(super) fn resolve_assembly(
    section: &Section,
    texts: &mut TextSink,
    params: &[Parameter],
) -> Result<Option<ProcessData>, ParseError> {
    let Some(assemblies) = classify(section) else {
        return Ok(None);
    };

    let mut process_data = ProcessData::default();
    for assembly in &assemblies {
        let item = build_item(assembly, texts, params)?;
        match assembly.direction {
            Direction::Input => process_data.input = Some(item),
            Direction::Output => process_data.output = Some(item),
        }
    }
    trace!("Resolved [Assembly]: {} assemblies", assemblies.len());
    Ok(Some(process_data))
}

fn classify(section: &Section) -> Option<Vec<Assembly<'_>>> {
    if section.entries.is_empty() {
        debug!("[Assembly] has no entries, keeping it opaque");
        return None;
    }

    let mut assemblies: Vec<Assembly<'_>> = Vec::new();
    for entry in &section.entries {
        let Some(number) = key_number(&entry.key, "Assem").and_then(|d| d.parse::<u16>().ok())
        else {
            debug!("[Assembly] key '{}' is not an assembly, keeping the section opaque", entry.key);
            return None;
        };
        let count = entry.fields.len();
        if count < HEADER_FIELDS || (count - HEADER_FIELDS) % 2 != 0 {
            debug!("[Assembly] {} has {} fields, keeping the section opaque", entry.key, count);
            return None;
        }
        let Some(direction) = direction_of(entry.fields[0].text()) else {
            debug!("[Assembly] {} does not name its direction, keeping the section opaque", entry.key);
            return None;
        };
        if assemblies.iter().any(|a| a.direction == direction) {
            debug!("[Assembly] more than one {} assembly, keeping the section opaque", direction);
            return None;
        }
        let plain_members = entry.fields[HEADER_FIELDS..]
            .chunks(2)
            .all(|pair| pair[1].is_empty() || key_number(pair[1].text(), "Param").is_some());
        if !plain_members {
            debug!("[Assembly] {} has non-parameter members, keeping the section opaque", entry.key);
            return None;
        }
        assemblies.push(Assembly {
            number,
            direction,
            entry,
        });
    }
    Some(assemblies)
}

fn build_item(
    assembly: &Assembly<'_>,
    texts: &mut TextSink,
    params: &[Parameter],
) -> Result<ProcessDataItem, ParseError> {
    let entry = assembly.entry;
    let path = format!("Assembly/Assem{}", assembly.number);

    let mut items = RecordLayout::new();
    let mut offset: u32 = 0;
    for (position, pair) in entry.fields[HEADER_FIELDS..].chunks(2).enumerate() {
        let member_path = format!("{}/Member[{}]", path, position);
        let bits = parse_u32(required(&pair[0], &member_path)?, &member_path)?;
        let reference = match key_number(pair[1].text(), "Param") {
            Some(digits) => Some(format!("Param{}", parse_u16(digits, &member_path)?)),
            None => None,
        };
        let param = reference
            .as_ref()
            .and_then(|id| params.iter().find(|p| &p.id == id));

        items.push(RecordNode {
            parent: None,
            bit_offset: offset,
            bit_length: bits,
            data_type: param
                .map(|p| p.data_type.clone())
                .unwrap_or_else(|| padding_type(bits)),
            name: param.map(|p| p.name.clone()),
            reference,
            ..Default::default()
        })?;
        offset = offset.checked_add(bits).ok_or_else(|| {
            ParseError::out_of_range(&member_path, bits.to_string(), "total size < 2^32 bits")
        })?;
    }

    let bit_length = match optional(&entry.fields[2]) {
        Some(size) => u32::from(parse_u16(&size, &format!("{}/Size", path))?) * 8,
        None => offset,
    };
    let flags = match optional(&entry.fields[3]) {
        Some(descriptor) => parse_u32(&descriptor, &format!("{}/Descriptor", path))?,
        None => 0,
    };

    Ok(ProcessDataItem {
        id: format!("Assem{}", assembly.number),
        name: Some(texts.add(
            format!("Assembly.Assem{}.Name", assembly.number),
            entry.fields[0].text(),
        )),
        bit_length,
        data_type: DataTypeRef::Record {
            bit_length,
            subindex_access: false,
        },
        path: optional(&entry.fields[1]),
        flags,
        items,
    })
}

/// Type recorded for padding members.
fn padding_type(bits: u32) -> DataTypeRef {
    match u8::try_from(bits) {
        Ok(bits @ 1..=64) => DataTypeRef::Primitive(PrimitiveType::UInteger { bits }),
        _ => DataTypeRef::Primitive(PrimitiveType::OctetString {
            length: u16::try_from(bits.div_ceil(8)).unwrap_or(u16::MAX),
        }),
    }
}
