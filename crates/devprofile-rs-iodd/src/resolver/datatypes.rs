// crates/devprofile-rs-iodd/src/resolver/datatypes.rs

//! Resolves `<Datatype>` elements into canonical types, values and record layouts.

use super::utils::{opt_access_rights, opt_bool, opt_text_ref, text_ref};
use crate::model::common::DatatypeRefElem;
use crate::model::datatypes::{Datatype, DatatypeChild, DatatypeCollection, RecordItem};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{
    ArrayElement, Constraint, CustomDataType, DataTypeRef, EnumerationValue, PrimitiveType,
    RecordLayout, RecordNode, StringEncoding,
};
use devprofile_rs::numeric::{parse_in_range, parse_u16, parse_u32, parse_u8};
use devprofile_rs::validate::resolved_bit_length;
use std::collections::BTreeMap;

/// A datatype with everything that hangs off it.
#[derive(Debug, Default)]
pub(super) struct ResolvedType {
    pub data_type: DataTypeRef,
    pub enumeration: Vec<EnumerationValue>,
    pub constraints: Vec<Constraint>,
    pub items: RecordLayout,
}

/// Resolves an inline `<Datatype>` or a `<DatatypeRef>`; exactly one must be given.
pub(super) fn resolve_type_choice(
    datatype: Option<&Datatype>,
    datatype_ref: Option<&DatatypeRefElem>,
    path: &str,
) -> Result<ResolvedType, ParseError> {
    match (datatype, datatype_ref) {
        (Some(dt), None) => resolve_datatype(dt, &format!("{}/Datatype", path)),
        (None, Some(r)) => Ok(ResolvedType {
            data_type: DataTypeRef::Custom(r.datatype_id.clone()),
            ..Default::default()
        }),
        _ => Err(ParseError::structure(
            path,
            "expected exactly one of <Datatype> or <DatatypeRef>",
        )),
    }
}

/// Resolves the `<DatatypeCollection>` into the profile's custom type map.
pub(super) fn resolve_custom_types(
    collection: &DatatypeCollection,
) -> Result<BTreeMap<String, CustomDataType>, ParseError> {
    let mut types = BTreeMap::new();
    for dt in &collection.datatype {
        let id = dt.id.clone().ok_or_else(|| {
            ParseError::structure("DatatypeCollection/Datatype", "attribute @id is missing")
        })?;
        let path = format!("DatatypeCollection/Datatype[{}]", id);
        let resolved = resolve_datatype(dt, &path)?;
        let custom = CustomDataType {
            id: id.clone(),
            data_type: resolved.data_type,
            enumeration: resolved.enumeration,
            constraints: resolved.constraints,
            items: resolved.items,
        };
        if types.insert(id, custom).is_some() {
            return Err(ParseError::structure(path, "duplicate datatype id"));
        }
    }
    Ok(types)
}

/// Resolves a `<Datatype>` of any flavor.
pub(super) fn resolve_datatype(dt: &Datatype, path: &str) -> Result<ResolvedType, ParseError> {
    match dt.xsi_type.as_str() {
        "RecordT" => {
            let (bit_length, subindex_access) = record_header(dt, path)?;
            for child in &dt.items {
                if !matches!(child, DatatypeChild::RecordItem(_)) {
                    return Err(ParseError::structure(path, "RecordT may only contain RecordItem"));
                }
            }
            Ok(ResolvedType {
                data_type: DataTypeRef::Record {
                    bit_length,
                    subindex_access,
                },
                items: flatten_record(dt, path)?,
                ..Default::default()
            })
        }
        "ArrayT" => {
            let count = parse_u16(required(&dt.count, path, "count")?, &format!("{}/@count", path))?;
            let subindex_access = opt_bool(
                dt.subindex_access_supported.as_ref(),
                &format!("{}/@subindexAccessSupported", path),
            )?
            .unwrap_or(true);
            let element = array_element(dt, path)?;
            Ok(ResolvedType {
                data_type: DataTypeRef::Array {
                    count,
                    element,
                    subindex_access,
                },
                ..Default::default()
            })
        }
        _ => {
            let primitive = primitive_type(dt, path)?;
            let (enumeration, constraints) = values(dt, path)?;
            Ok(ResolvedType {
                data_type: DataTypeRef::Primitive(primitive),
                enumeration,
                constraints,
                items: RecordLayout::new(),
            })
        }
    }
}

/// The element type of an `ArrayT`: one `<SimpleDatatype>` or one `<DatatypeRef>`.
fn array_element(dt: &Datatype, path: &str) -> Result<ArrayElement, ParseError> {
    let mut elements = dt.items.iter().filter(|c| {
        matches!(c, DatatypeChild::SimpleDatatype(_) | DatatypeChild::DatatypeRef(_))
    });
    match (elements.next(), elements.next()) {
        (Some(DatatypeChild::SimpleDatatype(sd)), None) => Ok(ArrayElement::Primitive(
            primitive_type(sd, &format!("{}/SimpleDatatype", path))?,
        )),
        (Some(DatatypeChild::DatatypeRef(r)), None) => {
            Ok(ArrayElement::Custom(r.datatype_id.clone()))
        }
        _ => Err(ParseError::structure(
            path,
            "ArrayT requires exactly one <SimpleDatatype> or <DatatypeRef> element type",
        )),
    }
}

fn required<'a>(value: &'a Option<String>, path: &str, attr: &str) -> Result<&'a str, ParseError> {
    value
        .as_deref()
        .ok_or_else(|| ParseError::structure(format!("{}/@{}", path, attr), "attribute is missing"))
}

fn record_header(dt: &Datatype, path: &str) -> Result<(u32, bool), ParseError> {
    let bit_length = parse_u32(
        required(&dt.bit_length, path, "bitLength")?,
        &format!("{}/@bitLength", path),
    )?;
    let subindex_access = opt_bool(
        dt.subindex_access_supported.as_ref(),
        &format!("{}/@subindexAccessSupported", path),
    )?
    .unwrap_or(true);
    Ok((bit_length, subindex_access))
}

/// Maps a simple `xsi:type` to a primitive.
fn primitive_type(dt: &Datatype, path: &str) -> Result<PrimitiveType, ParseError> {
    let bits = |path: &str| -> Result<u8, ParseError> {
        let raw = required(&dt.bit_length, path, "bitLength")?;
        parse_in_range(raw, 1, 64, &format!("{}/@bitLength", path)).map(|v| v as u8)
    };
    let length = |path: &str| -> Result<u16, ParseError> {
        let raw = required(&dt.fixed_length, path, "fixedLength")?;
        parse_u16(raw, &format!("{}/@fixedLength", path))
    };

    Ok(match dt.xsi_type.as_str() {
        "BooleanT" => PrimitiveType::Boolean,
        "UIntegerT" => PrimitiveType::UInteger { bits: bits(path)? },
        "IntegerT" => PrimitiveType::Integer { bits: bits(path)? },
        "BitStringT" => PrimitiveType::BitString { bits: bits(path)? },
        "Float32T" => PrimitiveType::Float32,
        "Float64T" => PrimitiveType::Float64,
        "StringT" => {
            let encoding = match dt.encoding.as_deref() {
                None => StringEncoding::Utf8,
                Some(e) => e.parse().map_err(|_| {
                    ParseError::out_of_range(format!("{}/@encoding", path), e, "UTF-8 | US-ASCII")
                })?,
            };
            PrimitiveType::String {
                length: length(path)?,
                encoding,
            }
        }
        "OctetStringT" => PrimitiveType::OctetString {
            length: length(path)?,
        },
        "TimeT" => PrimitiveType::Time,
        "TimeSpanT" => PrimitiveType::TimeSpan,
        other => {
            return Err(ParseError::structure(
                format!("{}/@xsi:type", path),
                format!("unsupported datatype '{}'", other),
            ));
        }
    })
}

/// Collects `<SingleValue>` and `<ValueRange>` children.
fn values(
    dt: &Datatype,
    path: &str,
) -> Result<(Vec<EnumerationValue>, Vec<Constraint>), ParseError> {
    let mut enumeration = Vec::new();
    let mut constraints = Vec::new();
    for child in &dt.items {
        match child {
            DatatypeChild::SingleValue(v) => enumeration.push(EnumerationValue {
                value: v.value.clone(),
                name: text_ref(&v.name),
            }),
            DatatypeChild::ValueRange(r) => constraints.push(Constraint::ValueRange {
                lower: r.lower_value.clone(),
                upper: r.upper_value.clone(),
                name: opt_text_ref(r.name.as_ref()),
            }),
            DatatypeChild::RecordItem(_) => {
                return Err(ParseError::structure(
                    path,
                    format!("RecordItem is not allowed in {}", dt.xsi_type),
                ));
            }
            DatatypeChild::SimpleDatatype(_) | DatatypeChild::DatatypeRef(_) => {
                return Err(ParseError::structure(
                    path,
                    format!("element type is not allowed in {}", dt.xsi_type),
                ));
            }
        }
    }
    Ok((enumeration, constraints))
}

fn record_items(dt: &Datatype) -> impl DoubleEndedIterator<Item = &RecordItem> {
    dt.items.iter().filter_map(|c| match c {
        DatatypeChild::RecordItem(item) => Some(item),
        _ => None,
    })
}

/// Flattens the (possibly nested) record items of `dt` into an arena.
///
/// Uses an explicit stack: children are pushed in reverse so that popping
/// visits them in document order, which yields pre-order indices.
fn flatten_record(dt: &Datatype, path: &str) -> Result<RecordLayout, ParseError> {
    let mut layout = RecordLayout::new();
    let mut stack: Vec<(Option<usize>, &RecordItem, String)> = record_items(dt)
        .rev()
        .map(|item| (None, item, path.to_string()))
        .collect();

    while let Some((parent, item, parent_path)) = stack.pop() {
        let item_path = format!("{}/RecordItem[{}]", parent_path, item.subindex);
        let subindex = parse_u8(&item.subindex, &format!("{}/@subindex", item_path))?;
        let bit_offset = parse_u32(&item.bit_offset, &format!("{}/@bitOffset", item_path))?;

        let mut node = RecordNode {
            parent,
            bit_offset,
            subindex: Some(subindex),
            name: Some(text_ref(&item.name)),
            description: opt_text_ref(item.description.as_ref()),
            access_restriction: opt_access_rights(
                item.access_right_restriction.as_ref(),
                &format!("{}/@accessRightRestriction", item_path),
            )?,
            ..Default::default()
        };

        match (&item.simple_datatype, &item.datatype_ref) {
            (Some(sd), None) if sd.xsi_type == "RecordT" => {
                let sd_path = format!("{}/SimpleDatatype", item_path);
                let (bit_length, subindex_access) = record_header(sd, &sd_path)?;
                node.data_type = DataTypeRef::Record {
                    bit_length,
                    subindex_access,
                };
                node.bit_length = bit_length;
                let index = layout.push(node)?;
                stack.extend(
                    record_items(sd)
                        .rev()
                        .map(|child| (Some(index), child, sd_path.clone())),
                );
            }
            (Some(sd), None) => {
                let resolved = resolve_datatype(sd, &format!("{}/SimpleDatatype", item_path))?;
                node.bit_length = resolved.data_type.bit_length().unwrap_or(0);
                node.data_type = resolved.data_type;
                node.enumeration = resolved.enumeration;
                node.constraints = resolved.constraints;
                layout.push(node)?;
            }
            (None, Some(r)) => {
                // Bit length is filled in once all custom types are known.
                node.data_type = DataTypeRef::Custom(r.datatype_id.clone());
                layout.push(node)?;
            }
            _ => {
                return Err(ParseError::structure(
                    item_path,
                    "expected exactly one of <SimpleDatatype> or <DatatypeRef>",
                ));
            }
        }
    }
    Ok(layout)
}

/// Sets the bit length of record nodes that reference custom types.
pub(super) fn fill_custom_lengths(
    layout: &mut RecordLayout,
    types: &BTreeMap<String, CustomDataType>,
) {
    for node in layout.nodes_mut() {
        let by_reference = matches!(
            node.data_type,
            DataTypeRef::Custom(_)
                | DataTypeRef::Array {
                    element: ArrayElement::Custom(_),
                    ..
                }
        );
        if by_reference {
            node.bit_length = resolved_bit_length(&node.data_type, types).unwrap_or(0);
        }
    }
}
