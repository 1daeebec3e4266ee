// crates/devprofile-rs-iodd/src/builder/datatypes.rs

//! Converts canonical datatypes and record layouts back into `<Datatype>`
//! elements.

use crate::model::common::{DatatypeRefElem, TextIdRef};
use crate::model::datatypes::{
    Datatype, DatatypeChild, DatatypeCollection, RecordItem, SingleValue, ValueRange,
};
use devprofile_rs::error::ReconstructError;
use devprofile_rs::model::{
    ArrayElement, Constraint, CustomDataType, DataTypeRef, EnumerationValue, PrimitiveType,
    RecordLayout, StringEncoding,
};
use log::warn;
use std::collections::BTreeMap;

/// The pieces of a canonical type that end up inside one `<Datatype>`.
pub(super) struct TypeParts<'a> {
    pub data_type: &'a DataTypeRef,
    pub enumeration: &'a [EnumerationValue],
    pub constraints: &'a [Constraint],
    pub items: &'a RecordLayout,
}

/// Returns either an inline `<Datatype>` or a `<DatatypeRef>`.
pub(super) fn build_type_choice(
    parts: &TypeParts<'_>,
    context: &str,
) -> Result<(Option<Datatype>, Option<DatatypeRefElem>), ReconstructError> {
    Ok(match parts.data_type {
        DataTypeRef::Custom(id) => (
            None,
            Some(DatatypeRefElem {
                datatype_id: id.clone(),
            }),
        ),
        _ => (Some(build_datatype(parts, context)?), None),
    })
}

/// Builds the `<DatatypeCollection>`.
///
/// Every entry must carry an `xsi:type`, so a custom type that merely
/// aliases another one is written with the definition it resolves to.
pub(super) fn build_datatype_collection(
    types: &BTreeMap<String, CustomDataType>,
) -> Result<Option<DatatypeCollection>, ReconstructError> {
    if types.is_empty() {
        return Ok(None);
    }
    let datatype = types
        .values()
        .map(|custom| {
            let context = format!("Datatype[{}]", custom.id);
            let target = alias_target(custom, types, &context)?;
            let (enumeration, constraints) = if target.id == custom.id {
                (&custom.enumeration, &custom.constraints)
            } else {
                warn!("{}: alias of '{}' is written inline", context, target.id);
                (&target.enumeration, &target.constraints)
            };
            let parts = TypeParts {
                data_type: &target.data_type,
                enumeration,
                constraints,
                items: &target.items,
            };
            Ok(Datatype {
                id: Some(custom.id.clone()),
                ..build_datatype(&parts, &context)?
            })
        })
        .collect::<Result<_, ReconstructError>>()?;
    Ok(Some(DatatypeCollection { datatype }))
}

/// Follows `Custom` references from `custom` to a type with a concrete definition.
fn alias_target<'a>(
    custom: &'a CustomDataType,
    types: &'a BTreeMap<String, CustomDataType>,
    context: &str,
) -> Result<&'a CustomDataType, ReconstructError> {
    let mut current = custom;
    for _ in 0..=types.len() {
        let DataTypeRef::Custom(id) = &current.data_type else {
            return Ok(current);
        };
        current = types.get(id).ok_or_else(|| ReconstructError::Unsupported {
            field: context.to_string(),
            reason: format!("references undeclared datatype '{}'", id),
        })?;
    }
    Err(ReconstructError::Unsupported {
        field: context.to_string(),
        reason: "datatype references form a cycle".into(),
    })
}

/// Builds an inline datatype.
///
/// # Errors
/// `ReconstructError::Unsupported` for a bare `Custom` reference, which only
/// a `<DatatypeRef>` can express.
pub(super) fn build_datatype(
    parts: &TypeParts<'_>,
    context: &str,
) -> Result<Datatype, ReconstructError> {
    match parts.data_type {
        DataTypeRef::Primitive(p) => {
            let mut dt = primitive_datatype(p);
            dt.items = value_children(parts.enumeration, parts.constraints);
            Ok(dt)
        }
        DataTypeRef::Record {
            bit_length,
            subindex_access,
        } => Ok(Datatype {
            xsi_type: "RecordT".into(),
            bit_length: Some(bit_length.to_string()),
            subindex_access_supported: (!subindex_access).then(|| "false".into()),
            items: build_record_items(parts.items, context)?
                .into_iter()
                .map(DatatypeChild::RecordItem)
                .collect(),
            ..Default::default()
        }),
        DataTypeRef::Array {
            count,
            element,
            subindex_access,
        } => {
            let element = match element {
                ArrayElement::Primitive(p) => DatatypeChild::SimpleDatatype(primitive_datatype(p)),
                ArrayElement::Custom(id) => DatatypeChild::DatatypeRef(DatatypeRefElem {
                    datatype_id: id.clone(),
                }),
            };
            Ok(Datatype {
                xsi_type: "ArrayT".into(),
                count: Some(count.to_string()),
                subindex_access_supported: (!subindex_access).then(|| "false".into()),
                items: vec![element],
                ..Default::default()
            })
        }
        DataTypeRef::Custom(id) => Err(ReconstructError::Unsupported {
            field: context.to_string(),
            reason: format!("custom type '{}' cannot be written inline", id),
        }),
    }
}

fn primitive_datatype(p: &PrimitiveType) -> Datatype {
    let (xsi_type, bit_length, fixed_length, encoding) = match *p {
        PrimitiveType::Boolean => ("BooleanT", None, None, None),
        PrimitiveType::UInteger { bits } => ("UIntegerT", Some(bits), None, None),
        PrimitiveType::Integer { bits } => ("IntegerT", Some(bits), None, None),
        PrimitiveType::BitString { bits } => ("BitStringT", Some(bits), None, None),
        PrimitiveType::Float32 => ("Float32T", None, None, None),
        PrimitiveType::Float64 => ("Float64T", None, None, None),
        PrimitiveType::String { length, encoding } => {
            let encoding = match encoding {
                StringEncoding::Utf8 => "UTF-8",
                StringEncoding::Ascii => "US-ASCII",
            };
            ("StringT", None, Some(length), Some(encoding))
        }
        PrimitiveType::OctetString { length } => ("OctetStringT", None, Some(length), None),
        PrimitiveType::Time => ("TimeT", None, None, None),
        PrimitiveType::TimeSpan => ("TimeSpanT", None, None, None),
    };
    Datatype {
        xsi_type: xsi_type.into(),
        bit_length: bit_length.map(|b| b.to_string()),
        fixed_length: fixed_length.map(|l| l.to_string()),
        encoding: encoding.map(str::to_string),
        ..Default::default()
    }
}

fn value_children(enumeration: &[EnumerationValue], constraints: &[Constraint]) -> Vec<DatatypeChild> {
    let singles = enumeration.iter().map(|e| {
        DatatypeChild::SingleValue(SingleValue {
            value: e.value.clone(),
            name: TextIdRef::new(e.name.id()),
        })
    });
    let ranges = constraints.iter().map(|c| match c {
        Constraint::ValueRange { lower, upper, name } => DatatypeChild::ValueRange(ValueRange {
            lower_value: lower.clone(),
            upper_value: upper.clone(),
            name: name.as_ref().map(|n| TextIdRef::new(n.id())),
        }),
    });
    singles.chain(ranges).collect()
}

/// Rebuilds the nested `<RecordItem>` tree of `layout`.
///
/// Nodes are visited in reverse index order; since children always follow
/// their parent, every child is built before the parent that adopts it.
fn build_record_items(
    layout: &RecordLayout,
    context: &str,
) -> Result<Vec<RecordItem>, ReconstructError> {
    let nodes = layout.nodes();
    // Slot 0 collects the top level, slot i + 1 the children of node i.
    let mut built: Vec<Vec<RecordItem>> = vec![Vec::new(); nodes.len() + 1];
    let mut positions: Vec<u8> = vec![0; nodes.len() + 1];

    // Fallback subindices count siblings in document order.
    let mut fallback_subindex = vec![0u8; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        let slot = node.parent.map_or(0, |p| p + 1);
        positions[slot] = positions[slot].saturating_add(1);
        fallback_subindex[i] = positions[slot];
    }

    for (i, node) in nodes.iter().enumerate().rev() {
        let mut children = std::mem::take(&mut built[i + 1]);
        children.reverse();

        let Some(name) = &node.name else {
            warn!(
                "{}: padding at bit offset {} has no markup equivalent, skipping",
                context, node.bit_offset
            );
            continue;
        };
        if let Some(reference) = &node.reference {
            warn!(
                "{}: record item reference to '{}' is not written",
                context, reference
            );
        }

        let (simple_datatype, datatype_ref) = match &node.data_type {
            DataTypeRef::Custom(id) => (
                None,
                Some(DatatypeRefElem {
                    datatype_id: id.clone(),
                }),
            ),
            DataTypeRef::Record {
                bit_length,
                subindex_access,
            } => (
                Some(Datatype {
                    xsi_type: "RecordT".into(),
                    bit_length: Some(bit_length.to_string()),
                    subindex_access_supported: (!subindex_access).then(|| "false".into()),
                    items: children.into_iter().map(DatatypeChild::RecordItem).collect(),
                    ..Default::default()
                }),
                None,
            ),
            other => {
                let parts = TypeParts {
                    data_type: other,
                    enumeration: &node.enumeration,
                    constraints: &node.constraints,
                    items: &RecordLayout::new(),
                };
                (Some(build_datatype(&parts, context)?), None)
            }
        };

        let item = RecordItem {
            subindex: node.subindex.unwrap_or(fallback_subindex[i]).to_string(),
            bit_offset: node.bit_offset.to_string(),
            access_right_restriction: node.access_restriction.map(|a| a.as_str().to_string()),
            simple_datatype,
            datatype_ref,
            name: TextIdRef::new(name.id()),
            description: node.description.as_ref().map(|d| TextIdRef::new(d.id())),
        };
        let slot = node.parent.map_or(0, |p| p + 1);
        built[slot].push(item);
    }

    let mut roots = std::mem::take(&mut built[0]);
    roots.reverse();
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devprofile_rs::model::{RecordNode, TextRef};

    #[test]
    fn test_nested_record_rebuilt_in_order() {
        let mut layout = RecordLayout::new();
        let outer = layout
            .push(RecordNode {
                bit_offset: 8,
                bit_length: 16,
                data_type: DataTypeRef::Record {
                    bit_length: 16,
                    subindex_access: true,
                },
                subindex: Some(1),
                name: Some(TextRef::new("TI_Outer")),
                ..Default::default()
            })
            .unwrap();
        for (offset, sub) in [(8, 1), (0, 2)] {
            layout
                .push(RecordNode {
                    parent: Some(outer),
                    bit_offset: offset,
                    bit_length: 8,
                    data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 }),
                    subindex: Some(sub),
                    name: Some(TextRef::new(format!("TI_{}", sub))),
                    ..Default::default()
                })
                .unwrap();
        }
        layout
            .push(RecordNode {
                bit_length: 8,
                data_type: DataTypeRef::Custom("DT_Byte".into()),
                subindex: Some(2),
                name: Some(TextRef::new("TI_C")),
                ..Default::default()
            })
            .unwrap();

        let items = build_record_items(&layout, "test").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].subindex, "1");
        let inner = items[0].simple_datatype.as_ref().unwrap();
        assert_eq!(inner.items.len(), 2);
        match &inner.items[0] {
            DatatypeChild::RecordItem(r) => assert_eq!(r.name.text_id, "TI_1"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(items[1].datatype_ref.as_ref().unwrap().datatype_id, "DT_Byte");
    }

    #[test]
    fn test_padding_is_skipped_and_subindex_filled() {
        let mut layout = RecordLayout::new();
        layout
            .push(RecordNode {
                bit_length: 8,
                data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 }),
                ..Default::default()
            })
            .unwrap();
        layout
            .push(RecordNode {
                bit_offset: 8,
                bit_length: 8,
                data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 }),
                name: Some(TextRef::new("TI_B")),
                ..Default::default()
            })
            .unwrap();
        let items = build_record_items(&layout, "test").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].subindex, "2");
    }

    #[test]
    fn test_array_of_custom_type_written_as_reference() {
        let data_type = DataTypeRef::Array {
            count: 2,
            element: ArrayElement::Custom("DT_Point".into()),
            subindex_access: true,
        };
        let parts = TypeParts {
            data_type: &data_type,
            enumeration: &[],
            constraints: &[],
            items: &RecordLayout::new(),
        };
        let dt = build_datatype(&parts, "test").unwrap();
        assert_eq!(dt.xsi_type, "ArrayT");
        assert_eq!(dt.count.as_deref(), Some("2"));
        match dt.items.as_slice() {
            [DatatypeChild::DatatypeRef(r)] => assert_eq!(r.datatype_id, "DT_Point"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bare_custom_reference_is_not_inlined() {
        let data_type = DataTypeRef::Custom("DT_Point".into());
        let parts = TypeParts {
            data_type: &data_type,
            enumeration: &[],
            constraints: &[],
            items: &RecordLayout::new(),
        };
        assert!(matches!(
            build_datatype(&parts, "Variable[V_X]"),
            Err(ReconstructError::Unsupported { ref field, .. }) if field == "Variable[V_X]"
        ));
    }

    #[test]
    fn test_collection_alias_written_with_target_definition() {
        let mut types = BTreeMap::new();
        for (id, data_type) in [
            ("DT_Alias", DataTypeRef::Custom("DT_Word".into())),
            ("DT_Word", DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 16 })),
        ] {
            types.insert(
                id.to_string(),
                CustomDataType {
                    id: id.into(),
                    data_type,
                    ..Default::default()
                },
            );
        }
        let collection = build_datatype_collection(&types).unwrap().unwrap();
        let alias = &collection.datatype[0];
        assert_eq!(alias.id.as_deref(), Some("DT_Alias"));
        assert_eq!(alias.xsi_type, "UIntegerT");
        assert_eq!(alias.bit_length.as_deref(), Some("16"));

        types.remove("DT_Word");
        assert!(matches!(
            build_datatype_collection(&types),
            Err(ReconstructError::Unsupported { .. })
        ));
    }
}
