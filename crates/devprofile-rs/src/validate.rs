// crates/devprofile-rs/src/validate.rs

//! Cross-reference and range checks applied to every freshly parsed profile.

use crate::error::ParseError;
use crate::model::{
    ArrayElement, Constraint, CustomDataType, DataTypeRef, DeviceProfile, EnumerationValue,
    MenuItem, Parameter, PrimitiveType, RecordLayout, TextRef,
};
use log::trace;
use std::collections::{BTreeMap, HashSet};

/// Checks the profile invariants:
/// - every text reference resolves in the primary language,
/// - every custom datatype reference resolves,
/// - parameter indices are unique,
/// - record layouts are well formed,
/// - default/min/max, enumeration and range values fit their primitive type,
/// - menu items and role sets reference declared parameters and menus.
///
/// The first violation found is returned.
pub fn validate_profile(profile: &DeviceProfile) -> Result<(), ParseError> {
    check_texts(profile)?;
    check_custom_types(&profile.custom_types)?;
    check_parameters(profile)?;
    check_process_data(profile)?;
    check_menus(profile)?;
    trace!(
        "Validated profile with {} parameters and {} texts",
        profile.parameters.len(),
        profile.texts.len()
    );
    Ok(())
}

// --- Text References ---

fn check_texts(profile: &DeviceProfile) -> Result<(), ParseError> {
    let primary = profile.texts.primary_language();
    let known: HashSet<&str> = profile
        .texts
        .entries()
        .iter()
        .filter(|e| primary.is_some_and(|lang| e.translations.contains_key(lang)))
        .map(|e| e.id.as_str())
        .collect();

    let mut refs: Vec<(String, &TextRef)> = Vec::new();
    let identity = &profile.identity;
    refs.push(("DeviceIdentity/productName".into(), &identity.product_name));
    for (field, text) in [
        ("VendorText", &identity.vendor_text),
        ("VendorUrl", &identity.vendor_url),
        ("DeviceFamily", &identity.device_family),
    ] {
        if let Some(t) = text {
            refs.push((format!("DeviceIdentity/{}", field), t));
        }
    }

    for param in &profile.parameters {
        let path = format!("Parameter[{}]", param.id);
        refs.push((format!("{}/Name", path), &param.name));
        if let Some(d) = &param.description {
            refs.push((format!("{}/Description", path), d));
        }
        collect_value_texts(&path, &param.enumeration, &param.constraints, &mut refs);
        collect_layout_texts(&path, &param.record_items, &mut refs);
    }
    for (label, item) in profile.process_data.all_items() {
        let path = format!("ProcessData[{}]", label);
        if let Some(n) = &item.name {
            refs.push((format!("{}/Name", path), n));
        }
        collect_layout_texts(&path, &item.items, &mut refs);
    }
    for (id, ty) in &profile.custom_types {
        let path = format!("Datatype[{}]", id);
        collect_value_texts(&path, &ty.enumeration, &ty.constraints, &mut refs);
        collect_layout_texts(&path, &ty.items, &mut refs);
    }
    for err in &profile.error_types {
        let path = format!("ErrorType[{}/{}]", err.code, err.additional_code);
        refs.extend(err.name.iter().map(|t| (format!("{}/Name", path), t)));
        refs.extend(err.description.iter().map(|t| (format!("{}/Description", path), t)));
    }
    for event in &profile.events {
        let path = format!("Event[{}]", event.code);
        refs.extend(event.name.iter().map(|t| (format!("{}/Name", path), t)));
        refs.extend(event.description.iter().map(|t| (format!("{}/Description", path), t)));
    }
    for variant in &profile.variants {
        let path = format!("DeviceVariant[{}]", variant.product_id);
        refs.push((format!("{}/Name", path), &variant.name));
        refs.extend(variant.description.iter().map(|t| (format!("{}/Description", path), t)));
    }
    for menu in &profile.user_interface.menus {
        let path = format!("Menu[{}]", menu.id);
        refs.extend(menu.name.iter().map(|t| (format!("{}/Name", path), t)));
        for item in &menu.items {
            if let MenuItem::Variable { buttons, .. } = item {
                for button in buttons {
                    if let Some(d) = &button.description {
                        refs.push((format!("{}/Button[{}]", path, button.value), d));
                    }
                }
            }
        }
    }

    for (path, text) in refs {
        if !known.contains(text.id()) {
            return Err(ParseError::unresolved(path, text.id()));
        }
    }
    Ok(())
}

fn collect_value_texts<'a>(
    path: &str,
    enumeration: &'a [EnumerationValue],
    constraints: &'a [Constraint],
    refs: &mut Vec<(String, &'a TextRef)>,
) {
    for e in enumeration {
        refs.push((format!("{}/SingleValue[{}]", path, e.value), &e.name));
    }
    for c in constraints {
        let Constraint::ValueRange {
            lower, upper, name, ..
        } = c;
        if let Some(n) = name {
            refs.push((format!("{}/ValueRange[{}..{}]", path, lower, upper), n));
        }
    }
}

fn collect_layout_texts<'a>(
    path: &str,
    layout: &'a RecordLayout,
    refs: &mut Vec<(String, &'a TextRef)>,
) {
    for (i, node) in layout.nodes().iter().enumerate() {
        let node_path = format!("{}/RecordItem[{}]", path, i);
        if let Some(n) = &node.name {
            refs.push((format!("{}/Name", node_path), n));
        }
        if let Some(d) = &node.description {
            refs.push((format!("{}/Description", node_path), d));
        }
        collect_value_texts(&node_path, &node.enumeration, &node.constraints, refs);
    }
}

// --- Datatypes ---

fn check_custom_types(types: &BTreeMap<String, CustomDataType>) -> Result<(), ParseError> {
    for (id, ty) in types {
        let path = format!("Datatype[{}]", id);
        check_type_ref(&path, &ty.data_type, types)?;
        for (i, node) in ty.items.nodes().iter().enumerate() {
            check_type_ref(&format!("{}/RecordItem[{}]", path, i), &node.data_type, types)?;
        }
        ty.items.check_layout(&path, ty.data_type.bit_length())?;
        let primitive = resolve_primitive(&ty.data_type, types);
        check_values(&path, primitive, &[], &ty.enumeration, &ty.constraints)?;
    }
    Ok(())
}

fn check_type_ref(
    path: &str,
    data_type: &DataTypeRef,
    types: &BTreeMap<String, CustomDataType>,
) -> Result<(), ParseError> {
    match data_type {
        DataTypeRef::Custom(id) if !types.contains_key(id) => {
            Err(ParseError::unresolved(format!("{}/DatatypeRef", path), id.clone()))
        }
        DataTypeRef::Array {
            element: ArrayElement::Custom(id),
            ..
        } if !types.contains_key(id) => Err(ParseError::unresolved(
            format!("{}/ArrayT/DatatypeRef", path),
            id.clone(),
        )),
        _ => Ok(()),
    }
}

/// Follows custom type references (bounded by the number of declared types)
/// down to a primitive, if there is one.
fn resolve_primitive<'a>(
    data_type: &'a DataTypeRef,
    types: &'a BTreeMap<String, CustomDataType>,
) -> Option<&'a PrimitiveType> {
    let mut current = data_type;
    for _ in 0..=types.len() {
        match current {
            DataTypeRef::Primitive(p) => return Some(p),
            DataTypeRef::Custom(id) => current = &types.get(id)?.data_type,
            _ => return None,
        }
    }
    None
}

/// Bit length of a type, following custom references.
pub fn resolved_bit_length(
    data_type: &DataTypeRef,
    types: &BTreeMap<String, CustomDataType>,
) -> Option<u32> {
    bit_length_within(data_type, types, types.len() + 1)
}

/// `budget` bounds the number of references followed, so reference cycles
/// end in `None`.
fn bit_length_within(
    data_type: &DataTypeRef,
    types: &BTreeMap<String, CustomDataType>,
    mut budget: usize,
) -> Option<u32> {
    let mut current = data_type;
    loop {
        budget = budget.checked_sub(1)?;
        match current {
            DataTypeRef::Custom(id) => current = &types.get(id)?.data_type,
            DataTypeRef::Array {
                count,
                element: ArrayElement::Custom(id),
                ..
            } => {
                let element = bit_length_within(&types.get(id)?.data_type, types, budget)?;
                return u32::from(*count).checked_mul(element);
            }
            other => return other.bit_length(),
        }
    }
}

fn check_values(
    path: &str,
    primitive: Option<&PrimitiveType>,
    scalars: &[(&str, &Option<String>)],
    enumeration: &[EnumerationValue],
    constraints: &[Constraint],
) -> Result<(), ParseError> {
    let Some(primitive) = primitive else {
        return Ok(());
    };
    let check = |field: String, raw: &str| {
        primitive
            .check_value(raw)
            .map_err(|expected| ParseError::out_of_range(field, raw, expected))
    };
    for (field, value) in scalars {
        if let Some(v) = value {
            check(format!("{}/@{}", path, field), v)?;
        }
    }
    for e in enumeration {
        check(format!("{}/SingleValue/@value", path), &e.value)?;
    }
    for c in constraints {
        let Constraint::ValueRange { lower, upper, .. } = c;
        check(format!("{}/ValueRange/@lowerValue", path), lower)?;
        check(format!("{}/ValueRange/@upperValue", path), upper)?;
    }
    Ok(())
}

// --- Parameters ---

fn check_parameters(profile: &DeviceProfile) -> Result<(), ParseError> {
    let types = &profile.custom_types;
    let mut seen_index = HashSet::new();
    let mut seen_id = HashSet::new();

    for param in &profile.parameters {
        let path = format!("Parameter[{}]", param.id);
        if !seen_index.insert(param.index) {
            return Err(ParseError::structure(
                format!("{}/@index", path),
                format!("duplicate index {}", param.index),
            ));
        }
        if !seen_id.insert(param.id.as_str()) {
            return Err(ParseError::structure(path, "duplicate parameter id"));
        }
        check_type_ref(&path, &param.data_type, types)?;
        for (i, node) in param.record_items.nodes().iter().enumerate() {
            check_type_ref(&format!("{}/RecordItem[{}]", path, i), &node.data_type, types)?;
        }
        param
            .record_items
            .check_layout(&path, resolved_bit_length(&param.data_type, types))?;

        check_values(
            &path,
            resolve_primitive(&param.data_type, types),
            &[
                ("defaultValue", &param.default),
                ("min", &param.min),
                ("max", &param.max),
            ],
            &param.enumeration,
            &param.constraints,
        )?;
        check_layout_values(&path, &param.record_items, types)?;
        check_record_item_info(&path, param, types)?;
    }
    Ok(())
}

/// Every override must name a distinct member: a top-level record item, or
/// an element `1..=count` of an array.
fn check_record_item_info(
    path: &str,
    param: &Parameter,
    types: &BTreeMap<String, CustomDataType>,
) -> Result<(), ParseError> {
    if param.record_item_info.is_empty() {
        return Ok(());
    }
    let (data_type, layout) = match &param.data_type {
        DataTypeRef::Custom(id) => match types.get(id) {
            Some(ty) => (&ty.data_type, &ty.items),
            None => return Ok(()),
        },
        other => (other, &param.record_items),
    };
    let members: HashSet<u8> = match data_type {
        DataTypeRef::Array { count, .. } => {
            (1..=*count).filter_map(|i| u8::try_from(i).ok()).collect()
        }
        _ => layout
            .roots()
            .filter_map(|i| layout.get(i).and_then(|node| node.subindex))
            .collect(),
    };

    let mut seen = HashSet::new();
    for info in &param.record_item_info {
        let info_path = format!("{}/RecordItemInfo[{}]", path, info.subindex);
        if !seen.insert(info.subindex) {
            return Err(ParseError::structure(info_path, "duplicate subindex"));
        }
        if !members.contains(&info.subindex) {
            return Err(ParseError::unresolved(info_path, info.subindex.to_string()));
        }
    }
    Ok(())
}

fn check_layout_values(
    path: &str,
    layout: &RecordLayout,
    types: &BTreeMap<String, CustomDataType>,
) -> Result<(), ParseError> {
    for (i, node) in layout.nodes().iter().enumerate() {
        check_values(
            &format!("{}/RecordItem[{}]", path, i),
            resolve_primitive(&node.data_type, types),
            &[],
            &node.enumeration,
            &node.constraints,
        )?;
    }
    Ok(())
}

// --- Process Data ---

fn check_process_data(profile: &DeviceProfile) -> Result<(), ParseError> {
    let data = &profile.process_data;
    let mut ids: HashSet<&str> = data.collection_id.iter().map(String::as_str).collect();
    for variant in &data.alternatives {
        if !ids.insert(variant.id.as_str()) {
            return Err(ParseError::structure(
                format!("ProcessData[{}]", variant.id),
                "duplicate process data id",
            ));
        }
    }
    let conditions = data
        .condition
        .iter()
        .map(|c| (data.collection_id.as_deref().unwrap_or(""), c))
        .chain(
            data.alternatives
                .iter()
                .filter_map(|v| v.condition.as_ref().map(|c| (v.id.as_str(), c))),
        );
    for (id, condition) in conditions {
        if !profile.has_variable(&condition.variable_id) {
            return Err(ParseError::unresolved(
                format!("ProcessData[{}]/Condition", id),
                condition.variable_id.clone(),
            ));
        }
    }

    let types = &profile.custom_types;
    for (label, item) in data.all_items() {
        let path = format!("ProcessData[{}]", label);
        check_type_ref(&path, &item.data_type, types)?;
        for (i, node) in item.items.nodes().iter().enumerate() {
            let node_path = format!("{}/RecordItem[{}]", path, i);
            check_type_ref(&node_path, &node.data_type, types)?;
            if let Some(reference) = &node.reference {
                if !profile.has_variable(reference) {
                    return Err(ParseError::unresolved(node_path, reference.clone()));
                }
            }
        }
        item.items.check_layout(&path, Some(item.bit_length))?;
        check_layout_values(&path, &item.items, types)?;
    }
    Ok(())
}

// --- User Interface ---

fn check_menus(profile: &DeviceProfile) -> Result<(), ParseError> {
    let ui = &profile.user_interface;
    let menu_ids: HashSet<&str> = ui.menus.iter().map(|m| m.id.as_str()).collect();
    if menu_ids.len() != ui.menus.len() {
        return Err(ParseError::structure("MenuCollection", "duplicate menu id"));
    }

    for menu in &ui.menus {
        for (i, item) in menu.items.iter().enumerate() {
            let path = format!("Menu[{}]/item[{}]", menu.id, i);
            match item {
                MenuItem::Variable { variable_id, .. } | MenuItem::RecordItem { variable_id, .. } => {
                    if !profile.has_variable(variable_id) {
                        return Err(ParseError::unresolved(path, variable_id.clone()));
                    }
                }
                MenuItem::Menu { menu_id } => {
                    if !menu_ids.contains(menu_id.as_str()) {
                        return Err(ParseError::unresolved(path, menu_id.clone()));
                    }
                }
            }
        }
    }
    for set in &ui.role_sets {
        for (kind, menu_id) in &set.menus {
            if !menu_ids.contains(menu_id.as_str()) {
                return Err(ParseError::unresolved(
                    format!("{}RoleMenuSet/{}Menu", set.role.as_str(), kind),
                    menu_id.clone(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::model::{
        Menu, ProcessDataCondition, ProcessDataItem, ProcessDataVariant, RecordItemInfo,
        RecordNode,
    };

    fn minimal() -> DeviceProfile {
        let mut p = DeviceProfile::new(Grammar::Markup);
        p.identity.product_name = TextRef::from("TI_Product");
        p.texts.insert("TI_Product", "en", "Sensor");
        p.texts.insert("TI_Speed", "en", "Speed");
        p.parameters.push(Parameter {
            id: "V_Speed".into(),
            index: 10,
            name: TextRef::from("TI_Speed"),
            data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 }),
            default: Some("0".into()),
            ..Default::default()
        });
        p
    }

    #[test]
    fn test_minimal_profile_is_valid() {
        assert!(validate_profile(&minimal()).is_ok());
    }

    #[test]
    fn test_unresolved_text() {
        let mut p = minimal();
        p.parameters[0].description = Some(TextRef::from("TI_Missing"));
        let err = validate_profile(&p).unwrap_err();
        assert_eq!(
            err,
            ParseError::unresolved("Parameter[V_Speed]/Description", "TI_Missing")
        );
    }

    #[test]
    fn test_text_only_in_secondary_language_is_unresolved() {
        let mut p = minimal();
        p.texts.insert("TI_De", "de", "Nur Deutsch");
        p.parameters[0].description = Some(TextRef::from("TI_De"));
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_duplicate_index() {
        let mut p = minimal();
        let mut dup = p.parameters[0].clone();
        dup.id = "V_Other".into();
        p.parameters.push(dup);
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn test_default_out_of_range() {
        let mut p = minimal();
        p.parameters[0].default = Some("300".into());
        match validate_profile(&p).unwrap_err() {
            ParseError::ValueOutOfRange { path, value, .. } => {
                assert_eq!(path, "Parameter[V_Speed]/@defaultValue");
                assert_eq!(value, "300");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_custom_type() {
        let mut p = minimal();
        p.parameters[0].data_type = DataTypeRef::Custom("DT_Missing".into());
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::UnresolvedReference { ref id, .. }) if id == "DT_Missing"
        ));
    }

    #[test]
    fn test_custom_type_range_checked_through_reference() {
        let mut p = minimal();
        p.custom_types.insert(
            "DT_Small".into(),
            CustomDataType {
                id: "DT_Small".into(),
                data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 4 }),
                ..Default::default()
            },
        );
        p.parameters[0].data_type = DataTypeRef::Custom("DT_Small".into());
        p.parameters[0].default = Some("16".into());
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_menu_reference_must_resolve() {
        let mut p = minimal();
        p.user_interface.menus.push(Menu {
            id: "M_Main".into(),
            name: None,
            items: vec![MenuItem::variable("V_Nope")],
        });
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_record_overlap_detected() {
        let mut p = minimal();
        let param = &mut p.parameters[0];
        param.default = None;
        param.data_type = DataTypeRef::Record {
            bit_length: 16,
            subindex_access: true,
        };
        for offset in [0, 4] {
            param
                .record_items
                .push(RecordNode {
                    bit_offset: offset,
                    bit_length: 8,
                    data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 }),
                    ..Default::default()
                })
                .unwrap();
        }
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::InvalidStructure { .. })
        ));
    }

    fn conditional_variant(id: &str, variable_id: &str) -> ProcessDataVariant {
        ProcessDataVariant {
            id: id.into(),
            condition: Some(ProcessDataCondition {
                variable_id: variable_id.into(),
                subindex: None,
                value: "1".into(),
            }),
            input: Some(ProcessDataItem {
                id: format!("{}_In", id),
                bit_length: 8,
                ..ProcessDataItem::default()
            }),
            output: None,
        }
    }

    #[test]
    fn test_process_data_condition_must_reference_a_variable() {
        let mut p = minimal();
        p.process_data.collection_id = Some("P_Std".into());
        p.process_data.alternatives.push(conditional_variant("P_Ext", "V_Speed"));
        assert!(validate_profile(&p).is_ok());

        p.process_data.alternatives[0] = conditional_variant("P_Ext", "V_Gone");
        assert_eq!(
            validate_profile(&p).unwrap_err(),
            ParseError::unresolved("ProcessData[P_Ext]/Condition", "V_Gone")
        );
    }

    #[test]
    fn test_duplicate_process_data_variant_id() {
        let mut p = minimal();
        p.process_data.collection_id = Some("P_Std".into());
        p.process_data.alternatives.push(conditional_variant("P_Std", "V_Speed"));
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::InvalidStructure { .. })
        ));
    }

    fn with_record(p: &mut DeviceProfile) {
        let param = &mut p.parameters[0];
        param.default = None;
        param.data_type = DataTypeRef::Record {
            bit_length: 16,
            subindex_access: true,
        };
        for (offset, subindex) in [(8, 1), (0, 2)] {
            param
                .record_items
                .push(RecordNode {
                    bit_offset: offset,
                    bit_length: 8,
                    data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 }),
                    subindex: Some(subindex),
                    name: Some(TextRef::from("TI_Speed")),
                    ..Default::default()
                })
                .unwrap();
        }
    }

    #[test]
    fn test_record_item_info_must_name_a_member() {
        let mut p = minimal();
        with_record(&mut p);
        p.parameters[0].record_item_info.push(RecordItemInfo {
            subindex: 2,
            default: Some("3".into()),
            ..Default::default()
        });
        assert!(validate_profile(&p).is_ok());

        p.parameters[0].record_item_info.push(RecordItemInfo {
            subindex: 9,
            ..Default::default()
        });
        assert_eq!(
            validate_profile(&p).unwrap_err(),
            ParseError::unresolved("Parameter[V_Speed]/RecordItemInfo[9]", "9")
        );
    }

    #[test]
    fn test_duplicate_record_item_info() {
        let mut p = minimal();
        with_record(&mut p);
        for _ in 0..2 {
            p.parameters[0].record_item_info.push(RecordItemInfo {
                subindex: 1,
                ..Default::default()
            });
        }
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn test_array_of_custom_type_resolves_through_collection() {
        let mut p = minimal();
        p.custom_types.insert(
            "DT_Word".into(),
            CustomDataType {
                id: "DT_Word".into(),
                data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 16 }),
                ..Default::default()
            },
        );
        let array = DataTypeRef::Array {
            count: 3,
            element: ArrayElement::Custom("DT_Word".into()),
            subindex_access: true,
        };
        assert_eq!(resolved_bit_length(&array, &p.custom_types), Some(48));

        p.parameters[0].default = None;
        p.parameters[0].data_type = array;
        assert!(validate_profile(&p).is_ok());

        p.parameters[0].data_type = DataTypeRef::Array {
            count: 3,
            element: ArrayElement::Custom("DT_Gone".into()),
            subindex_access: true,
        };
        assert!(matches!(
            validate_profile(&p),
            Err(ParseError::UnresolvedReference { ref id, .. }) if id == "DT_Gone"
        ));
    }

    #[test]
    fn test_self_referencing_array_has_no_length() {
        let mut types = BTreeMap::new();
        types.insert(
            "DT_Loop".to_string(),
            CustomDataType {
                id: "DT_Loop".into(),
                data_type: DataTypeRef::Array {
                    count: 2,
                    element: ArrayElement::Custom("DT_Loop".into()),
                    subindex_access: true,
                },
                ..Default::default()
            },
        );
        assert_eq!(
            resolved_bit_length(&DataTypeRef::Custom("DT_Loop".into()), &types),
            None
        );
    }
}
