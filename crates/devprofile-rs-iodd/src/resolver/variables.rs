// crates/devprofile-rs-iodd/src/resolver/variables.rs

use super::datatypes::resolve_type_choice;
use super::utils::{access_rights, opt_bool, opt_text_ref, text_ref};
use crate::model::variables::{
    RecordItemInfo as ModelInfo, StdVariableRef, Variable, VariableCollection, VariableEntry,
};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{Parameter, ParameterFlags, RecordItemInfo, StandardVariableRef};
use devprofile_rs::numeric::{parse_u16, parse_u8};

/// Splits the `<VariableCollection>` into device variables and standard references.
pub(super) fn resolve_variables(
    collection: &VariableCollection,
) -> Result<(Vec<Parameter>, Vec<StandardVariableRef>), ParseError> {
    let mut parameters = Vec::new();
    let mut standard = Vec::new();
    for entry in &collection.items {
        match entry {
            VariableEntry::Variable(v) => parameters.push(resolve_variable(v)?),
            VariableEntry::StdVariableRef(r) => standard.push(resolve_std_ref(r)?),
        }
    }
    Ok((parameters, standard))
}

fn resolve_variable(v: &Variable) -> Result<Parameter, ParseError> {
    let path = format!("VariableCollection/Variable[{}]", v.id);
    let index = parse_u16(&v.index, &format!("{}/@index", path))?;
    let subindex = v
        .subindex
        .as_deref()
        .map(|s| parse_u8(s, &format!("{}/@subindex", path)))
        .transpose()?;
    let access = access_rights(&v.access_rights, &format!("{}/@accessRights", path))?;

    let mut flags = ParameterFlags::empty();
    let bool_flags = [
        (&v.dynamic, "dynamic", ParameterFlags::DYNAMIC),
        (
            &v.excluded_from_data_storage,
            "excludedFromDataStorage",
            ParameterFlags::EXCLUDED_FROM_DATA_STORAGE,
        ),
        (
            &v.modifies_other_variables,
            "modifiesOtherVariables",
            ParameterFlags::MODIFIES_OTHER_VARIABLES,
        ),
    ];
    for (value, attr, flag) in bool_flags {
        if opt_bool(value.as_ref(), &format!("{}/@{}", path, attr))?.unwrap_or(false) {
            flags |= flag;
        }
    }

    let resolved = resolve_type_choice(v.datatype.as_ref(), v.datatype_ref.as_ref(), &path)?;
    let record_item_info = v
        .record_item_info
        .iter()
        .map(|info| resolve_record_item_info(info, &path))
        .collect::<Result<Vec<_>, _>>()?;
    if !resolved.enumeration.is_empty() {
        flags |= ParameterFlags::ENUMERATED;
    }

    Ok(Parameter {
        id: v.id.clone(),
        index,
        subindex,
        name: text_ref(&v.name),
        description: opt_text_ref(v.description.as_ref()),
        data_type: resolved.data_type,
        access,
        default: v.default_value.clone(),
        flags,
        enumeration: resolved.enumeration,
        constraints: resolved.constraints,
        record_items: resolved.items,
        record_item_info,
        ..Default::default()
    })
}

fn resolve_record_item_info(info: &ModelInfo, path: &str) -> Result<RecordItemInfo, ParseError> {
    let path = format!("{}/RecordItemInfo[{}]", path, info.subindex);
    Ok(RecordItemInfo {
        subindex: parse_u8(&info.subindex, &format!("{}/@subindex", path))?,
        default: info.default_value.clone(),
        modifies_other_variables: opt_bool(
            info.modifies_other_variables.as_ref(),
            &format!("{}/@modifiesOtherVariables", path),
        )?,
        excluded_from_data_storage: opt_bool(
            info.excluded_from_data_storage.as_ref(),
            &format!("{}/@excludedFromDataStorage", path),
        )?,
    })
}

fn resolve_std_ref(r: &StdVariableRef) -> Result<StandardVariableRef, ParseError> {
    let path = format!("VariableCollection/StdVariableRef[{}]", r.id);
    Ok(StandardVariableRef {
        id: r.id.clone(),
        default_value: r.default_value.clone(),
        fixed_length_restriction: r
            .fixed_length_restriction
            .as_deref()
            .map(|s| parse_u16(s, &format!("{}/@fixedLengthRestriction", path)))
            .transpose()?,
        excluded_from_data_storage: opt_bool(
            r.excluded_from_data_storage.as_ref(),
            &format!("{}/@excludedFromDataStorage", path),
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use devprofile_rs::model::{AccessRights, DataTypeRef, PrimitiveType};

    #[test]
    fn test_collection_keeps_order_and_flags() {
        let xml = r#"<VariableCollection>
            <StdVariableRef id="V_VendorName" defaultValue="ACME"/>
            <Variable id="V_Mode" index="64" accessRights="rw" defaultValue="1" dynamic="true">
              <Datatype xsi:type="UIntegerT" bitLength="8">
                <SingleValue value="1"><Name textId="TI_One"/></SingleValue>
              </Datatype>
              <Name textId="TI_Mode"/>
            </Variable>
            <StdVariableRef id="V_ProductName" fixedLengthRestriction="32"/>
          </VariableCollection>"#;
        let collection: VariableCollection = quick_xml::de::from_str(xml).unwrap();
        let (params, std_refs) = resolve_variables(&collection).unwrap();

        assert_eq!(params.len(), 1);
        let p = &params[0];
        assert_eq!(p.index, 64);
        assert_eq!(p.access, AccessRights::ReadWrite);
        assert!(p.flags.contains(ParameterFlags::DYNAMIC | ParameterFlags::ENUMERATED));
        assert_eq!(
            p.data_type,
            DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 8 })
        );
        assert_eq!(std_refs.len(), 2);
        assert_eq!(std_refs[1].fixed_length_restriction, Some(32));
    }

    #[test]
    fn test_missing_datatype_rejected() {
        let xml = r#"<VariableCollection>
            <Variable id="V_X" index="70" accessRights="ro"><Name textId="TI_X"/></Variable>
          </VariableCollection>"#;
        let collection: VariableCollection = quick_xml::de::from_str(xml).unwrap();
        assert!(matches!(
            resolve_variables(&collection),
            Err(ParseError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn test_bad_access_rights() {
        let xml = r#"<VariableCollection>
            <Variable id="V_X" index="70" accessRights="rx">
              <DatatypeRef datatypeId="DT_X"/><Name textId="TI_X"/>
            </Variable>
          </VariableCollection>"#;
        let collection: VariableCollection = quick_xml::de::from_str(xml).unwrap();
        assert!(matches!(
            resolve_variables(&collection),
            Err(ParseError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_record_item_info_is_kept() {
        let xml = r#"<VariableCollection>
            <Variable id="V_Limits" index="80" accessRights="rw">
              <DatatypeRef datatypeId="DT_Limits"/>
              <RecordItemInfo subindex="1" defaultValue="10" modifiesOtherVariables="true"/>
              <RecordItemInfo subindex="2" excludedFromDataStorage="false"/>
              <Name textId="TI_Limits"/>
            </Variable>
          </VariableCollection>"#;
        let collection: VariableCollection = quick_xml::de::from_str(xml).unwrap();
        let (params, _) = resolve_variables(&collection).unwrap();

        let info = &params[0].record_item_info;
        assert_eq!(info.len(), 2);
        assert_eq!(info[0].subindex, 1);
        assert_eq!(info[0].default.as_deref(), Some("10"));
        assert_eq!(info[0].modifies_other_variables, Some(true));
        assert_eq!(info[0].excluded_from_data_storage, None);
        assert_eq!(info[1].excluded_from_data_storage, Some(false));
    }

    #[test]
    fn test_record_item_info_bad_subindex() {
        let xml = r#"<VariableCollection>
            <Variable id="V_Limits" index="80" accessRights="rw">
              <DatatypeRef datatypeId="DT_Limits"/>
              <RecordItemInfo subindex="300"/>
              <Name textId="TI_Limits"/>
            </Variable>
          </VariableCollection>"#;
        let collection: VariableCollection = quick_xml::de::from_str(xml).unwrap();
        assert!(matches!(
            resolve_variables(&collection),
            Err(ParseError::ValueOutOfRange { .. })
        ));
    }
}
