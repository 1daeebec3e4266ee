// crates/devprofile-rs-eds/src/resolver/params.rs

//! `[Params]`: `ParamN` parameter entries and their `EnumN` value lists.

use super::utils::{TextSink, extension, key_number, optional, required};
use crate::datatypes;
use crate::lexer::{Entry, Field, Section};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{
    AccessRights, DataTypeRef, DeviceProfile, EnumerationValue, Parameter, ParameterFlags,
};
use devprofile_rs::numeric::{parse_u8, parse_u16};
use log::trace;

/// Number of positional fields of a `ParamN` entry.
pub(crate) const PARAM_FIELDS: usize = 20;

/// Descriptor bit marking a read-only parameter.
pub(crate) const READ_ONLY: u16 = 0x0010;

pub(super) fn resolve_params(
    section: &Section,
    texts: &mut TextSink,
    profile: &mut DeviceProfile,
) -> Result<(), ParseError> {
    let mut enums = Vec::new();
    for entry in &section.entries {
        let path = format!("Params/{}", entry.key);
        if let Some(digits) = key_number(&entry.key, "Param") {
            let number = parse_u16(digits, &path)?;
            profile.parameters.push(parse_param(number, entry, texts)?);
        } else if let Some(digits) = key_number(&entry.key, "Enum") {
            enums.push((parse_u16(digits, &path)?, entry));
        } else {
            profile.extensions.push(extension("Params", entry));
        }
    }

    // Value lists may precede the parameter they belong to.
    for (number, entry) in enums {
        let id = format!("Param{}", number);
        let path = format!("Params/Enum{}", number);
        let param = profile
            .parameters
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ParseError::unresolved(&path, &id))?;
        param.enumeration = parse_enumeration(number, entry, texts, &path)?;
    }

    trace!("Resolved [Params]: {} parameters", profile.parameters.len());
    Ok(())
}

fn parse_param(number: u16, entry: &Entry, texts: &mut TextSink) -> Result<Parameter, ParseError> {
    let path = format!("Params/Param{}", number);
    if entry.fields.len() != PARAM_FIELDS {
        return Err(ParseError::structure(
            &path,
            format!(
                "expected {} fields, found {}",
                PARAM_FIELDS,
                entry.fields.len()
            ),
        ));
    }
    let fields = &entry.fields;

    let descriptor_path = format!("{}/Descriptor", path);
    let descriptor = parse_u16(required(&fields[2], &descriptor_path)?, &descriptor_path)?;
    if descriptor & !ParameterFlags::DESCRIPTOR_MASK != 0 {
        return Err(ParseError::out_of_range(
            &descriptor_path,
            format!("0x{:04X}", descriptor),
            "0x0000..=0x0FFF",
        ));
    }

    let type_path = format!("{}/DataType", path);
    let code = parse_u8(required(&fields[3], &type_path)?, &type_path)?;
    let size_path = format!("{}/DataSize", path);
    let size = parse_u16(required(&fields[4], &size_path)?, &size_path)?;
    let primitive = datatypes::from_code(code, size, &path)?;

    let name = texts.add(format!("Params.Param{}.Name", number), fields[5].text());
    let description = optional(&fields[7])
        .map(|help| texts.add(format!("Params.Param{}.Help", number), &help));
    let decimal_places = match optional(&fields[19]) {
        Some(places) => Some(parse_u8(&places, &format!("{}/DecimalPlaces", path))?),
        None => None,
    };

    Ok(Parameter {
        id: format!("Param{}", number),
        index: number,
        name,
        description,
        data_type: DataTypeRef::Primitive(primitive),
        access: if descriptor & READ_ONLY != 0 {
            AccessRights::ReadOnly
        } else {
            AccessRights::ReadWrite
        },
        unit: optional(&fields[6]),
        min: optional(&fields[8]),
        max: optional(&fields[9]),
        default: optional(&fields[10]),
        flags: ParameterFlags::from_bits_retain(descriptor & !READ_ONLY),
        decimal_places,
        scaling: joined(&fields[11..19]),
        link_path: joined(&fields[0..2]),
        ..Default::default()
    })
}

/// Keeps a run of positional fields as their comma-joined source text.
fn joined(fields: &[Field]) -> Option<String> {
    if fields.iter().all(Field::is_empty) {
        return None;
    }
    Some(
        fields
            .iter()
            .map(Field::to_source)
            .collect::<Vec<_>>()
            .join(","),
    )
}

fn parse_enumeration(
    number: u16,
    entry: &Entry,
    texts: &mut TextSink,
    path: &str,
) -> Result<Vec<EnumerationValue>, ParseError> {
    if entry.fields.len() % 2 != 0 {
        return Err(ParseError::structure(
            path,
            format!(
                "expected value/label pairs, found {} fields",
                entry.fields.len()
            ),
        ));
    }
    entry
        .fields
        .chunks(2)
        .enumerate()
        .map(|(position, pair)| {
            let value = required(&pair[0], path)?.to_string();
            let name = texts.add(
                format!("Params.Enum{}.{}", number, position),
                pair[1].text(),
            );
            Ok(EnumerationValue { value, name })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use devprofile_rs::grammar::Grammar;
    use devprofile_rs::model::PrimitiveType;

    fn resolve(body: &str) -> Result<(DeviceProfile, TextSink), ParseError> {
        let doc = tokenize(&format!("[Params]\n{}", body), 1_000)?;
        let mut profile = DeviceProfile::new(Grammar::SectionText);
        let mut texts = TextSink::new("en");
        resolve_params(&doc.sections[0], &mut texts, &mut profile)?;
        Ok((profile, texts))
    }

    #[test]
    fn test_param_fields() {
        let (profile, texts) = resolve(
            "Param3 = 6,\"20 04\",0x0112,0xC7,2,\"Speed\",\"rpm\",\"Motor speed\",0,3000,100,1,2,0,0,,,,,1;\nMaxInst = 4;\n",
        )
        .unwrap();
        let p = &profile.parameters[0];
        assert_eq!(p.id, "Param3");
        assert_eq!(p.index, 3);
        assert_eq!(p.access, AccessRights::ReadOnly);
        assert_eq!(p.flags.bits(), 0x0102);
        assert!(p.flags.contains(ParameterFlags::ENUMERATED));
        assert_eq!(
            p.data_type,
            DataTypeRef::Primitive(PrimitiveType::UInteger { bits: 16 })
        );
        assert_eq!(p.unit.as_deref(), Some("rpm"));
        assert_eq!(p.min.as_deref(), Some("0"));
        assert_eq!(p.max.as_deref(), Some("3000"));
        assert_eq!(p.default.as_deref(), Some("100"));
        assert_eq!(p.link_path.as_deref(), Some("6,\"20 04\""));
        assert_eq!(p.scaling.as_deref(), Some("1,2,0,0,,,,"));
        assert_eq!(p.decimal_places, Some(1));
        assert_eq!(p.name.id(), "Params.Param3.Name");

        let table = texts.finish();
        assert_eq!(table.lookup("Params.Param3.Help", "en"), Some("Motor speed"));
        assert_eq!(profile.extension("Params", "MaxInst"), Some("4"));
    }

    #[test]
    fn test_enumeration_before_param() {
        let (profile, texts) = resolve(
            "Enum1 = 0,\"Off\",1,\"On\";\nParam1 = ,,0x0002,0xC6,1,\"Mode\",\"\",\"\",,,0,,,,,,,,,;\n",
        )
        .unwrap();
        let p = &profile.parameters[0];
        assert_eq!(p.link_path, None);
        assert_eq!(p.scaling, None);
        assert_eq!(p.description, None);
        assert_eq!(p.enumeration.len(), 2);
        assert_eq!(p.enumeration[1].value, "1");
        let table = texts.finish();
        assert_eq!(table.lookup(p.enumeration[1].name.id(), "en"), Some("On"));
    }

    #[test]
    fn test_enumeration_without_param() {
        let err = resolve("Enum7 = 0,\"Off\";\n").unwrap_err();
        assert_eq!(err, ParseError::unresolved("Params/Enum7", "Param7"));
    }

    #[test]
    fn test_wrong_field_count() {
        assert!(matches!(
            resolve("Param1 = 0,\"\",0x0000,0xC6,1;\n"),
            Err(ParseError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn test_descriptor_beyond_twelve_bits() {
        match resolve("Param1 = 0,\"\",0x1000,0xC6,1,\"A\",\"\",\"\",,,,,,,,,,,,;\n") {
            Err(ParseError::ValueOutOfRange { path, .. }) => {
                assert_eq!(path, "Params/Param1/Descriptor")
            }
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("descriptor 0x1000 accepted"),
        }
    }
}
