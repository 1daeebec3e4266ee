// crates/devprofile-rs-iodd/src/resolver/process_data.rs

use super::datatypes::resolve_type_choice;
use super::utils::opt_text_ref;
use crate::model::process_data::{
    Condition, ProcessData as ModelData, ProcessDataCollection, ProcessDataItem as ModelItem,
};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{
    ProcessData, ProcessDataCondition, ProcessDataItem, ProcessDataVariant,
};
use devprofile_rs::numeric::{parse_u8, parse_u32};
use log::debug;

/// Resolves the `<ProcessDataCollection>`.
///
/// The first `<ProcessData>` becomes the primary images; every further one
/// is kept as a conditional alternative, in document order.
pub(super) fn resolve_process_data(
    collection: &ProcessDataCollection,
) -> Result<ProcessData, ParseError> {
    let mut variants = collection.process_data.iter();
    let Some(first) = variants.next() else {
        return Ok(ProcessData::default());
    };
    let primary = resolve_variant(first)?;
    let alternatives = variants.map(resolve_variant).collect::<Result<Vec<_>, _>>()?;
    if !alternatives.is_empty() {
        debug!(
            "ProcessDataCollection: '{}' and {} conditional variants",
            primary.id,
            alternatives.len()
        );
    }
    Ok(ProcessData {
        collection_id: Some(primary.id),
        condition: primary.condition,
        input: primary.input,
        output: primary.output,
        alternatives,
    })
}

fn resolve_variant(data: &ModelData) -> Result<ProcessDataVariant, ParseError> {
    let path = format!("ProcessDataCollection/ProcessData[{}]", data.id);
    Ok(ProcessDataVariant {
        id: data.id.clone(),
        condition: data
            .condition
            .as_ref()
            .map(|c| resolve_condition(c, &format!("{}/Condition", path)))
            .transpose()?,
        input: data
            .process_data_in
            .as_ref()
            .map(|i| resolve_item(i, &format!("{}/ProcessDataIn", path)))
            .transpose()?,
        output: data
            .process_data_out
            .as_ref()
            .map(|o| resolve_item(o, &format!("{}/ProcessDataOut", path)))
            .transpose()?,
    })
}

fn resolve_condition(condition: &Condition, path: &str) -> Result<ProcessDataCondition, ParseError> {
    Ok(ProcessDataCondition {
        variable_id: condition.variable_id.clone(),
        subindex: condition
            .subindex
            .as_ref()
            .map(|s| parse_u8(s, &format!("{}/@subindex", path)))
            .transpose()?,
        value: condition.value.clone(),
    })
}

fn resolve_item(item: &ModelItem, path: &str) -> Result<ProcessDataItem, ParseError> {
    let bit_length = parse_u32(&item.bit_length, &format!("{}/@bitLength", path))?;
    let resolved = resolve_type_choice(item.datatype.as_ref(), item.datatype_ref.as_ref(), path)?;
    Ok(ProcessDataItem {
        id: item.id.clone(),
        name: opt_text_ref(item.name.as_ref()),
        bit_length,
        data_type: resolved.data_type,
        path: None,
        flags: 0,
        items: resolved.items,
    })
}
