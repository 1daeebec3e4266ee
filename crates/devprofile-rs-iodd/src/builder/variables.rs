// crates/devprofile-rs-iodd/src/builder/variables.rs

//! Builds `<VariableCollection>` and `<ProcessDataCollection>`.

use super::datatypes::{build_type_choice, TypeParts};
use crate::model::common::TextIdRef;
use crate::model::process_data::{self as pd_model, ProcessDataCollection};
use crate::model::variables::{
    self as var_model, StdVariableRef, Variable, VariableCollection, VariableEntry,
};
use devprofile_rs::error::ReconstructError;
use devprofile_rs::model::{
    Parameter, ParameterFlags, ProcessData, ProcessDataCondition, ProcessDataItem,
    StandardVariableRef,
};
use log::warn;

pub(super) fn build_variable_collection(
    parameters: &[Parameter],
    standard: &[StandardVariableRef],
) -> Result<Option<VariableCollection>, ReconstructError> {
    if parameters.is_empty() && standard.is_empty() {
        return Ok(None);
    }
    // Standard references precede device variables, as in published files.
    let items = standard
        .iter()
        .map(|r| VariableEntry::StdVariableRef(build_std_ref(r)))
        .map(Ok)
        .chain(
            parameters
                .iter()
                .map(|p| build_variable(p).map(VariableEntry::Variable)),
        )
        .collect::<Result<_, ReconstructError>>()?;
    Ok(Some(VariableCollection { items }))
}

fn build_std_ref(r: &StandardVariableRef) -> StdVariableRef {
    StdVariableRef {
        id: r.id.clone(),
        default_value: r.default_value.clone(),
        fixed_length_restriction: r.fixed_length_restriction.map(|l| l.to_string()),
        excluded_from_data_storage: r.excluded_from_data_storage.map(|b| b.to_string()),
    }
}

fn flag_attr(flags: ParameterFlags, flag: ParameterFlags) -> Option<String> {
    flags.contains(flag).then(|| "true".to_string())
}

fn build_variable(p: &Parameter) -> Result<Variable, ReconstructError> {
    let context = format!("Variable[{}]", p.id);
    warn_unexpressible(p, &context);

    let parts = TypeParts {
        data_type: &p.data_type,
        enumeration: &p.enumeration,
        constraints: &p.constraints,
        items: &p.record_items,
    };
    let (datatype, datatype_ref) = build_type_choice(&parts, &context)?;

    Ok(Variable {
        id: p.id.clone(),
        index: p.index.to_string(),
        subindex: p.subindex.map(|s| s.to_string()),
        access_rights: p.access.as_str().to_string(),
        default_value: p.default.clone(),
        dynamic: flag_attr(p.flags, ParameterFlags::DYNAMIC),
        excluded_from_data_storage: flag_attr(p.flags, ParameterFlags::EXCLUDED_FROM_DATA_STORAGE),
        modifies_other_variables: flag_attr(p.flags, ParameterFlags::MODIFIES_OTHER_VARIABLES),
        datatype,
        datatype_ref,
        record_item_info: p
            .record_item_info
            .iter()
            .map(|info| var_model::RecordItemInfo {
                subindex: info.subindex.to_string(),
                default_value: info.default.clone(),
                modifies_other_variables: info.modifies_other_variables.map(|b| b.to_string()),
                excluded_from_data_storage: info.excluded_from_data_storage.map(|b| b.to_string()),
            })
            .collect(),
        name: TextIdRef::new(p.name.id()),
        description: p.description.as_ref().map(|d| TextIdRef::new(d.id())),
    })
}

/// Logs every section-text only attribute that is dropped.
fn warn_unexpressible(p: &Parameter, context: &str) {
    let dropped = [
        ("min", p.min.is_some()),
        ("max", p.max.is_some()),
        ("unit", p.unit.is_some()),
        ("decimal places", p.decimal_places.is_some()),
        ("scaling", p.scaling.is_some()),
        ("link path", p.link_path.is_some()),
    ];
    for (what, present) in dropped {
        if present {
            warn!("{}: {} has no markup equivalent, skipping", context, what);
        }
    }
    let descriptor = ParameterFlags::from_bits_retain(
        p.flags.bits() & ParameterFlags::DESCRIPTOR_MASK & !ParameterFlags::ENUMERATED.bits(),
    );
    if !descriptor.is_empty() {
        warn!(
            "{}: descriptor bits {:#06x} have no markup equivalent, skipping",
            context,
            descriptor.bits()
        );
    }
}

pub(super) fn build_process_data_collection(
    pd: &ProcessData,
) -> Result<Option<ProcessDataCollection>, ReconstructError> {
    if pd.is_empty() {
        return Ok(None);
    }
    let primary = pd_model::ProcessData {
        id: pd.collection_id.clone().unwrap_or_else(|| "P_Data".into()),
        condition: pd.condition.as_ref().map(build_condition),
        process_data_in: pd.input.as_ref().map(build_item).transpose()?,
        process_data_out: pd.output.as_ref().map(build_item).transpose()?,
    };
    let mut process_data = vec![primary];
    for v in &pd.alternatives {
        process_data.push(pd_model::ProcessData {
            id: v.id.clone(),
            condition: v.condition.as_ref().map(build_condition),
            process_data_in: v.input.as_ref().map(build_item).transpose()?,
            process_data_out: v.output.as_ref().map(build_item).transpose()?,
        });
    }
    Ok(Some(ProcessDataCollection { process_data }))
}

fn build_condition(condition: &ProcessDataCondition) -> pd_model::Condition {
    pd_model::Condition {
        variable_id: condition.variable_id.clone(),
        subindex: condition.subindex.map(|s| s.to_string()),
        value: condition.value.clone(),
    }
}

fn build_item(item: &ProcessDataItem) -> Result<pd_model::ProcessDataItem, ReconstructError> {
    let context = format!("ProcessData[{}]", item.id);
    if item.path.is_some() || item.flags != 0 {
        warn!(
            "{}: connection path and flags have no markup equivalent, skipping",
            context
        );
    }
    let parts = TypeParts {
        data_type: &item.data_type,
        enumeration: &[],
        constraints: &[],
        items: &item.items,
    };
    let (datatype, datatype_ref) = build_type_choice(&parts, &context)?;
    Ok(pd_model::ProcessDataItem {
        id: item.id.clone(),
        bit_length: item.bit_length.to_string(),
        datatype,
        datatype_ref,
        name: item.name.as_ref().map(|n| TextIdRef::new(n.id())),
    })
}
