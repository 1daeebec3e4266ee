// crates/devprofile-rs-catalog/src/store/mapper/parameters.rs

use super::layout::{self, Dependents};
use super::{parse_column, text_id, text_ref};
use crate::error::StoreError;
use devprofile_rs::model::{
    AccessRights, DataTypeRef, DeviceProfile, Parameter, ParameterFlags, RecordItemInfo,
    StandardVariableRef, TextRef,
};
use rusqlite::{Connection, params};

fn owner(ordinal: usize) -> String {
    format!("parameter:{}", ordinal)
}

pub(super) fn insert(conn: &Connection, id: &str, profile: &DeviceProfile) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO parameters (profile_id, ordinal, id, param_index, subindex, name, \
             description, data_type, access, default_value, min_value, max_value, unit, flags, \
             decimal_places, scaling, link_path) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )?;
    for (ordinal, p) in profile.parameters.iter().enumerate() {
        stmt.execute(params![
            id,
            ordinal,
            p.id,
            p.index,
            p.subindex,
            p.name.id(),
            text_id(&p.description),
            p.data_type.to_string(),
            p.access.as_str(),
            p.default,
            p.min,
            p.max,
            p.unit,
            p.flags.bits(),
            p.decimal_places,
            p.scaling,
            p.link_path,
        ])?;
        let owner = owner(ordinal);
        layout::insert_enumeration(conn, id, &owner, &p.enumeration)?;
        layout::insert_constraints(conn, id, &owner, &p.constraints)?;
        layout::insert_layout(conn, id, &owner, &p.record_items)?;
        insert_record_item_info(conn, id, ordinal, &p.record_item_info)?;
    }

    let mut stmt = conn.prepare_cached(
        "INSERT INTO standard_variables (profile_id, ordinal, id, default_value, \
             fixed_length_restriction, excluded_from_data_storage) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (ordinal, v) in profile.standard_variables.iter().enumerate() {
        stmt.execute(params![
            id,
            ordinal,
            v.id,
            v.default_value,
            v.fixed_length_restriction,
            v.excluded_from_data_storage,
        ])?;
    }
    Ok(())
}

fn insert_record_item_info(
    conn: &Connection,
    id: &str,
    parameter: usize,
    infos: &[RecordItemInfo],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO record_item_info (profile_id, parameter, ordinal, subindex, default_value, \
             modifies_other_variables, excluded_from_data_storage) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (ordinal, info) in infos.iter().enumerate() {
        stmt.execute(params![
            id,
            parameter,
            ordinal,
            info.subindex,
            info.default,
            info.modifies_other_variables,
            info.excluded_from_data_storage,
        ])?;
    }
    Ok(())
}

pub(super) fn load(
    conn: &Connection,
    id: &str,
    dependents: &mut Dependents,
    profile: &mut DeviceProfile,
) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, param_index, subindex, name, description, data_type, access, default_value, \
             min_value, max_value, unit, flags, decimal_places, scaling, link_path \
         FROM parameters WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        let parameter = Parameter {
            id: row.get(0)?,
            index: row.get(1)?,
            subindex: row.get(2)?,
            name: TextRef(row.get(3)?),
            description: text_ref(row.get(4)?),
            default: row.get(7)?,
            min: row.get(8)?,
            max: row.get(9)?,
            unit: row.get(10)?,
            flags: ParameterFlags::from_bits_retain(row.get(11)?),
            decimal_places: row.get(12)?,
            scaling: row.get(13)?,
            link_path: row.get(14)?,
            ..Parameter::default()
        };
        Ok((parameter, row.get::<_, String>(5)?, row.get::<_, String>(6)?))
    })?;

    for (ordinal, row) in rows.enumerate() {
        let (mut parameter, data_type, access) = row?;
        parameter.data_type = parse_column::<DataTypeRef>("parameters", "data_type", &data_type)?;
        parameter.access = parse_column::<AccessRights>("parameters", "access", &access)?;
        let owner = owner(ordinal);
        parameter.enumeration = dependents.take_enumeration(&owner);
        parameter.constraints = dependents.take_constraints(&owner);
        parameter.record_items = dependents.take_layout(&owner)?;
        profile.parameters.push(parameter);
    }

    let mut stmt = conn.prepare_cached(
        "SELECT parameter, subindex, default_value, modifies_other_variables, \
             excluded_from_data_storage \
         FROM record_item_info WHERE profile_id = ?1 ORDER BY parameter, ordinal",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        let info = RecordItemInfo {
            subindex: row.get(1)?,
            default: row.get(2)?,
            modifies_other_variables: row.get(3)?,
            excluded_from_data_storage: row.get(4)?,
        };
        Ok((row.get::<_, usize>(0)?, info))
    })?;
    for row in rows {
        let (ordinal, info) = row?;
        let parameter = profile.parameters.get_mut(ordinal).ok_or_else(|| {
            StoreError::InvalidData(format!("record_item_info.parameter: no parameter {}", ordinal))
        })?;
        parameter.record_item_info.push(info);
    }

    let mut stmt = conn.prepare_cached(
        "SELECT id, default_value, fixed_length_restriction, excluded_from_data_storage \
         FROM standard_variables WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    profile.standard_variables = stmt
        .query_map(params![id], |row| {
            Ok(StandardVariableRef {
                id: row.get(0)?,
                default_value: row.get(1)?,
                fixed_length_restriction: row.get(2)?,
                excluded_from_data_storage: row.get(3)?,
            })
        })?
        .collect::<Result<_, _>>()?;
    Ok(())
}
