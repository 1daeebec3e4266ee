// crates/devprofile-rs-catalog/src/store/mapper/device.rs

//! Communication profile, features and product variants.

use super::{text_id, text_ref};
use crate::error::StoreError;
use devprofile_rs::model::{
    AccessLocks, CommunicationProfile, DeviceFeatures, DeviceProfile, TextRef, Variant,
};
use rusqlite::{Connection, OptionalExtension, params};

pub(super) fn insert(conn: &Connection, id: &str, profile: &DeviceProfile) -> rusqlite::Result<()> {
    if let Some(c) = &profile.communication {
        conn.execute(
            "INSERT INTO communication (profile_id, protocol_revision, bitrate, min_cycle_time, \
                 sio_supported, m_sequence_capability) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                c.protocol_revision,
                c.bitrate,
                c.min_cycle_time,
                c.sio_supported,
                c.m_sequence_capability,
            ],
        )?;
    }

    if let Some(f) = &profile.features {
        let locks = f.access_locks.unwrap_or_default();
        conn.execute(
            "INSERT INTO features (profile_id, block_parameter, data_storage, \
                 profile_characteristic, has_access_locks, lock_parameter, lock_data_storage, \
                 lock_local_parameterization, lock_local_user_interface) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                f.block_parameter,
                f.data_storage,
                f.profile_characteristic,
                f.access_locks.is_some(),
                locks.parameter,
                locks.data_storage,
                locks.local_parameterization,
                locks.local_user_interface,
            ],
        )?;
    }

    let mut stmt = conn.prepare_cached(
        "INSERT INTO variants (profile_id, ordinal, product_id, name, description, symbol, icon) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (ordinal, v) in profile.variants.iter().enumerate() {
        stmt.execute(params![
            id,
            ordinal,
            v.product_id,
            v.name.id(),
            text_id(&v.description),
            v.symbol,
            v.icon,
        ])?;
    }
    Ok(())
}

pub(super) fn load(conn: &Connection, id: &str, profile: &mut DeviceProfile) -> Result<(), StoreError> {
    profile.communication = conn
        .query_row(
            "SELECT protocol_revision, bitrate, min_cycle_time, sio_supported, \
                 m_sequence_capability FROM communication WHERE profile_id = ?1",
            params![id],
            |row| {
                Ok(CommunicationProfile {
                    protocol_revision: row.get(0)?,
                    bitrate: row.get(1)?,
                    min_cycle_time: row.get(2)?,
                    sio_supported: row.get(3)?,
                    m_sequence_capability: row.get(4)?,
                })
            },
        )
        .optional()?;

    profile.features = conn
        .query_row(
            "SELECT block_parameter, data_storage, profile_characteristic, has_access_locks, \
                 lock_parameter, lock_data_storage, lock_local_parameterization, \
                 lock_local_user_interface FROM features WHERE profile_id = ?1",
            params![id],
            |row| {
                let has_locks: bool = row.get(3)?;
                let locks = AccessLocks {
                    parameter: row.get(4)?,
                    data_storage: row.get(5)?,
                    local_parameterization: row.get(6)?,
                    local_user_interface: row.get(7)?,
                };
                Ok(DeviceFeatures {
                    block_parameter: row.get(0)?,
                    data_storage: row.get(1)?,
                    profile_characteristic: row.get(2)?,
                    access_locks: has_locks.then_some(locks),
                })
            },
        )
        .optional()?;

    let mut stmt = conn.prepare_cached(
        "SELECT product_id, name, description, symbol, icon FROM variants \
         WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    profile.variants = stmt
        .query_map(params![id], |row| {
            Ok(Variant {
                product_id: row.get(0)?,
                name: TextRef(row.get(1)?),
                description: text_ref(row.get(2)?),
                symbol: row.get(3)?,
                icon: row.get(4)?,
            })
        })?
        .collect::<Result<_, _>>()?;
    Ok(())
}
