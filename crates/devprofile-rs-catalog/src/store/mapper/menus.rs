// crates/devprofile-rs-catalog/src/store/mapper/menus.rs

use super::{parse_column, parse_optional, text_id, text_ref};
use crate::error::StoreError;
use devprofile_rs::model::{
    AccessRights, Button, Menu, MenuItem, MenuKind, Role, RoleMenuSet, UserInterface,
};
use rusqlite::{Connection, params};
use std::collections::HashMap;

pub(super) fn insert(conn: &Connection, id: &str, ui: &UserInterface) -> rusqlite::Result<()> {
    let mut menu_stmt = conn.prepare_cached(
        "INSERT INTO menus (profile_id, ordinal, id, name) VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut item_stmt = conn.prepare_cached(
        "INSERT INTO menu_items (profile_id, menu_ordinal, ordinal, kind, target_id, subindex, \
             access_restriction, display_format, unit_code) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    let mut button_stmt = conn.prepare_cached(
        "INSERT INTO menu_buttons (profile_id, menu_ordinal, item_ordinal, ordinal, value, description) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for (menu_ordinal, menu) in ui.menus.iter().enumerate() {
        menu_stmt.execute(params![id, menu_ordinal, menu.id, text_id(&menu.name)])?;
        for (ordinal, item) in menu.items.iter().enumerate() {
            match item {
                MenuItem::Variable {
                    variable_id,
                    access_restriction,
                    display_format,
                    unit_code,
                    buttons,
                } => {
                    item_stmt.execute(params![
                        id,
                        menu_ordinal,
                        ordinal,
                        item.kind(),
                        variable_id,
                        Option::<u8>::None,
                        access_restriction.map(|a| a.as_str()),
                        display_format,
                        unit_code,
                    ])?;
                    for (button_ordinal, button) in buttons.iter().enumerate() {
                        button_stmt.execute(params![
                            id,
                            menu_ordinal,
                            ordinal,
                            button_ordinal,
                            button.value,
                            text_id(&button.description),
                        ])?;
                    }
                }
                MenuItem::RecordItem {
                    variable_id,
                    subindex,
                    access_restriction,
                    display_format,
                    unit_code,
                } => {
                    item_stmt.execute(params![
                        id,
                        menu_ordinal,
                        ordinal,
                        item.kind(),
                        variable_id,
                        subindex,
                        access_restriction.map(|a| a.as_str()),
                        display_format,
                        unit_code,
                    ])?;
                }
                MenuItem::Menu { menu_id } => {
                    item_stmt.execute(params![
                        id,
                        menu_ordinal,
                        ordinal,
                        item.kind(),
                        menu_id,
                        Option::<u8>::None,
                        Option::<&str>::None,
                        Option::<&str>::None,
                        Option::<&str>::None,
                    ])?;
                }
            }
        }
    }

    let mut set_stmt = conn.prepare_cached(
        "INSERT INTO role_sets (profile_id, ordinal, role) VALUES (?1, ?2, ?3)",
    )?;
    let mut entry_stmt = conn.prepare_cached(
        "INSERT INTO role_set_menus (profile_id, set_ordinal, ordinal, menu_kind, menu_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (set_ordinal, set) in ui.role_sets.iter().enumerate() {
        set_stmt.execute(params![id, set_ordinal, set.role.as_str()])?;
        for (ordinal, (kind, menu_id)) in set.menus.iter().enumerate() {
            entry_stmt.execute(params![id, set_ordinal, ordinal, kind.as_str(), menu_id])?;
        }
    }
    Ok(())
}

struct ItemRow {
    menu_ordinal: usize,
    ordinal: usize,
    kind: String,
    target_id: String,
    subindex: Option<u8>,
    access_restriction: Option<String>,
    display_format: Option<String>,
    unit_code: Option<String>,
}

pub(super) fn load(conn: &Connection, id: &str) -> Result<UserInterface, StoreError> {
    let mut buttons: HashMap<(usize, usize), Vec<Button>> = HashMap::new();
    let mut stmt = conn.prepare_cached(
        "SELECT menu_ordinal, item_ordinal, value, description FROM menu_buttons \
         WHERE profile_id = ?1 ORDER BY menu_ordinal, item_ordinal, ordinal",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        Ok((
            (row.get::<_, usize>(0)?, row.get::<_, usize>(1)?),
            Button {
                value: row.get(2)?,
                description: text_ref(row.get(3)?),
            },
        ))
    })?;
    for row in rows {
        let (key, button) = row?;
        buttons.entry(key).or_default().push(button);
    }

    let mut stmt = conn.prepare_cached(
        "SELECT id, name FROM menus WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    let mut menus: Vec<Menu> = stmt
        .query_map(params![id], |row| {
            Ok(Menu {
                id: row.get(0)?,
                name: text_ref(row.get(1)?),
                items: Vec::new(),
            })
        })?
        .collect::<Result<_, _>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT menu_ordinal, ordinal, kind, target_id, subindex, access_restriction, \
             display_format, unit_code \
         FROM menu_items WHERE profile_id = ?1 ORDER BY menu_ordinal, ordinal",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        Ok(ItemRow {
            menu_ordinal: row.get(0)?,
            ordinal: row.get(1)?,
            kind: row.get(2)?,
            target_id: row.get(3)?,
            subindex: row.get(4)?,
            access_restriction: row.get(5)?,
            display_format: row.get(6)?,
            unit_code: row.get(7)?,
        })
    })?;
    for row in rows {
        let row = row?;
        let access_restriction: Option<AccessRights> =
            parse_optional("menu_items", "access_restriction", row.access_restriction)?;
        let item = match row.kind.as_str() {
            "variable" => MenuItem::Variable {
                buttons: buttons
                    .remove(&(row.menu_ordinal, row.ordinal))
                    .unwrap_or_default(),
                variable_id: row.target_id,
                access_restriction,
                display_format: row.display_format,
                unit_code: row.unit_code,
            },
            "record_item" => MenuItem::RecordItem {
                variable_id: row.target_id,
                subindex: row.subindex.ok_or_else(|| {
                    StoreError::InvalidData("menu_items.subindex: missing for record item".into())
                })?,
                access_restriction,
                display_format: row.display_format,
                unit_code: row.unit_code,
            },
            "menu" => MenuItem::Menu {
                menu_id: row.target_id,
            },
            other => {
                return Err(StoreError::InvalidData(format!(
                    "menu_items.kind: unknown item kind '{}'",
                    other
                )));
            }
        };
        let menu = menus.get_mut(row.menu_ordinal).ok_or_else(|| {
            StoreError::InvalidData(format!("menu_items: no menu at ordinal {}", row.menu_ordinal))
        })?;
        menu.items.push(item);
    }

    let mut stmt = conn.prepare_cached(
        "SELECT role FROM role_sets WHERE profile_id = ?1 ORDER BY ordinal",
    )?;
    let roles: Vec<String> = stmt
        .query_map(params![id], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    let mut role_sets = Vec::with_capacity(roles.len());
    for role in roles {
        role_sets.push(RoleMenuSet {
            role: parse_column::<Role>("role_sets", "role", &role)?,
            menus: Vec::new(),
        });
    }

    let mut stmt = conn.prepare_cached(
        "SELECT set_ordinal, menu_kind, menu_id FROM role_set_menus \
         WHERE profile_id = ?1 ORDER BY set_ordinal, ordinal",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        Ok((
            row.get::<_, usize>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;
    for row in rows {
        let (set_ordinal, kind, menu_id) = row?;
        let kind = parse_column::<MenuKind>("role_set_menus", "menu_kind", &kind)?;
        let set = role_sets.get_mut(set_ordinal).ok_or_else(|| {
            StoreError::InvalidData(format!("role_set_menus: no role set at ordinal {}", set_ordinal))
        })?;
        set.menus.push((kind, menu_id));
    }

    Ok(UserInterface { menus, role_sets })
}
