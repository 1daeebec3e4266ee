// crates/devprofile-rs-iodd/src/resolver/ui.rs

use super::utils::{opt_access_rights, opt_text_ref, text_ref};
use crate::model::ui::{self as model, MenuEntry, RoleMenu};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{Button, Menu, MenuItem, MenuKind, Role, RoleMenuSet, UserInterface};
use devprofile_rs::numeric::parse_u8;

/// Resolves `<UserInterface>`. Cross references are checked by the validator.
pub(super) fn resolve_user_interface(ui: &model::UserInterface) -> Result<UserInterface, ParseError> {
    let menus = ui
        .menu_collection
        .iter()
        .flat_map(|c| c.menu.iter())
        .map(resolve_menu)
        .collect::<Result<Vec<_>, _>>()?;

    let role_sets = [
        (Role::Observer, &ui.observer_role_menu_set),
        (Role::Maintenance, &ui.maintenance_role_menu_set),
        (Role::Specialist, &ui.specialist_role_menu_set),
    ]
    .into_iter()
    .filter_map(|(role, set)| set.as_ref().map(|s| resolve_role_set(role, s)))
    .collect();

    Ok(UserInterface { menus, role_sets })
}

fn resolve_menu(menu: &model::Menu) -> Result<Menu, ParseError> {
    let path = format!("MenuCollection/Menu[{}]", menu.id);
    let mut name = None;
    let mut items = Vec::new();

    for entry in &menu.items {
        match entry {
            MenuEntry::Name(n) => name = Some(text_ref(n)),
            MenuEntry::VariableRef(v) => {
                let item_path = format!("{}/VariableRef[{}]", path, v.variable_id);
                items.push(MenuItem::Variable {
                    variable_id: v.variable_id.clone(),
                    access_restriction: opt_access_rights(
                        v.access_right_restriction.as_ref(),
                        &format!("{}/@accessRightRestriction", item_path),
                    )?,
                    display_format: v.display_format.clone(),
                    unit_code: v.unit_code.clone(),
                    buttons: v
                        .button
                        .iter()
                        .map(|b| Button {
                            value: b.button_value.clone(),
                            description: opt_text_ref(b.description.as_ref()),
                        })
                        .collect(),
                });
            }
            MenuEntry::RecordItemRef(r) => {
                let item_path = format!("{}/RecordItemRef[{}]", path, r.variable_id);
                items.push(MenuItem::RecordItem {
                    variable_id: r.variable_id.clone(),
                    subindex: parse_u8(&r.subindex, &format!("{}/@subindex", item_path))?,
                    access_restriction: opt_access_rights(
                        r.access_right_restriction.as_ref(),
                        &format!("{}/@accessRightRestriction", item_path),
                    )?,
                    display_format: r.display_format.clone(),
                    unit_code: r.unit_code.clone(),
                });
            }
            MenuEntry::MenuRef(m) => items.push(MenuItem::Menu {
                menu_id: m.menu_id.clone(),
            }),
        }
    }

    Ok(Menu {
        id: menu.id.clone(),
        name,
        items,
    })
}

fn resolve_role_set(role: Role, set: &model::RoleMenuSet) -> RoleMenuSet {
    let menus = set
        .items
        .iter()
        .map(|entry| match entry {
            RoleMenu::IdentificationMenu(m) => (MenuKind::Identification, m.menu_id.clone()),
            RoleMenu::ParameterMenu(m) => (MenuKind::Parameter, m.menu_id.clone()),
            RoleMenu::ObservationMenu(m) => (MenuKind::Observation, m.menu_id.clone()),
            RoleMenu::DiagnosisMenu(m) => (MenuKind::Diagnosis, m.menu_id.clone()),
        })
        .collect();
    RoleMenuSet { role, menus }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order_is_kept() {
        let xml = r#"<UserInterface>
            <MenuCollection>
              <Menu id="M_Main">
                <Name textId="TI_Main"/>
                <VariableRef variableId="V_A" displayFormat="Dec"/>
                <MenuRef menuId="M_Sub"/>
                <RecordItemRef variableId="V_R" subindex="2"/>
              </Menu>
              <Menu id="M_Sub"><VariableRef variableId="V_B"/></Menu>
            </MenuCollection>
            <SpecialistRoleMenuSet>
              <IdentificationMenu menuId="M_Main"/>
              <ParameterMenu menuId="M_Sub"/>
            </SpecialistRoleMenuSet>
          </UserInterface>"#;
        let ui: model::UserInterface = quick_xml::de::from_str(xml).unwrap();
        let ui = resolve_user_interface(&ui).unwrap();

        let main = ui.menu("M_Main").unwrap();
        assert_eq!(main.name.as_ref().map(|n| n.id()), Some("TI_Main"));
        let kinds: Vec<_> = main.items.iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, vec!["variable", "menu", "record_item"]);

        assert_eq!(ui.role_sets.len(), 1);
        assert_eq!(ui.role_sets[0].role, Role::Specialist);
        assert_eq!(
            ui.role_sets[0].menus[1],
            (MenuKind::Parameter, "M_Sub".to_string())
        );
    }
}
