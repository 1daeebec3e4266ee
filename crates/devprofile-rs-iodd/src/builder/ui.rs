// crates/devprofile-rs-iodd/src/builder/ui.rs

use crate::model::common::TextIdRef;
use crate::model::ui::{
    self as model, MenuCollection, MenuEntry, MenuRef, RecordItemRef, RoleMenu, VariableRef,
};
use devprofile_rs::model::{MenuItem, MenuKind, Role, RoleMenuSet, UserInterface};

pub(super) fn build_user_interface(ui: &UserInterface) -> Option<model::UserInterface> {
    if ui.is_empty() {
        return None;
    }
    let menu_collection = (!ui.menus.is_empty()).then(|| MenuCollection {
        menu: ui.menus.iter().map(build_menu).collect(),
    });

    let mut result = model::UserInterface {
        menu_collection,
        ..Default::default()
    };
    for set in &ui.role_sets {
        let built = Some(build_role_set(set));
        match set.role {
            Role::Observer => result.observer_role_menu_set = built,
            Role::Maintenance => result.maintenance_role_menu_set = built,
            Role::Specialist => result.specialist_role_menu_set = built,
        }
    }
    Some(result)
}

fn build_menu(menu: &devprofile_rs::model::Menu) -> model::Menu {
    let name = menu
        .name
        .as_ref()
        .map(|n| MenuEntry::Name(TextIdRef::new(n.id())));
    let items = menu.items.iter().map(|item| match item {
        MenuItem::Variable {
            variable_id,
            access_restriction,
            display_format,
            unit_code,
            buttons,
        } => MenuEntry::VariableRef(VariableRef {
            variable_id: variable_id.clone(),
            access_right_restriction: access_restriction.map(|a| a.as_str().to_string()),
            display_format: display_format.clone(),
            unit_code: unit_code.clone(),
            button: buttons
                .iter()
                .map(|b| model::Button {
                    button_value: b.value.clone(),
                    description: b.description.as_ref().map(|d| TextIdRef::new(d.id())),
                })
                .collect(),
        }),
        MenuItem::RecordItem {
            variable_id,
            subindex,
            access_restriction,
            display_format,
            unit_code,
        } => MenuEntry::RecordItemRef(RecordItemRef {
            variable_id: variable_id.clone(),
            subindex: subindex.to_string(),
            access_right_restriction: access_restriction.map(|a| a.as_str().to_string()),
            display_format: display_format.clone(),
            unit_code: unit_code.clone(),
        }),
        MenuItem::Menu { menu_id } => MenuEntry::MenuRef(MenuRef {
            menu_id: menu_id.clone(),
        }),
    });
    model::Menu {
        id: menu.id.clone(),
        items: name.into_iter().chain(items).collect(),
    }
}

fn build_role_set(set: &RoleMenuSet) -> model::RoleMenuSet {
    let items = set
        .menus
        .iter()
        .map(|(kind, id)| {
            let r = MenuRef { menu_id: id.clone() };
            match kind {
                MenuKind::Identification => RoleMenu::IdentificationMenu(r),
                MenuKind::Parameter => RoleMenu::ParameterMenu(r),
                MenuKind::Observation => RoleMenu::ObservationMenu(r),
                MenuKind::Diagnosis => RoleMenu::DiagnosisMenu(r),
            }
        })
        .collect();
    model::RoleMenuSet { items }
}
