// crates/devprofile-rs-iodd/src/model/ui.rs

//! Contains model structs related to `<UserInterface>`.

use super::common::TextIdRef;
use serde::{Deserialize, Serialize};

/// Represents `<UserInterface>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UserInterface {
    #[serde(rename = "MenuCollection", default, skip_serializing_if = "Option::is_none")]
    pub menu_collection: Option<MenuCollection>,

    #[serde(
        rename = "ObserverRoleMenuSet",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub observer_role_menu_set: Option<RoleMenuSet>,

    #[serde(
        rename = "MaintenanceRoleMenuSet",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub maintenance_role_menu_set: Option<RoleMenuSet>,

    #[serde(
        rename = "SpecialistRoleMenuSet",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub specialist_role_menu_set: Option<RoleMenuSet>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct MenuCollection {
    #[serde(rename = "Menu", default, skip_serializing_if = "Vec::is_empty")]
    pub menu: Vec<Menu>,
}

/// Represents `<Menu id="...">`. The optional `<Name>` and the ordered
/// references share one list so that document order is kept.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Menu {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "$value", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum MenuEntry {
    Name(TextIdRef),
    VariableRef(VariableRef),
    RecordItemRef(RecordItemRef),
    MenuRef(MenuRef),
}

/// Represents `<VariableRef variableId="...">` with optional `<Button>`s.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct VariableRef {
    #[serde(rename = "@variableId")]
    pub variable_id: String,

    #[serde(
        rename = "@accessRightRestriction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_right_restriction: Option<String>,

    #[serde(rename = "@displayFormat", default, skip_serializing_if = "Option::is_none")]
    pub display_format: Option<String>,

    #[serde(rename = "@unitCode", default, skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<String>,

    #[serde(rename = "Button", default, skip_serializing_if = "Vec::is_empty")]
    pub button: Vec<Button>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Button {
    #[serde(rename = "@buttonValue")]
    pub button_value: String,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextIdRef>,
}

/// Represents `<RecordItemRef variableId="..." subindex="...">`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RecordItemRef {
    #[serde(rename = "@variableId")]
    pub variable_id: String,

    #[serde(rename = "@subindex")]
    pub subindex: String,

    #[serde(
        rename = "@accessRightRestriction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_right_restriction: Option<String>,

    #[serde(rename = "@displayFormat", default, skip_serializing_if = "Option::is_none")]
    pub display_format: Option<String>,

    #[serde(rename = "@unitCode", default, skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct MenuRef {
    #[serde(rename = "@menuId")]
    pub menu_id: String,
}

/// Represents `<ObserverRoleMenuSet>` and its siblings.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RoleMenuSet {
    #[serde(rename = "$value", default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RoleMenu>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum RoleMenu {
    IdentificationMenu(MenuRef),
    ParameterMenu(MenuRef),
    ObservationMenu(MenuRef),
    DiagnosisMenu(MenuRef),
}
