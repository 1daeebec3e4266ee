// crates/devprofile-rs/src/model/ui.rs

//! Menus of the device's user interface.

use super::parameter::AccessRights;
use super::text::TextRef;
use core::fmt;
use core::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserInterface {
    pub menus: Vec<Menu>,
    pub role_sets: Vec<RoleMenuSet>,
}

impl UserInterface {
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty() && self.role_sets.is_empty()
    }

    pub fn menu(&self, id: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Menu {
    pub id: String,
    pub name: Option<TextRef>,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Variable {
        variable_id: String,
        access_restriction: Option<AccessRights>,
        display_format: Option<String>,
        unit_code: Option<String>,
        buttons: Vec<Button>,
    },
    RecordItem {
        variable_id: String,
        subindex: u8,
        access_restriction: Option<AccessRights>,
        display_format: Option<String>,
        unit_code: Option<String>,
    },
    Menu {
        menu_id: String,
    },
}

impl MenuItem {
    /// Shorthand for a plain parameter reference.
    pub fn variable(variable_id: impl Into<String>) -> Self {
        MenuItem::Variable {
            variable_id: variable_id.into(),
            access_restriction: None,
            display_format: None,
            unit_code: None,
            buttons: Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MenuItem::Variable { .. } => "variable",
            MenuItem::RecordItem { .. } => "record_item",
            MenuItem::Menu { .. } => "menu",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Button {
    pub value: String,
    pub description: Option<TextRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Observer,
    Maintenance,
    Specialist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Observer => "Observer",
            Role::Maintenance => "Maintenance",
            Role::Specialist => "Specialist",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Observer" => Ok(Role::Observer),
            "Maintenance" => Ok(Role::Maintenance),
            "Specialist" => Ok(Role::Specialist),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKind {
    Identification,
    Parameter,
    Observation,
    Diagnosis,
}

impl MenuKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuKind::Identification => "Identification",
            MenuKind::Parameter => "Parameter",
            MenuKind::Observation => "Observation",
            MenuKind::Diagnosis => "Diagnosis",
        }
    }
}

impl fmt::Display for MenuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Identification" => Ok(MenuKind::Identification),
            "Parameter" => Ok(MenuKind::Parameter),
            "Observation" => Ok(MenuKind::Observation),
            "Diagnosis" => Ok(MenuKind::Diagnosis),
            other => Err(format!("unknown menu kind '{}'", other)),
        }
    }
}

/// The entry menus offered to one user role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMenuSet {
    pub role: Role,
    /// (menu kind, menu id) in document order.
    pub menus: Vec<(MenuKind, String)>,
}
