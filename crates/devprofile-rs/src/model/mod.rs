// crates/devprofile-rs/src/model/mod.rs

//! The canonical device profile.
//!
//! These types are grammar independent: the markup and section-text
//! front-ends both produce a `DeviceProfile`, and the storage mapper, the
//! reconstructors and the fidelity engine consume it.

pub mod datatype;
pub mod device;
pub mod diagnostics;
pub mod parameter;
pub mod process_data;
pub mod record;
pub mod text;
pub mod ui;

pub use datatype::{ArrayElement, DataTypeRef, PrimitiveType, StringEncoding};
pub use device::{
    AccessLocks, CommunicationProfile, CustomDataType, DeviceFeatures, DeviceIdentity,
    DocumentInfo, EventTrigger, Extension, OpaqueSection, TestConfig, TestEntry, Variant,
    VendorInfo, Wire, WiringConfig,
};
pub use diagnostics::{ErrorType, Event, EventKind};
pub use parameter::{
    AccessRights, Constraint, EnumerationValue, Parameter, ParameterFlags, RecordItemInfo,
    StandardVariableRef,
};
pub use process_data::{
    Direction, ProcessData, ProcessDataCondition, ProcessDataItem, ProcessDataVariant,
};
pub use record::{RecordLayout, RecordNode};
pub use text::{TextEntry, TextRef, TextTable};
pub use ui::{Button, Menu, MenuItem, MenuKind, Role, RoleMenuSet, UserInterface};

use crate::grammar::Grammar;
use std::collections::BTreeMap;

/// Root aggregate: everything known about one ingested document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Grammar the profile was parsed from.
    pub grammar: Grammar,
    pub vendor: VendorInfo,
    pub identity: DeviceIdentity,
    pub document: DocumentInfo,
    pub parameters: Vec<Parameter>,
    pub standard_variables: Vec<StandardVariableRef>,
    pub process_data: ProcessData,
    pub error_types: Vec<ErrorType>,
    pub events: Vec<Event>,
    pub communication: Option<CommunicationProfile>,
    pub features: Option<DeviceFeatures>,
    pub variants: Vec<Variant>,
    pub user_interface: UserInterface,
    pub texts: TextTable,
    pub custom_types: BTreeMap<String, CustomDataType>,
    pub wiring: Option<WiringConfig>,
    pub test: TestConfig,
    pub opaque_sections: Vec<OpaqueSection>,
    pub extensions: Vec<Extension>,
}

impl DeviceProfile {
    /// An empty profile for `grammar`.
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            vendor: VendorInfo::default(),
            identity: DeviceIdentity::default(),
            document: DocumentInfo::default(),
            parameters: Vec::new(),
            standard_variables: Vec::new(),
            process_data: ProcessData::default(),
            error_types: Vec::new(),
            events: Vec::new(),
            communication: None,
            features: None,
            variants: Vec::new(),
            user_interface: UserInterface::default(),
            texts: TextTable::default(),
            custom_types: BTreeMap::new(),
            wiring: None,
            test: TestConfig::default(),
            opaque_sections: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn parameter(&self, id: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    /// True if `id` names a parameter or a referenced standard variable.
    pub fn has_variable(&self, id: &str) -> bool {
        self.parameter(id).is_some() || self.standard_variables.iter().any(|v| v.id == id)
    }

    pub fn parameter_by_index(&self, index: u16) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.index == index)
    }

    /// Resolves a text reference using the given language preference.
    pub fn text<'a>(&'a self, text: &'a TextRef, fallback_order: &[String]) -> &'a str {
        self.texts.resolve(text, fallback_order)
    }

    /// Extension value for `scope`/`key`, if one was preserved.
    pub fn extension(&self, scope: &str, key: &str) -> Option<&str> {
        self.extensions
            .iter()
            .find(|e| e.scope == scope && e.key == key)
            .map(|e| e.value.as_str())
    }
}
