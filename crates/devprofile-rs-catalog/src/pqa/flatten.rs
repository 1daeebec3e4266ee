// crates/devprofile-rs-catalog/src/pqa/flatten.rs

//! Flattens a profile into keyed nodes.
//!
//! Keyed lists (parameters, error types, events, variants, menus, texts,
//! custom types, process data variants, extensions, opaque sections) are
//! keyed by their natural
//! key so that reordering alone is not a difference. Ordered children
//! (enumeration values, constraints, record items, menu items, wires, test
//! entries) are keyed by position.

use devprofile_rs::model::{
    Constraint, DeviceProfile, EnumerationValue, MenuItem, Parameter, ProcessDataCondition,
    RecordLayout,
};
use std::collections::HashMap;
use std::fmt::Display;

/// One comparable unit of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub category: &'static str,
    pub path: String,
    /// Present fields only, in a fixed order.
    pub fields: Vec<(&'static str, String)>,
}

impl Node {
    /// Leaf count used to weigh a node that is missing altogether.
    pub fn leaf_count(&self) -> usize {
        self.fields.len().max(1)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct Fields(Vec<(&'static str, String)>);

impl Fields {
    fn put(mut self, name: &'static str, value: impl Display) -> Self {
        self.0.push((name, value.to_string()));
        self
    }

    fn opt<T: Display>(mut self, name: &'static str, value: Option<T>) -> Self {
        if let Some(v) = value {
            self.0.push((name, v.to_string()));
        }
        self
    }
}

#[derive(Default)]
struct Flattener {
    nodes: Vec<Node>,
    seen: HashMap<String, usize>,
}

impl Flattener {
    /// Adds a node and returns its (unique) path.
    fn push(&mut self, category: &'static str, path: String, fields: Fields) -> String {
        let count = self.seen.entry(path.clone()).or_insert(0);
        *count += 1;
        let path = if *count > 1 {
            format!("{}#{}", path, count)
        } else {
            path
        };
        self.nodes.push(Node {
            category,
            path: path.clone(),
            fields: fields.0,
        });
        path
    }

    fn enumeration(&mut self, owner: &str, values: &[EnumerationValue]) {
        for (i, v) in values.iter().enumerate() {
            self.push(
                "enumeration",
                format!("{}/Enum[{}]", owner, i),
                Fields::default().put("value", &v.value).put("name", &v.name),
            );
        }
    }

    fn constraints(&mut self, owner: &str, constraints: &[Constraint]) {
        for (i, c) in constraints.iter().enumerate() {
            let Constraint::ValueRange { lower, upper, name } = c;
            self.push(
                "constraint",
                format!("{}/Constraint[{}]", owner, i),
                Fields::default()
                    .put("lower", lower)
                    .put("upper", upper)
                    .opt("name", name.as_ref()),
            );
        }
    }

    fn layout(&mut self, owner: &str, layout: &RecordLayout) {
        for (i, node) in layout.nodes().iter().enumerate() {
            let path = self.push(
                "record_item",
                format!("{}/RecordItem[{}]", owner, i),
                Fields::default()
                    .opt("parent", node.parent)
                    .put("bitOffset", node.bit_offset)
                    .put("bitLength", node.bit_length)
                    .put("dataType", &node.data_type)
                    .opt("subindex", node.subindex)
                    .opt("name", node.name.as_ref())
                    .opt("description", node.description.as_ref())
                    .opt("accessRestriction", node.access_restriction)
                    .opt("reference", node.reference.as_ref()),
            );
            self.enumeration(&path, &node.enumeration);
            self.constraints(&path, &node.constraints);
        }
    }

    fn parameter(&mut self, p: &Parameter) {
        let key = match p.subindex {
            Some(sub) => format!("Parameter[{}.{}]", p.index, sub),
            None => format!("Parameter[{}]", p.index),
        };
        let path = self.push(
            "parameter",
            key,
            Fields::default()
                .put("id", &p.id)
                .put("name", &p.name)
                .opt("description", p.description.as_ref())
                .put("dataType", &p.data_type)
                .put("accessRights", p.access)
                .opt("defaultValue", p.default.as_ref())
                .opt("min", p.min.as_ref())
                .opt("max", p.max.as_ref())
                .opt("unit", p.unit.as_ref())
                .put("flags", format!("0x{:04X}", p.flags.bits()))
                .opt("decimalPlaces", p.decimal_places)
                .opt("scaling", p.scaling.as_ref())
                .opt("linkPath", p.link_path.as_ref()),
        );
        self.enumeration(&path, &p.enumeration);
        self.constraints(&path, &p.constraints);
        self.layout(&path, &p.record_items);
        for info in &p.record_item_info {
            self.push(
                "record_item",
                format!("{}/RecordItemInfo[{}]", path, info.subindex),
                Fields::default()
                    .opt("defaultValue", info.default.as_ref())
                    .opt("modifiesOtherVariables", info.modifies_other_variables)
                    .opt("excludedFromDataStorage", info.excluded_from_data_storage),
            );
        }
    }
}

fn condition_fields(condition: Option<&ProcessDataCondition>) -> Fields {
    match condition {
        Some(c) => Fields::default()
            .put("conditionVariable", &c.variable_id)
            .opt("conditionSubindex", c.subindex)
            .put("conditionValue", &c.value),
        None => Fields::default(),
    }
}

/// Flattens `profile` into nodes in a deterministic order.
pub fn flatten(profile: &DeviceProfile) -> Vec<Node> {
    let mut f = Flattener::default();

    let id = &profile.identity;
    f.push(
        "identity",
        "Identity".into(),
        Fields::default()
            .put("vendorId", profile.vendor.id)
            .put("vendorName", &profile.vendor.name)
            .put("identityVendorId", id.vendor_id)
            .put("deviceId", id.device_id)
            .put("productName", &id.product_name)
            .opt("revision", id.revision.as_ref())
            .opt("vendorText", id.vendor_text.as_ref())
            .opt("vendorUrl", id.vendor_url.as_ref())
            .opt("deviceFamily", id.device_family.as_ref()),
    );

    let doc = &profile.document;
    f.push(
        "document",
        "Document".into(),
        Fields::default()
            .put("schemaVersion", &doc.schema_version)
            .opt("releaseDate", doc.release_date.as_ref())
            .opt("version", doc.version.as_ref())
            .opt("copyright", doc.copyright.as_ref()),
    );

    for p in &profile.parameters {
        f.parameter(p);
    }
    for v in &profile.standard_variables {
        f.push(
            "parameter",
            format!("StandardVariable[{}]", v.id),
            Fields::default()
                .opt("defaultValue", v.default_value.as_ref())
                .opt("fixedLengthRestriction", v.fixed_length_restriction)
                .opt("excludedFromDataStorage", v.excluded_from_data_storage),
        );
    }

    let data = &profile.process_data;
    if data.collection_id.is_some() || data.condition.is_some() {
        f.push(
            "process_data",
            "ProcessData".into(),
            condition_fields(data.condition.as_ref())
                .opt("collectionId", data.collection_id.as_ref()),
        );
    }
    for variant in &data.alternatives {
        f.push(
            "process_data",
            format!("ProcessData[{}]", variant.id),
            condition_fields(variant.condition.as_ref()),
        );
    }
    for (label, item) in data.all_items() {
        let path = f.push(
            "process_data",
            format!("ProcessData[{}]", label),
            Fields::default()
                .put("id", &item.id)
                .opt("name", item.name.as_ref())
                .put("bitLength", item.bit_length)
                .put("dataType", &item.data_type)
                .opt("path", item.path.as_ref())
                .put("flags", item.flags),
        );
        f.layout(&path, &item.items);
    }

    for e in &profile.error_types {
        f.push(
            "error_type",
            format!("ErrorType[{}:{}]", e.code, e.additional_code),
            Fields::default()
                .put("standard", e.standard)
                .opt("name", e.name.as_ref())
                .opt("description", e.description.as_ref()),
        );
    }
    for e in &profile.events {
        f.push(
            "event",
            format!("Event[{}]", e.code),
            Fields::default()
                .put("standard", e.standard)
                .opt("type", e.kind)
                .opt("name", e.name.as_ref())
                .opt("description", e.description.as_ref()),
        );
    }

    if let Some(c) = &profile.communication {
        f.push(
            "communication",
            "Communication".into(),
            Fields::default()
                .opt("protocolRevision", c.protocol_revision.as_ref())
                .opt("bitrate", c.bitrate.as_ref())
                .opt("minCycleTime", c.min_cycle_time)
                .opt("sioSupported", c.sio_supported)
                .opt("mSequenceCapability", c.m_sequence_capability),
        );
    }
    if let Some(features) = &profile.features {
        let mut fields = Fields::default()
            .put("blockParameter", features.block_parameter)
            .put("dataStorage", features.data_storage)
            .opt("profileCharacteristic", features.profile_characteristic.as_ref());
        if let Some(locks) = features.access_locks {
            fields = fields
                .put("lockParameter", locks.parameter)
                .put("lockDataStorage", locks.data_storage)
                .put("lockLocalParameterization", locks.local_parameterization)
                .put("lockLocalUserInterface", locks.local_user_interface);
        }
        f.push("features", "Features".into(), fields);
    }

    for v in &profile.variants {
        f.push(
            "variant",
            format!("Variant[{}]", v.product_id),
            Fields::default()
                .put("name", &v.name)
                .opt("description", v.description.as_ref())
                .opt("symbol", v.symbol.as_ref())
                .opt("icon", v.icon.as_ref()),
        );
    }

    for menu in &profile.user_interface.menus {
        let path = f.push(
            "menu",
            format!("Menu[{}]", menu.id),
            Fields::default().opt("name", menu.name.as_ref()),
        );
        for (i, item) in menu.items.iter().enumerate() {
            let item_path = format!("{}/Item[{}]", path, i);
            match item {
                MenuItem::Variable {
                    variable_id,
                    access_restriction,
                    display_format,
                    unit_code,
                    buttons,
                } => {
                    let item_path = f.push(
                        "menu",
                        item_path,
                        Fields::default()
                            .put("kind", item.kind())
                            .put("variableId", variable_id)
                            .opt("accessRightRestriction", *access_restriction)
                            .opt("displayFormat", display_format.as_ref())
                            .opt("unitCode", unit_code.as_ref()),
                    );
                    for (j, button) in buttons.iter().enumerate() {
                        f.push(
                            "menu",
                            format!("{}/Button[{}]", item_path, j),
                            Fields::default()
                                .put("buttonValue", &button.value)
                                .opt("description", button.description.as_ref()),
                        );
                    }
                }
                MenuItem::RecordItem {
                    variable_id,
                    subindex,
                    access_restriction,
                    display_format,
                    unit_code,
                } => {
                    f.push(
                        "menu",
                        item_path,
                        Fields::default()
                            .put("kind", item.kind())
                            .put("variableId", variable_id)
                            .put("subindex", subindex)
                            .opt("accessRightRestriction", *access_restriction)
                            .opt("displayFormat", display_format.as_ref())
                            .opt("unitCode", unit_code.as_ref()),
                    );
                }
                MenuItem::Menu { menu_id } => {
                    f.push(
                        "menu",
                        item_path,
                        Fields::default().put("kind", item.kind()).put("menuId", menu_id),
                    );
                }
            }
        }
    }
    for set in &profile.user_interface.role_sets {
        let path = f.push("menu", format!("RoleSet[{}]", set.role.as_str()), Fields::default());
        for (i, (kind, menu_id)) in set.menus.iter().enumerate() {
            f.push(
                "menu",
                format!("{}/Entry[{}]", path, i),
                Fields::default().put("kind", kind).put("menuId", menu_id),
            );
        }
    }

    if !profile.texts.languages.is_empty() {
        f.push(
            "text",
            "TextTable".into(),
            Fields::default().put("languages", profile.texts.languages.join(",")),
        );
    }
    for entry in profile.texts.entries() {
        for (lang, value) in &entry.translations {
            f.push(
                "text",
                format!("Text[{}@{}]", entry.id, lang),
                Fields::default().put("value", value),
            );
        }
    }

    for ty in profile.custom_types.values() {
        let path = f.push(
            "custom_type",
            format!("CustomType[{}]", ty.id),
            Fields::default().put("dataType", &ty.data_type),
        );
        f.enumeration(&path, &ty.enumeration);
        f.constraints(&path, &ty.constraints);
        f.layout(&path, &ty.items);
    }

    if let Some(wiring) = &profile.wiring {
        f.push(
            "wiring",
            "Wiring".into(),
            Fields::default().put("connectionType", &wiring.connection_type),
        );
        for (i, wire) in wiring.wires.iter().enumerate() {
            f.push(
                "wiring",
                format!("Wiring/Wire[{}]", i),
                Fields::default()
                    .put("number", wire.number)
                    .opt("color", wire.color.as_ref())
                    .opt("function", wire.function.as_ref()),
            );
        }
    }

    for (i, entry) in profile.test.entries.iter().enumerate() {
        let path = f.push(
            "test",
            format!("Test/Entry[{}]", i),
            Fields::default()
                .put("slot", entry.slot)
                .put("index", entry.index)
                .put("testValue", &entry.test_value),
        );
        for (j, t) in entry.triggers.iter().enumerate() {
            f.push(
                "test",
                format!("{}/Trigger[{}]", path, j),
                Fields::default()
                    .put("appearValue", t.appear_value)
                    .put("disappearValue", t.disappear_value),
            );
        }
    }

    for section in &profile.opaque_sections {
        f.push(
            "opaque_section",
            format!("OpaqueSection[{}]", section.name),
            Fields::default().put("body", &section.body),
        );
    }
    for ext in &profile.extensions {
        f.push(
            "extension",
            format!("Extension[{}/{}]", ext.scope, ext.key),
            Fields::default().put("value", &ext.value),
        );
    }

    f.nodes
}
