// crates/devprofile-rs-eds/src/writer.rs

//! Serializes a `DeviceProfile` as section text.
//!
//! Sections are written in a fixed order (`File`, `Device`, `Params`,
//! `Groups`, `Assembly`), followed by the opaque sections in source order.
//! Descriptors and type codes are written in hexadecimal, sizes and numbers
//! in decimal. Comments are not reproduced.

use crate::datatypes;
use crate::lexer::{Field, quote, split_fields};
use crate::resolver::utils::{direction_of, key_number};
use crate::resolver::{HEADER_FIELDS, PARAM_FIELDS, READ_ONLY, SectionKind};
use core::fmt::{self, Write};
use devprofile_rs::config::Config;
use devprofile_rs::error::ReconstructError;
use devprofile_rs::grammar::Grammar;
use devprofile_rs::model::{
    AccessRights, Constraint, DataTypeRef, DeviceProfile, Direction, EnumerationValue, MenuItem,
    OpaqueSection, Parameter, ParameterFlags, ProcessDataItem, RecordNode, TextRef,
};
use log::{debug, warn};

/// Serializes a `DeviceProfile` into an EDS-style document.
///
/// The output is deterministic: the same profile always yields the same
/// string.
///
/// # Errors
/// `ReconstructError::Unsupported` if the vendor or product code does not
/// fit 16 bits.
pub fn save_eds_to_string(
    profile: &DeviceProfile,
    config: &Config,
) -> Result<String, ReconstructError> {
    check_identity_ranges(profile)?;
    if profile.grammar != Grammar::SectionText {
        warn_dropped(profile);
    }

    let mut writer = SectionWriter {
        out: String::new(),
        profile,
        languages: &config.languages.fallback_order,
    };
    writer.file()?;
    writer.device()?;
    writer.params()?;
    writer.groups()?;
    writer.assembly()?;
    for section in &profile.opaque_sections {
        writer.opaque(section)?;
    }

    debug!(
        "Wrote EDS for vendor {} product {} ({} bytes)",
        profile.identity.vendor_id,
        profile.identity.device_id,
        writer.out.len()
    );
    Ok(writer.out)
}

fn check_identity_ranges(profile: &DeviceProfile) -> Result<(), ReconstructError> {
    let codes = [
        ("Device/VendCode", profile.identity.vendor_id),
        ("Device/ProdCode", profile.identity.device_id),
    ];
    for (field, value) in codes {
        if value > u32::from(u16::MAX) {
            return Err(ReconstructError::Unsupported {
                field: field.into(),
                reason: format!("{} does not fit 16 bits", value),
            });
        }
    }
    Ok(())
}

/// Logs the parts of a markup profile that section text cannot carry.
fn warn_dropped(profile: &DeviceProfile) {
    let dropped = [
        ("standard variable references", profile.standard_variables.len()),
        (
            "record item overrides",
            profile.parameters.iter().map(|p| p.record_item_info.len()).sum(),
        ),
        ("error types", profile.error_types.len()),
        ("events", profile.events.len()),
        ("device variants", profile.variants.len()),
        ("role menu sets", profile.user_interface.role_sets.len()),
        ("test entries", profile.test.entries.len()),
        ("conditional process data variants", profile.process_data.alternatives.len()),
        ("process data conditions", usize::from(profile.process_data.condition.is_some())),
        ("secondary text languages", profile.texts.languages.len().saturating_sub(1)),
        ("communication profiles", usize::from(profile.communication.is_some())),
        ("feature sets", usize::from(profile.features.is_some())),
        ("wiring descriptions", usize::from(profile.wiring.is_some())),
        ("document versions", usize::from(profile.document.version.is_some())),
        ("copyright notes", usize::from(profile.document.copyright.is_some())),
    ];
    for (what, count) in dropped {
        if count > 0 {
            warn!("Skipping {} {}: no section-text equivalent", count, what);
        }
    }
}

/// Writes a scalar bare when it tokenizes back unchanged, quoted otherwise.
fn value(s: &str) -> String {
    let bare = !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | ';' | '$' | '"' | '{' | '}'));
    if bare { s.to_string() } else { quote(s) }
}

fn optional_value(v: Option<&String>) -> String {
    v.map(|s| value(s)).unwrap_or_default()
}

/// Re-splits a stored run of positional fields, or yields `count` empty
/// fields if it does not have the expected shape.
fn fixed_fields(stored: Option<&str>, count: usize, param_id: &str, what: &str) -> Vec<String> {
    if let Some(stored) = stored {
        match split_fields(stored) {
            Ok(fields) if fields.len() == count => {
                return fields.iter().map(Field::to_source).collect();
            }
            _ => warn!(
                "Parameter '{}': {} '{}' does not form {} fields, writing empty fields",
                param_id, what, stored, count
            ),
        }
    }
    vec![String::new(); count]
}

fn split_revision(revision: &str) -> Option<(u8, Option<u8>)> {
    match revision.split_once('.') {
        Some((major, minor)) => Some((major.parse().ok()?, Some(minor.parse().ok()?))),
        None => Some((revision.parse().ok()?, None)),
    }
}

struct SectionWriter<'a> {
    out: String,
    profile: &'a DeviceProfile,
    languages: &'a [String],
}

impl<'a> SectionWriter<'a> {
    fn text(&self, text: &'a TextRef) -> &'a str {
        self.profile.text(text, self.languages)
    }

    // --- Primitives ---

    fn header(&mut self, name: &str) -> fmt::Result {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        writeln!(self.out, "[{}]", name)
    }

    fn entry(&mut self, key: &str, value: &str) -> fmt::Result {
        writeln!(self.out, "\t{} = {};", key, value)
    }

    /// Multi-field entries put their value on a continuation line.
    fn long_entry(&mut self, key: &str, fields: &[String]) -> fmt::Result {
        writeln!(self.out, "\t{} =\n\t\t{};", key, fields.join(","))
    }

    fn has_extensions(&self, kind: SectionKind) -> bool {
        self.profile.extensions.iter().any(|e| e.scope == kind.name())
    }

    fn extensions(&mut self, kind: SectionKind) -> fmt::Result {
        let profile = self.profile;
        for extension in profile.extensions.iter().filter(|e| e.scope == kind.name()) {
            self.entry(&extension.key, &extension.value)?;
        }
        Ok(())
    }

    // --- File and Device ---

    fn file(&mut self) -> fmt::Result {
        let document = &self.profile.document;
        self.header(SectionKind::File.name())?;
        if !document.schema_version.is_empty() {
            self.entry("Revision", &value(&document.schema_version))?;
        }
        if let Some(date) = &document.release_date {
            self.entry("CreateDate", &value(date))?;
        }
        self.extensions(SectionKind::File)
    }

    fn device(&mut self) -> fmt::Result {
        let profile = self.profile;
        let identity = &profile.identity;
        self.header(SectionKind::Device.name())?;
        self.entry("VendCode", &identity.vendor_id.to_string())?;
        self.entry("VendName", &quote(&profile.vendor.name))?;
        self.entry("ProdCode", &identity.device_id.to_string())?;
        self.entry("ProdName", &quote(self.text(&identity.product_name)))?;
        if let Some(revision) = &identity.revision {
            match split_revision(revision) {
                Some((major, minor)) => {
                    self.entry("MajRev", &major.to_string())?;
                    if let Some(minor) = minor {
                        self.entry("MinRev", &minor.to_string())?;
                    }
                }
                None => warn!(
                    "Revision '{}' cannot be written as MajRev/MinRev, skipping",
                    revision
                ),
            }
        }
        self.extensions(SectionKind::Device)
    }

    // --- Params ---

    fn params(&mut self) -> fmt::Result {
        let profile = self.profile;
        if profile.parameters.is_empty() && !self.has_extensions(SectionKind::Params) {
            return Ok(());
        }
        self.header(SectionKind::Params.name())?;
        for param in &profile.parameters {
            let Some(fields) = self.param_fields(param) else {
                continue;
            };
            self.long_entry(&format!("Param{}", param.index), &fields)?;

            let enumeration = self.enumeration(param);
            if !enumeration.is_empty() {
                let pairs: Vec<String> = enumeration
                    .iter()
                    .flat_map(|e| [value(&e.value), quote(self.text(&e.name))])
                    .collect();
                self.entry(&format!("Enum{}", param.index), &pairs.join(","))?;
            }
        }
        self.extensions(SectionKind::Params)
    }

    /// The 20 positional fields of `ParamN`, or `None` if the parameter's
    /// type has no section-text code.
    fn param_fields(&self, param: &'a Parameter) -> Option<Vec<String>> {
        let Some((code, size)) = self.type_code(&param.data_type) else {
            warn!(
                "Parameter '{}' has no section-text data type, skipping",
                param.id
            );
            return None;
        };

        let bits = param.flags.bits();
        if bits & !ParameterFlags::DESCRIPTOR_MASK != 0 {
            warn!(
                "Parameter '{}': flags 0x{:04X} have no descriptor bit, skipping them",
                param.id,
                bits & !ParameterFlags::DESCRIPTOR_MASK
            );
        }
        let mut descriptor = bits & ParameterFlags::DESCRIPTOR_MASK & !READ_ONLY;
        match param.access {
            AccessRights::ReadOnly => descriptor |= READ_ONLY,
            AccessRights::ReadWrite => {}
            AccessRights::WriteOnly => warn!(
                "Parameter '{}' is write-only, writing it as read-write",
                param.id
            ),
        }

        // A markup value range becomes the min/max pair.
        let range = param
            .constraints
            .first()
            .map(|Constraint::ValueRange { lower, upper, .. }| (lower, upper));
        if param.constraints.len() > 1 {
            warn!(
                "Parameter '{}': only the first of {} value ranges is written",
                param.id,
                param.constraints.len()
            );
        }
        let min = param.min.as_ref().or(range.map(|r| r.0));
        let max = param.max.as_ref().or(range.map(|r| r.1));

        let description = param
            .description
            .as_ref()
            .map(|d| self.text(d))
            .unwrap_or("");

        let mut fields = Vec::with_capacity(PARAM_FIELDS);
        fields.extend(fixed_fields(param.link_path.as_deref(), 2, &param.id, "link path"));
        fields.push(format!("0x{:04X}", descriptor));
        fields.push(format!("0x{:02X}", code));
        fields.push(size.to_string());
        fields.push(quote(self.text(&param.name)));
        fields.push(quote(param.unit.as_deref().unwrap_or("")));
        fields.push(quote(description));
        fields.push(optional_value(min));
        fields.push(optional_value(max));
        fields.push(optional_value(param.default.as_ref()));
        fields.extend(fixed_fields(param.scaling.as_deref(), 8, &param.id, "scaling"));
        fields.push(
            param
                .decimal_places
                .map(|d| d.to_string())
                .unwrap_or_default(),
        );
        Some(fields)
    }

    /// The parameter's own value list, or the one of its custom type.
    fn enumeration(&self, param: &'a Parameter) -> &'a [EnumerationValue] {
        if !param.enumeration.is_empty() {
            return &param.enumeration;
        }
        match &param.data_type {
            DataTypeRef::Custom(id) => self
                .profile
                .custom_types
                .get(id)
                .map(|t| t.enumeration.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Type code and size, following custom type references.
    fn type_code(&self, data_type: &DataTypeRef) -> Option<(u8, u16)> {
        let types = &self.profile.custom_types;
        let mut current = data_type;
        for _ in 0..=types.len() {
            match current {
                DataTypeRef::Primitive(primitive) => return datatypes::to_code(primitive),
                DataTypeRef::Custom(id) => current = &types.get(id)?.data_type,
                _ => return None,
            }
        }
        None
    }

    /// The `ParamN` number of a parameter that is written.
    fn param_number(&self, id: &str) -> Option<u16> {
        self.profile
            .parameter(id)
            .filter(|p| self.type_code(&p.data_type).is_some())
            .map(|p| p.index)
    }

    // --- Groups ---

    fn groups(&mut self) -> fmt::Result {
        let profile = self.profile;
        let menus = &profile.user_interface.menus;
        if menus.is_empty() && !self.has_extensions(SectionKind::Groups) {
            return Ok(());
        }
        self.header(SectionKind::Groups.name())?;
        for (position, menu) in menus.iter().enumerate() {
            let number = key_number(&menu.id, "Group")
                .and_then(|d| d.parse::<u16>().ok())
                .unwrap_or_else(|| u16::try_from(position + 1).unwrap_or(u16::MAX));
            let name = menu
                .name
                .as_ref()
                .map(|n| self.text(n))
                .unwrap_or(menu.id.as_str());
            let members: Vec<u16> = menu
                .items
                .iter()
                .filter_map(|item| self.group_member(&menu.id, item))
                .collect();

            let mut fields = vec![quote(name), members.len().to_string()];
            fields.extend(members.iter().map(|m| m.to_string()));
            self.entry(&format!("Group{}", number), &fields.join(","))?;
        }
        self.extensions(SectionKind::Groups)
    }

    fn group_member(&self, menu_id: &str, item: &MenuItem) -> Option<u16> {
        match item {
            MenuItem::Variable { variable_id, .. } => {
                let number = self.param_number(variable_id);
                if number.is_none() {
                    warn!(
                        "Menu '{}': '{}' is not a written parameter, skipping",
                        menu_id, variable_id
                    );
                }
                number
            }
            other => {
                warn!(
                    "Menu '{}': {} entries have no section-text equivalent, skipping",
                    menu_id,
                    other.kind()
                );
                None
            }
        }
    }

    // --- Assembly ---

    fn assembly(&mut self) -> fmt::Result {
        let profile = self.profile;
        if profile.process_data.items().next().is_none() {
            return Ok(());
        }
        self.header(SectionKind::Assembly.name())?;
        for (direction, item) in profile.process_data.items() {
            let number = key_number(&item.id, "Assem")
                .and_then(|d| d.parse::<u16>().ok())
                .unwrap_or(match direction {
                    Direction::Input => 100,
                    Direction::Output => 150,
                });
            // An empty size lets the members define the length.
            let size = if item.bit_length % 8 == 0 {
                (item.bit_length / 8).to_string()
            } else {
                String::new()
            };

            let mut fields = vec![
                quote(&self.assembly_name(direction, item)),
                quote(item.path.as_deref().unwrap_or("")),
                size,
                format!("0x{:04X}", item.flags),
            ];
            fields.resize(HEADER_FIELDS, String::new());
            fields.extend(self.assembly_members(item));
            self.long_entry(&format!("Assem{}", number), &fields)?;
        }
        Ok(())
    }

    /// The name must state the direction for the section to read back as
    /// process data.
    fn assembly_name(&self, direction: Direction, item: &'a ProcessDataItem) -> String {
        let name = item.name.as_ref().map(|n| self.text(n)).unwrap_or("");
        if direction_of(name) == Some(direction) {
            return name.to_string();
        }
        let fallback = match direction {
            Direction::Input => "Input",
            Direction::Output => "Output",
        };
        let candidate = if name.is_empty() {
            fallback.to_string()
        } else {
            format!("{} {}", name, fallback)
        };
        let chosen = if direction_of(&candidate) == Some(direction) {
            candidate
        } else {
            fallback.to_string()
        };
        warn!(
            "Assembly '{}' does not name its direction, writing it as '{}'",
            item.id, chosen
        );
        chosen
    }

    fn assembly_members(&self, item: &ProcessDataItem) -> Vec<String> {
        let layout = &item.items;
        let mut roots: Vec<&RecordNode> = layout.roots().filter_map(|i| layout.get(i)).collect();
        if roots.len() < layout.len() {
            warn!(
                "Assembly '{}': {} nested members have no section-text equivalent, skipping",
                item.id,
                layout.len() - roots.len()
            );
        }
        roots.sort_by_key(|n| n.bit_offset);

        let mut fields = Vec::new();
        let mut offset: u32 = 0;
        for node in roots {
            if node.bit_offset > offset {
                fields.push((node.bit_offset - offset).to_string());
                fields.push(String::new());
            }
            let member = node
                .reference
                .as_deref()
                .and_then(|r| self.param_number(r));
            if member.is_none() && (node.reference.is_some() || node.name.is_some()) {
                warn!(
                    "Assembly '{}': member at bit {} does not reference a written parameter, writing padding",
                    item.id, node.bit_offset
                );
            }
            fields.push(node.bit_length.to_string());
            fields.push(member.map(|n| format!("Param{}", n)).unwrap_or_default());
            offset = node.bit_offset.saturating_add(node.bit_length);
        }
        fields
    }

    // --- Opaque Sections ---

    fn opaque(&mut self, section: &OpaqueSection) -> fmt::Result {
        self.header(&section.name)?;
        if !section.body.is_empty() {
            writeln!(self.out, "{}", section.body)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_quoting() {
        assert_eq!(value("0x10"), "0x10");
        assert_eq!(value("-1.5"), "-1.5");
        assert_eq!(value(""), "\"\"");
        assert_eq!(value("a b"), "\"a b\"");
        assert_eq!(value("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(value("1,2"), "\"1,2\"");
    }

    #[test]
    fn test_split_revision() {
        assert_eq!(split_revision("3.14"), Some((3, Some(14))));
        assert_eq!(split_revision("2"), Some((2, None)));
        assert_eq!(split_revision("V1.0"), None);
        assert_eq!(split_revision("1.300"), None);
    }

    #[test]
    fn test_fixed_fields_shape() {
        assert_eq!(
            fixed_fields(Some("6,\"20 04\""), 2, "P", "link path"),
            vec!["6".to_string(), "\"20 04\"".to_string()]
        );
        assert_eq!(fixed_fields(Some("1,2,3"), 2, "P", "link path"), vec![String::new(); 2]);
        assert_eq!(fixed_fields(None, 8, "P", "scaling").len(), 8);
    }
}
