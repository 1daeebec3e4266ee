// crates/devprofile-rs-eds/src/resolver/groups.rs

use super::utils::{TextSink, extension, key_number, required};
use crate::lexer::Section;
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{DeviceProfile, Menu, MenuItem};
use devprofile_rs::numeric::parse_u16;
use log::trace;

/// `[Groups]`: each `GroupN = name, count, ParamRefs...` becomes a menu of
/// parameter references. Whether the references resolve is checked by
/// profile validation.
pub(super) fn resolve_groups(
    section: &Section,
    texts: &mut TextSink,
    profile: &mut DeviceProfile,
) -> Result<(), ParseError> {
    for entry in &section.entries {
        let Some(digits) = key_number(&entry.key, "Group") else {
            profile.extensions.push(extension("Groups", entry));
            continue;
        };
        let path = format!("Groups/{}", entry.key);
        let number = parse_u16(digits, &path)?;
        if entry.fields.len() < 2 {
            return Err(ParseError::structure(&path, "expected a name and a member count"));
        }

        let count_path = format!("{}/Count", path);
        let count = parse_u16(required(&entry.fields[1], &count_path)?, &count_path)?;
        let members = &entry.fields[2..];
        if usize::from(count) != members.len() {
            return Err(ParseError::structure(
                &path,
                format!("declares {} members but lists {}", count, members.len()),
            ));
        }

        let items = members
            .iter()
            .map(|field| {
                let param = parse_u16(required(field, &path)?, &path)?;
                Ok(MenuItem::variable(format!("Param{}", param)))
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        profile.user_interface.menus.push(Menu {
            id: format!("Group{}", number),
            name: Some(texts.add(
                format!("Groups.Group{}.Name", number),
                entry.fields[0].text(),
            )),
            items,
        });
    }
    trace!("Resolved [Groups]: {} menus", profile.user_interface.menus.len());
    Ok(())
}
