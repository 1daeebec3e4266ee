// crates/devprofile-rs-eds/src/resolver/mod.rs

//! Maps a tokenized document onto the canonical model.
//!
//! `[File]`, `[Device]`, `[Params]`, `[Groups]` and `[Assembly]` are
//! modeled; every other section is preserved as an `OpaqueSection` in source
//! order. Keys of modeled sections that the model has no field for are kept
//! as extensions.

mod assembly;
mod device;
mod groups;
mod params;
pub(crate) mod utils;

pub(crate) use assembly::HEADER_FIELDS;
pub(crate) use params::{PARAM_FIELDS, READ_ONLY};

use crate::lexer::{Document, Section};
use devprofile_rs::error::ParseError;
use devprofile_rs::grammar::Grammar;
use devprofile_rs::model::{DeviceProfile, OpaqueSection};
use utils::{TextSink, check_unique_keys};

/// The sections with a canonical mapping, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionKind {
    File,
    Device,
    Params,
    Groups,
    Assembly,
}

impl SectionKind {
    pub(crate) const ALL: [SectionKind; 5] = [
        SectionKind::File,
        SectionKind::Device,
        SectionKind::Params,
        SectionKind::Groups,
        SectionKind::Assembly,
    ];

    pub(crate) fn name(&self) -> &'static str {
        match self {
            SectionKind::File => "File",
            SectionKind::Device => "Device",
            SectionKind::Params => "Params",
            SectionKind::Groups => "Groups",
            SectionKind::Assembly => "Assembly",
        }
    }

    fn of(name: &str) -> Option<SectionKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Position of the section in the output order.
    fn rank(name: &str) -> usize {
        Self::ALL
            .iter()
            .position(|kind| kind.name() == name)
            .unwrap_or(Self::ALL.len())
    }
}

pub(crate) fn resolve_profile(
    document: Document,
    language: &str,
) -> Result<DeviceProfile, ParseError> {
    let mut profile = DeviceProfile::new(Grammar::SectionText);
    let mut texts = TextSink::new(language);
    let mut seen: Vec<SectionKind> = Vec::new();
    // The assembly section and the number of opaque sections preceding it.
    let mut assembly: Option<(Section, usize)> = None;

    for section in document.sections {
        let Some(kind) = SectionKind::of(&section.name) else {
            profile.opaque_sections.push(OpaqueSection {
                name: section.name,
                body: section.body,
            });
            continue;
        };
        if seen.contains(&kind) {
            return Err(ParseError::structure(
                &section.name,
                format!("duplicate section at line {}", section.line),
            ));
        }
        seen.push(kind);
        check_unique_keys(&section)?;

        match kind {
            SectionKind::File => device::resolve_file(&section, &mut profile)?,
            SectionKind::Device => device::resolve_device(&section, &mut texts, &mut profile)?,
            SectionKind::Params => params::resolve_params(&section, &mut texts, &mut profile)?,
            SectionKind::Groups => groups::resolve_groups(&section, &mut texts, &mut profile)?,
            // Members refer to parameters, which may be declared later.
            SectionKind::Assembly => {
                let position = profile.opaque_sections.len();
                assembly = Some((section, position));
            }
        }
    }

    if !seen.contains(&SectionKind::Device) {
        return Err(ParseError::structure("Device", "missing mandatory section [Device]"));
    }

    if let Some((section, position)) = assembly {
        match assembly::resolve_assembly(&section, &mut texts, &profile.parameters)? {
            Some(process_data) => profile.process_data = process_data,
            None => profile.opaque_sections.insert(
                position,
                OpaqueSection {
                    name: section.name,
                    body: section.body,
                },
            ),
        }
    }

    // Extensions follow the output section order.
    profile
        .extensions
        .sort_by_key(|e| SectionKind::rank(&e.scope));
    profile.texts = texts.finish();
    Ok(profile)
}
