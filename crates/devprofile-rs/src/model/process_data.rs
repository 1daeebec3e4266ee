// crates/devprofile-rs/src/model/process_data.rs

use super::datatype::DataTypeRef;
use super::record::RecordLayout;
use super::text::TextRef;
use core::fmt;

/// Direction of a process data image, seen from the device's controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A process data image: a scalar, or a record whose members live in `items`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessDataItem {
    pub id: String,
    pub name: Option<TextRef>,
    pub bit_length: u32,
    pub data_type: DataTypeRef,
    /// Application path (section-text assemblies).
    pub path: Option<String>,
    /// Assembly descriptor word (section-text assemblies).
    pub flags: u32,
    pub items: RecordLayout,
}

/// Selects a process data variant by the current value of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessDataCondition {
    pub variable_id: String,
    pub subindex: Option<u8>,
    /// Literal value as written in the source.
    pub value: String,
}

/// A conditional alternative to the primary process data images.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessDataVariant {
    pub id: String,
    pub condition: Option<ProcessDataCondition>,
    pub input: Option<ProcessDataItem>,
    pub output: Option<ProcessDataItem>,
}

impl ProcessDataVariant {
    pub fn items(&self) -> impl Iterator<Item = (Direction, &ProcessDataItem)> {
        direction_items(self.input.as_ref(), self.output.as_ref())
    }
}

/// The process data images of a device.
///
/// `input`/`output` are the primary images (the only ones section-text
/// grammars have). Markup documents may declare further variants, each
/// selected by a condition on a variable; those live in `alternatives` in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessData {
    /// Id of the enclosing collection entry, when the grammar has one.
    pub collection_id: Option<String>,
    /// Condition of the primary images.
    pub condition: Option<ProcessDataCondition>,
    pub input: Option<ProcessDataItem>,
    pub output: Option<ProcessDataItem>,
    pub alternatives: Vec<ProcessDataVariant>,
}

impl ProcessData {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.alternatives.is_empty()
    }

    pub fn get(&self, direction: Direction) -> Option<&ProcessDataItem> {
        match direction {
            Direction::Input => self.input.as_ref(),
            Direction::Output => self.output.as_ref(),
        }
    }

    /// Present primary images with their direction, input first.
    pub fn items(&self) -> impl Iterator<Item = (Direction, &ProcessDataItem)> {
        direction_items(self.input.as_ref(), self.output.as_ref())
    }

    /// Every image of every variant, labelled `input`, `output` for the
    /// primary ones and `<variant id>/input`, `<variant id>/output` for the
    /// alternatives.
    pub fn all_items(&self) -> impl Iterator<Item = (String, &ProcessDataItem)> {
        let primary = self.items().map(|(d, item)| (d.to_string(), item));
        let alternatives = self.alternatives.iter().flat_map(|variant| {
            variant
                .items()
                .map(move |(d, item)| (format!("{}/{}", variant.id, d), item))
        });
        primary.chain(alternatives)
    }

    /// Mutable access to every image, primary ones first.
    pub fn all_items_mut(&mut self) -> impl Iterator<Item = &mut ProcessDataItem> {
        let alternatives = self
            .alternatives
            .iter_mut()
            .flat_map(|v| [&mut v.input, &mut v.output]);
        [&mut self.input, &mut self.output]
            .into_iter()
            .chain(alternatives)
            .flatten()
    }
}

fn direction_items<'a>(
    input: Option<&'a ProcessDataItem>,
    output: Option<&'a ProcessDataItem>,
) -> impl Iterator<Item = (Direction, &'a ProcessDataItem)> {
    [(Direction::Input, input), (Direction::Output, output)]
        .into_iter()
        .filter_map(|(d, item)| item.map(|i| (d, i)))
}
