// crates/devprofile-rs/src/model/record.rs

//! Record item trees stored as an arena.
//!
//! Nodes are kept in pre-order in a flat `Vec`; each node names its parent by
//! index, and a parent always precedes its children. Cycles therefore cannot
//! be represented, and every walk over the tree is a linear scan or an
//! explicit stack.

use super::datatype::DataTypeRef;
use super::parameter::{AccessRights, Constraint, EnumerationValue};
use super::text::TextRef;
use crate::error::ParseError;

/// One member of a record (or of a nested record).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordNode {
    /// Index of the enclosing node, `None` for top-level members.
    pub parent: Option<usize>,
    /// Offset in bits from the start of the enclosing record.
    pub bit_offset: u32,
    pub bit_length: u32,
    pub data_type: DataTypeRef,
    pub subindex: Option<u8>,
    /// `None` marks padding.
    pub name: Option<TextRef>,
    pub description: Option<TextRef>,
    pub access_restriction: Option<AccessRights>,
    /// Id of the parameter this node mirrors (section-text assemblies).
    pub reference: Option<String>,
    pub enumeration: Vec<EnumerationValue>,
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordLayout {
    nodes: Vec<RecordNode>,
}

impl RecordLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `node` and returns its index.
    ///
    /// Fails if the node names a parent that has not been pushed yet.
    pub fn push(&mut self, node: RecordNode) -> Result<usize, ParseError> {
        let index = self.nodes.len();
        if let Some(parent) = node.parent {
            if parent >= index {
                return Err(ParseError::structure(
                    format!("RecordItem[{}]", index),
                    format!("parent {} does not precede the node", parent),
                ));
            }
        }
        self.nodes.push(node);
        Ok(index)
    }

    pub fn nodes(&self) -> &[RecordNode] {
        &self.nodes
    }

    /// Mutable access to the nodes, for fix-ups after construction.
    /// Layout invariants are re-checked by `check_layout`.
    pub fn nodes_mut(&mut self) -> &mut [RecordNode] {
        &mut self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&RecordNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of the top-level members, in order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
    }

    /// Indices of the direct children of `index`, in order.
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .skip(index + 1)
            .filter(move |(_, n)| n.parent == Some(index))
            .map(|(i, _)| i)
    }

    /// Number of levels below the top level at `index` (0 for a root).
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(index).and_then(|n| n.parent);
        while let Some(p) = current {
            depth += 1;
            current = self.nodes.get(p).and_then(|n| n.parent);
        }
        depth
    }

    /// Checks the layout invariants:
    /// - every parent index precedes its child,
    /// - sibling bit ranges do not overlap,
    /// - every node fits inside its parent (or inside `container_bits` for
    ///   top-level nodes, when given).
    pub fn check_layout(&self, path: &str, container_bits: Option<u32>) -> Result<(), ParseError> {
        // Bucket children per parent in one pass; slot 0 holds the roots.
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len() + 1];
        for (i, node) in self.nodes.iter().enumerate() {
            match node.parent {
                None => groups[0].push(i),
                Some(p) if p < i => groups[p + 1].push(i),
                Some(p) => {
                    return Err(ParseError::structure(
                        format!("{}/RecordItem[{}]", path, i),
                        format!("parent {} does not precede the node", p),
                    ));
                }
            }
        }

        for (slot, members) in groups.iter().enumerate() {
            if members.is_empty() {
                continue;
            }
            let limit = if slot == 0 {
                container_bits
            } else {
                Some(self.nodes[slot - 1].bit_length)
            };

            let mut ranges: Vec<(u64, u64, usize)> = members
                .iter()
                .map(|&i| {
                    let n = &self.nodes[i];
                    let start = u64::from(n.bit_offset);
                    (start, start + u64::from(n.bit_length), i)
                })
                .collect();
            ranges.sort_unstable();

            for pair in ranges.windows(2) {
                let (_, prev_end, prev) = pair[0];
                let (start, _, next) = pair[1];
                if start < prev_end {
                    return Err(ParseError::structure(
                        format!("{}/{}", path, self.describe(next)),
                        format!("bit range overlaps sibling {}", self.describe(prev)),
                    ));
                }
            }
            if let (Some(limit), Some(&(_, end, last))) = (limit, ranges.last()) {
                if end > u64::from(limit) {
                    return Err(ParseError::out_of_range(
                        format!("{}/{}/@bitOffset", path, self.describe(last)),
                        end.to_string(),
                        format!("record end <= {} bits", limit),
                    ));
                }
            }
        }
        Ok(())
    }

    fn describe(&self, index: usize) -> String {
        match self.nodes.get(index).and_then(|n| n.subindex) {
            Some(sub) => format!("RecordItem[subindex={}]", sub),
            None => format!("RecordItem[{}]", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::datatype::PrimitiveType;

    fn leaf(parent: Option<usize>, offset: u32, bits: u8, sub: u8) -> RecordNode {
        RecordNode {
            parent,
            bit_offset: offset,
            bit_length: u32::from(bits),
            data_type: DataTypeRef::Primitive(PrimitiveType::UInteger { bits }),
            subindex: Some(sub),
            name: Some(TextRef::new(format!("TI_{}", sub))),
            ..Default::default()
        }
    }

    #[test]
    fn test_push_rejects_forward_parent() {
        let mut layout = RecordLayout::new();
        let err = layout.push(leaf(Some(0), 0, 8, 1)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
        assert!(layout.is_empty());
    }

    #[test]
    fn test_roots_children_and_depth() {
        let mut layout = RecordLayout::new();
        let outer = layout
            .push(RecordNode {
                bit_length: 16,
                data_type: DataTypeRef::Record {
                    bit_length: 16,
                    subindex_access: false,
                },
                subindex: Some(1),
                ..Default::default()
            })
            .unwrap();
        layout.push(leaf(Some(outer), 0, 8, 1)).unwrap();
        layout.push(leaf(Some(outer), 8, 8, 2)).unwrap();
        layout.push(leaf(None, 16, 8, 2)).unwrap();

        assert_eq!(layout.roots().collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(layout.children(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(layout.depth(2), 1);
        assert!(layout.check_layout("Variable[V_R]", Some(24)).is_ok());
    }

    #[test]
    fn test_overlapping_siblings_rejected() {
        let mut layout = RecordLayout::new();
        layout.push(leaf(None, 0, 16, 1)).unwrap();
        layout.push(leaf(None, 8, 8, 2)).unwrap();
        let err = layout.check_layout("Variable[V_R]", None).unwrap_err();
        match err {
            ParseError::InvalidStructure { path, .. } => {
                assert_eq!(path, "Variable[V_R]/RecordItem[subindex=2]")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_child_outside_parent_rejected() {
        let mut layout = RecordLayout::new();
        let outer = layout
            .push(RecordNode {
                bit_length: 8,
                ..Default::default()
            })
            .unwrap();
        layout.push(leaf(Some(outer), 4, 8, 1)).unwrap();
        let err = layout.check_layout("R", None).unwrap_err();
        assert!(matches!(err, ParseError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_record_larger_than_container_rejected() {
        let mut layout = RecordLayout::new();
        layout.push(leaf(None, 8, 8, 1)).unwrap();
        assert!(layout.check_layout("R", Some(16)).is_ok());
        assert!(layout.check_layout("R", Some(15)).is_err());
    }
}
