// Tue Jan 15 2026 - Alex

use crate::structure::{ResolvedGraph, ResolvedLayout};
use std::fmt;

/// A difference between two resolutions of the same class, typically taken
/// from two versions of a binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutDifference {
    FieldAdded { field: String, offset: u64 },
    FieldRemoved { field: String, offset: u64 },
    FieldMoved { field: String, old_offset: u64, new_offset: u64 },
    FieldResized { field: String, old_size: u64, new_size: u64 },
    SizeChanged { old_size: u64, new_size: u64 },
    AlignmentChanged { old_alignment: u64, new_alignment: u64 },
    VtableChanged { old_offset: Option<u64>, new_offset: Option<u64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DifferenceSeverity {
    Minor,
    Moderate,
    Breaking,
}

impl LayoutDifference {
    pub fn severity(&self) -> DifferenceSeverity {
        match self {
            Self::FieldRemoved { .. }
            | Self::FieldMoved { .. }
            | Self::FieldResized { .. }
            | Self::SizeChanged { .. }
            | Self::VtableChanged { .. } => DifferenceSeverity::Breaking,
            Self::AlignmentChanged { .. } => DifferenceSeverity::Moderate,
            Self::FieldAdded { .. } => DifferenceSeverity::Minor,
        }
    }
}

impl fmt::Display for LayoutDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldAdded { field, offset } => write!(f, "+ {} @ 0x{:x}", field, offset),
            Self::FieldRemoved { field, offset } => write!(f, "- {} @ 0x{:x}", field, offset),
            Self::FieldMoved { field, old_offset, new_offset } => {
                write!(f, "~ {} 0x{:x} -> 0x{:x}", field, old_offset, new_offset)
            }
            Self::FieldResized { field, old_size, new_size } => {
                write!(f, "~ {} size {} -> {}", field, old_size, new_size)
            }
            Self::SizeChanged { old_size, new_size } => write!(f, "size 0x{:x} -> 0x{:x}", old_size, new_size),
            Self::AlignmentChanged { old_alignment, new_alignment } => {
                write!(f, "align {} -> {}", old_alignment, new_alignment)
            }
            Self::VtableChanged { old_offset, new_offset } => {
                write!(f, "vtable {:?} -> {:?}", old_offset, new_offset)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutComparison {
    pub class: String,
    pub differences: Vec<LayoutDifference>,
}

impl LayoutComparison {
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn max_severity(&self) -> Option<DifferenceSeverity> {
        self.differences.iter().map(|d| d.severity()).max()
    }
}

pub struct LayoutComparator;

impl LayoutComparator {
    pub fn compare(old: &ResolvedLayout, new: &ResolvedLayout) -> LayoutComparison {
        let mut differences = Vec::new();

        if old.size() != new.size() {
            differences.push(LayoutDifference::SizeChanged {
                old_size: old.size().as_u64(),
                new_size: new.size().as_u64(),
            });
        }
        if old.alignment() != new.alignment() {
            differences.push(LayoutDifference::AlignmentChanged {
                old_alignment: old.alignment().as_u64(),
                new_alignment: new.alignment().as_u64(),
            });
        }
        if old.vtable_offset() != new.vtable_offset() {
            differences.push(LayoutDifference::VtableChanged {
                old_offset: old.vtable_offset().map(|o| o.as_u64()),
                new_offset: new.vtable_offset().map(|o| o.as_u64()),
            });
        }

        for field in old.fields() {
            match new.field(&field.name) {
                None => differences.push(LayoutDifference::FieldRemoved {
                    field: field.name.clone(),
                    offset: field.offset.as_u64(),
                }),
                Some(other) => {
                    if other.offset != field.offset {
                        differences.push(LayoutDifference::FieldMoved {
                            field: field.name.clone(),
                            old_offset: field.offset.as_u64(),
                            new_offset: other.offset.as_u64(),
                        });
                    }
                    if other.size != field.size {
                        differences.push(LayoutDifference::FieldResized {
                            field: field.name.clone(),
                            old_size: field.size.as_u64(),
                            new_size: other.size.as_u64(),
                        });
                    }
                }
            }
        }
        for field in new.fields().iter().filter(|f| old.field(&f.name).is_none()) {
            differences.push(LayoutDifference::FieldAdded {
                field: field.name.clone(),
                offset: field.offset.as_u64(),
            });
        }

        LayoutComparison {
            class: new.class().to_string(),
            differences,
        }
    }

    /// Compares every class resolved in both graphs, in `new` order.
    pub fn compare_graphs(old: &ResolvedGraph, new: &ResolvedGraph) -> Vec<LayoutComparison> {
        new.layouts()
            .iter()
            .filter_map(|(name, layout)| old.layout(name).map(|prev| Self::compare(prev, layout)))
            .collect()
    }
}
