// Tue Jan 13 2026 - Alex

use crate::structure::{Alignment, Offset, Size, SlotDecision, VtableSlot};
use indexmap::IndexMap;
use std::fmt;

/// Where one field landed, including fields inherited from bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlacement {
    pub name: String,
    pub type_name: String,
    /// Class whose declaration introduced the field.
    pub declared_in: String,
    pub order: usize,
    pub offset: Offset,
    pub size: Size,
    pub alignment: Alignment,
    /// Padding inserted right before this field to satisfy its alignment.
    pub padding_before: u64,
}

impl FieldPlacement {
    pub fn end_offset(&self) -> u64 {
        self.offset.as_u64() + self.size.as_u64()
    }
}

impl fmt::Display for FieldPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {} (size {})", self.type_name, self.name, self.offset, self.size)
    }
}

/// A run of unused bytes. `before` names the member that follows it;
/// `None` marks tail padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingRegion {
    pub offset: Offset,
    pub size: u64,
    pub before: Option<String>,
}

impl PaddingRegion {
    pub fn is_tail(&self) -> bool {
        self.before.is_none()
    }
}

/// Resolved shape of one class.
///
/// `fields` lists the inherited prefix first, then the class's own fields
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureLayout {
    pub(crate) class: String,
    pub(crate) base: Option<String>,
    pub(crate) seed: Offset,
    pub(crate) data_size: Size,
    pub(crate) size: Size,
    pub(crate) alignment: Alignment,
    pub(crate) alignment_override: Option<Alignment>,
    pub(crate) fields: Vec<FieldPlacement>,
    /// Field name -> index into `fields`; a derived field shadows a base one.
    pub(crate) field_index: IndexMap<String, usize>,
    pub(crate) vtable: Option<VtableSlot>,
    pub(crate) vtable_decision: SlotDecision,
    pub(crate) padding: Vec<PaddingRegion>,
}

pub type ResolvedLayout = StructureLayout;

impl StructureLayout {
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Offset where this class's own fields start being placed.
    pub fn seed(&self) -> Offset {
        self.seed
    }

    /// End of the last byte of data, before the final rounding.
    pub fn data_size(&self) -> Size {
        self.data_size
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn alignment_override(&self) -> Option<Alignment> {
        self.alignment_override
    }

    pub fn fields(&self) -> &[FieldPlacement] {
        &self.fields
    }

    pub fn own_fields(&self) -> impl Iterator<Item = &FieldPlacement> {
        self.fields.iter().filter(move |f| f.declared_in == self.class)
    }

    pub fn inherited_fields(&self) -> impl Iterator<Item = &FieldPlacement> {
        self.fields.iter().filter(move |f| f.declared_in != self.class)
    }

    pub fn field(&self, name: &str) -> Option<&FieldPlacement> {
        self.field_index.get(name).map(|&idx| &self.fields[idx])
    }

    pub fn offset_of(&self, name: &str) -> Option<Offset> {
        self.field(name).map(|f| f.offset)
    }

    pub fn vtable(&self) -> Option<&VtableSlot> {
        self.vtable.as_ref()
    }

    pub fn vtable_offset(&self) -> Option<Offset> {
        self.vtable.as_ref().map(|slot| slot.offset)
    }

    pub fn vtable_decision(&self) -> SlotDecision {
        self.vtable_decision
    }

    pub fn padding(&self) -> &[PaddingRegion] {
        &self.padding
    }

    pub fn total_padding(&self) -> u64 {
        self.padding.iter().map(|p| p.size).sum()
    }

    pub fn tail_padding(&self) -> u64 {
        self.padding.iter().filter(|p| p.is_tail()).map(|p| p.size).sum()
    }
}

impl fmt::Display for StructureLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        if let Some(base) = &self.base {
            write!(f, " : {}", base)?;
        }
        writeln!(f, " (size 0x{:x}, align {})", self.size.as_u64(), self.alignment)?;
        if let Some(slot) = &self.vtable {
            writeln!(f, "  {}", slot)?;
        }
        for field in &self.fields {
            writeln!(f, "  {}", field)?;
        }
        Ok(())
    }
}
