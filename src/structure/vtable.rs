// Tue Jan 15 2026 - Alex

use crate::structure::{Alignment, ClassDescriptor, LayoutError, Offset, ResolvedLayout, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used for the dispatch pointer wherever it shows up next to fields.
pub const VPTR_NAME: &str = "_vptr";

/// The single dispatch-pointer slot of a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtableSlot {
    pub offset: Offset,
    pub size: Size,
    /// Class that first introduced the slot.
    pub introduced_by: String,
}

impl VtableSlot {
    pub fn end_offset(&self) -> u64 {
        self.offset.as_u64() + self.size.as_u64()
    }
}

impl fmt::Display for VtableSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} (from {})", VPTR_NAME, self.offset, self.introduced_by)
    }
}

/// What a class does about the dispatch pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotDecision {
    /// No vtable anywhere in the ancestry.
    Absent,
    /// First class of the chain with virtual behaviour; owns the slot.
    Introduced,
    /// Base has the slot, class declares nothing virtual.
    Inherited,
    /// Class declares virtual behaviour but the base slot is reused.
    Reused,
}

#[derive(Debug, Clone)]
pub struct SlotPlacement {
    pub decision: SlotDecision,
    pub slot: Option<VtableSlot>,
    /// Where the class's own fields start.
    pub seed: u64,
    /// Bytes skipped between the base data and a newly introduced pointer.
    pub gap: u64,
}

pub struct VtableSlotAllocator {
    pointer_size: u64,
    pointer_align: Alignment,
}

impl VtableSlotAllocator {
    pub fn new(pointer_size: u64) -> Result<Self, LayoutError> {
        Ok(Self {
            pointer_size,
            pointer_align: Alignment::new(pointer_size)?,
        })
    }

    pub fn pointer_size(&self) -> u64 {
        self.pointer_size
    }

    pub fn pointer_alignment(&self) -> Alignment {
        self.pointer_align
    }

    /// Decides the slot for `class` given its resolved base, if any.
    ///
    /// A pointer introduced under a base that has data of its own goes after
    /// that data, so inherited offsets never move.
    pub fn allocate(
        &self,
        class: &ClassDescriptor,
        base: Option<&ResolvedLayout>,
    ) -> Result<SlotPlacement, LayoutError> {
        let base_end = base.map(|b| b.data_size().as_u64()).unwrap_or(0);

        if let Some(slot) = base.and_then(|b| b.vtable()) {
            let decision = if class.introduces_vtable() {
                SlotDecision::Reused
            } else {
                SlotDecision::Inherited
            };
            return Ok(SlotPlacement {
                decision,
                slot: Some(slot.clone()),
                seed: base_end,
                gap: 0,
            });
        }

        if !class.introduces_vtable() {
            return Ok(SlotPlacement {
                decision: SlotDecision::Absent,
                slot: None,
                seed: base_end,
                gap: 0,
            });
        }

        let overflow = || LayoutError::LayoutOverflow {
            class: class.name().to_string(),
            field: VPTR_NAME.to_string(),
        };
        let offset = self.pointer_align.align(base_end).ok_or_else(overflow)?;
        let seed = offset.checked_add(self.pointer_size).ok_or_else(overflow)?;
        log::debug!("{}: introduces {} at 0x{:x}", class.name(), VPTR_NAME, offset);
        Ok(SlotPlacement {
            decision: SlotDecision::Introduced,
            slot: Some(VtableSlot {
                offset: Offset::new(offset),
                size: Size::new(self.pointer_size),
                introduced_by: class.name().to_string(),
            }),
            seed,
            gap: offset - base_end,
        })
    }
}
