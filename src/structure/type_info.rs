// Tue Jan 13 2026 - Alex

use crate::structure::{Alignment, Offset, Size};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    F32,
    F64,
    Bool,
    Ptr,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 12] = [
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::S8,
        Self::S16,
        Self::S32,
        Self::S64,
        Self::F32,
        Self::F64,
        Self::Bool,
        Self::Ptr,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::S8 => "s8",
            Self::S16 => "s16",
            Self::S32 => "s32",
            Self::S64 => "s64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Ptr => "ptr",
        }
    }

    /// Natural size; `Ptr` follows the target pointer width.
    pub fn size(self, pointer_size: u64) -> u64 {
        match self {
            Self::U8 | Self::S8 | Self::Bool => 1,
            Self::U16 | Self::S16 => 2,
            Self::U32 | Self::S32 | Self::F32 => 4,
            Self::U64 | Self::S64 | Self::F64 => 8,
            Self::Ptr => pointer_size,
        }
    }
}

/// A member of a composite record, placed when the record was registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeMember {
    pub name: String,
    pub type_name: String,
    pub offset: Offset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(PrimitiveType),
    Composite(Vec<CompositeMember>),
    /// Size and alignment given directly, contents unknown (handles, blobs).
    Opaque,
}

/// A registered field type. Immutable once it leaves the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    name: String,
    size: Size,
    alignment: Alignment,
    kind: TypeKind,
}

impl FieldType {
    pub fn new(name: &str, size: Size, alignment: Alignment, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            size,
            alignment,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn members(&self) -> &[CompositeMember] {
        match &self.kind {
            TypeKind::Composite(members) => members,
            _ => &[],
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (size {}, align {})", self.name, self.size, self.alignment)
    }
}
