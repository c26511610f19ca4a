// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Type conflict for {name}: registered as {existing_size}/{existing_align}, got {size}/{alignment}")]
    TypeConflict {
        name: String,
        existing_size: u64,
        existing_align: u64,
        size: u64,
        alignment: u64,
    },
    #[error("Unknown type {type_name} for field {field} of {class}")]
    UnknownType {
        class: String,
        field: String,
        type_name: String,
    },
    #[error("Unknown base {base} for class {class}")]
    UnknownBase { class: String, base: String },
    #[error("Unknown class: {0}")]
    UnknownClass(String),
    #[error("Duplicate class: {0}")]
    DuplicateClass(String),
    #[error("Duplicate field {field} in class {class}")]
    DuplicateField { class: String, field: String },
    #[error("Cycle detected at class {class} (base {base} unresolved)")]
    CycleDetected { class: String, base: String },
    #[error("Alignment violation in {class}: {message}")]
    AlignmentViolation {
        class: String,
        field: Option<String>,
        message: String,
    },
    #[error("Overlapping fields in {class}: {first} and {second}")]
    OverlappingFields {
        class: String,
        first: String,
        second: String,
    },
    #[error("Non-monotonic offsets in {class} at field {field}")]
    NonMonotonicOffsets { class: String, field: String },
    #[error("Layout of {class} overflows the address space at {field}")]
    LayoutOverflow { class: String, field: String },
    #[error("Invalid alignment: {0}")]
    InvalidAlignment(u64),
    #[error("Invalid size for {name}: {size}")]
    InvalidSize { name: String, size: u64 },
    #[error("Field not found: {class}::{field}")]
    FieldNotFound { class: String, field: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Malformed facts: {0}")]
    Facts(String),
}

impl LayoutError {
    /// Class the error is about, when there is one.
    pub fn class(&self) -> Option<&str> {
        match self {
            Self::UnknownType { class, .. }
            | Self::UnknownBase { class, .. }
            | Self::DuplicateField { class, .. }
            | Self::CycleDetected { class, .. }
            | Self::AlignmentViolation { class, .. }
            | Self::OverlappingFields { class, .. }
            | Self::NonMonotonicOffsets { class, .. }
            | Self::LayoutOverflow { class, .. }
            | Self::FieldNotFound { class, .. } => Some(class),
            Self::UnknownClass(class) | Self::DuplicateClass(class) => Some(class),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
