// Tue Jan 13 2026 - Alex

use crate::structure::{Alignment, FieldType, Size};
use std::fmt;
use std::sync::Arc;

/// A declared field: name, a shared reference to its catalog type, and the
/// declaration slot that drives implicit offset assignment.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    field_type: Arc<FieldType>,
    order: usize,
}

impl Field {
    pub fn new(name: &str, field_type: Arc<FieldType>, order: usize) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn size(&self) -> Size {
        self.field_type.size()
    }

    pub fn alignment(&self) -> Alignment {
        self.field_type.alignment()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} {}", self.order, self.field_type.name(), self.name)
    }
}
