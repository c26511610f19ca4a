// Tue Jan 13 2026 - Alex

use crate::structure::{PackingReport, ResolvedLayout, SlotDecision, VtableSlot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableLayout {
    pub name: String,
    pub base: Option<String>,
    pub size: u64,
    pub alignment: u64,
    pub data_size: u64,
    pub vtable: Option<VtableSlot>,
    pub vtable_decision: SlotDecision,
    pub fields: Vec<SerializableField>,
    pub padding: Vec<SerializablePadding>,
    pub suggested_packing: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_descriptors: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableField {
    pub name: String,
    pub type_name: String,
    pub declared_in: String,
    pub offset: u64,
    pub size: u64,
    pub alignment: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SerializablePadding {
    pub offset: u64,
    pub size: u64,
    pub before: Option<String>,
}

impl SerializableLayout {
    pub fn with_type_descriptors(mut self, descriptors: Vec<String>) -> Self {
        self.type_descriptors = descriptors;
        self
    }
}

impl From<&ResolvedLayout> for SerializableLayout {
    fn from(layout: &ResolvedLayout) -> Self {
        Self {
            name: layout.class().to_string(),
            base: layout.base().map(str::to_string),
            size: layout.size().as_u64(),
            alignment: layout.alignment().as_u64(),
            data_size: layout.data_size().as_u64(),
            vtable: layout.vtable().cloned(),
            vtable_decision: layout.vtable_decision(),
            fields: layout
                .fields()
                .iter()
                .map(|f| SerializableField {
                    name: f.name.clone(),
                    type_name: f.type_name.clone(),
                    declared_in: f.declared_in.clone(),
                    offset: f.offset.as_u64(),
                    size: f.size.as_u64(),
                    alignment: f.alignment.as_u64(),
                })
                .collect(),
            padding: layout
                .padding()
                .iter()
                .map(|p| SerializablePadding {
                    offset: p.offset.as_u64(),
                    size: p.size,
                    before: p.before.clone(),
                })
                .collect(),
            suggested_packing: PackingReport::from_layout(layout).suggested_packing,
            type_descriptors: Vec::new(),
        }
    }
}
