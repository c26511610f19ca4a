// Tue Jan 14 2026 - Alex

use crate::structure::{Alignment, Field};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One class node. Immutable once added to a `ClassGraph`.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    name: String,
    base: Option<String>,
    fields: Vec<Field>,
    alignment_override: Option<Alignment>,
    introduces_vtable: bool,
}

impl ClassDescriptor {
    pub(crate) fn new(
        name: String,
        base: Option<String>,
        fields: Vec<Field>,
        alignment_override: Option<Alignment>,
        introduces_vtable: bool,
    ) -> Self {
        Self {
            name,
            base,
            fields,
            alignment_override,
            introduces_vtable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn alignment_override(&self) -> Option<Alignment> {
        self.alignment_override
    }

    pub fn introduces_vtable(&self) -> bool {
        self.introduces_vtable
    }

    pub fn is_root(&self) -> bool {
        self.base.is_none()
    }
}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(base) = &self.base {
            write!(f, " : {}", base)?;
        }
        if let Some(align) = self.alignment_override {
            write!(f, " [aligned({})]", align)?;
        }
        if self.introduces_vtable {
            write!(f, " [virtual]")?;
        }
        write!(f, " ({} fields)", self.fields.len())
    }
}

/// How attached type-descriptor records are identified across levels of a
/// hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorIdentity {
    /// `Owner::Name`: each level's record is distinct.
    #[default]
    PerLevel,
    /// `Name`: records with the same nested name compare equal at any level.
    SharedByName,
}

/// Runtime type-identity marker attached to exactly one class. It is not
/// inherited and takes no space in the instance layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptorRecord {
    pub owner: String,
    pub name: String,
    pub parent: Option<String>,
}

impl TypeDescriptorRecord {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.owner, self.name)
    }

    pub fn identity(&self, policy: DescriptorIdentity) -> String {
        match policy {
            DescriptorIdentity::PerLevel => self.qualified_name(),
            DescriptorIdentity::SharedByName => self.name.clone(),
        }
    }
}

impl fmt::Display for TypeDescriptorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())?;
        if let Some(parent) = &self.parent {
            write!(f, " : {}", parent)?;
        }
        Ok(())
    }
}
