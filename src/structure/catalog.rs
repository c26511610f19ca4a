// Tue Jan 14 2026 - Alex

use crate::structure::type_info::{CompositeMember, PrimitiveType, TypeKind};
use crate::structure::{Alignment, FieldType, LayoutError, Offset, Size};
use indexmap::IndexMap;
use std::sync::Arc;

/// Registry of field types.
///
/// Built by a single writer, then wrapped in an `Arc` and shared with every
/// graph that references it. Lookups after that point only read the map.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    pointer_size: u64,
    types: IndexMap<String, Arc<FieldType>>,
}

impl TypeCatalog {
    pub fn new(pointer_size: u64) -> Self {
        Self {
            pointer_size,
            types: IndexMap::new(),
        }
    }

    /// Catalog pre-seeded with every `PrimitiveType` at its natural size.
    pub fn with_primitives(pointer_size: u64) -> Result<Self, LayoutError> {
        let mut catalog = Self::new(pointer_size);
        for primitive in PrimitiveType::ALL {
            let size = primitive.size(pointer_size);
            catalog.insert_checked(
                primitive.name(),
                size,
                size,
                TypeKind::Primitive(primitive),
            )?;
        }
        Ok(catalog)
    }

    pub fn pointer_size(&self) -> u64 {
        self.pointer_size
    }

    /// Registers an opaque type. Re-registering the same name with the same
    /// shape returns the existing entry; a different shape is a conflict.
    pub fn register(&mut self, name: &str, size: u64, alignment: u64) -> Result<Arc<FieldType>, LayoutError> {
        self.insert_checked(name, size, alignment, TypeKind::Opaque)
    }

    /// Registers a record built from already-registered member types.
    ///
    /// Members are placed in order with the usual offset-then-advance rule;
    /// the record's alignment is the largest member alignment, raised to
    /// `alignment_override` when given.
    pub fn register_composite(
        &mut self,
        name: &str,
        members: &[(&str, &str)],
        alignment_override: Option<u64>,
    ) -> Result<Arc<FieldType>, LayoutError> {
        let mut alignment = match alignment_override {
            Some(value) => Alignment::new(value)?,
            None => Alignment::ONE,
        };
        let mut offset = 0u64;
        let mut placed = Vec::with_capacity(members.len());

        for (member_name, type_name) in members {
            let ty = self.lookup(type_name).ok_or_else(|| LayoutError::UnknownType {
                class: name.to_string(),
                field: member_name.to_string(),
                type_name: type_name.to_string(),
            })?;
            let overflow = || LayoutError::LayoutOverflow {
                class: name.to_string(),
                field: member_name.to_string(),
            };
            let aligned = ty.alignment().align(offset).ok_or_else(overflow)?;
            placed.push(CompositeMember {
                name: member_name.to_string(),
                type_name: type_name.to_string(),
                offset: Offset::new(aligned),
            });
            offset = aligned.checked_add(ty.size().as_u64()).ok_or_else(overflow)?;
            alignment = alignment.max(ty.alignment());
        }

        let size = alignment.align(offset).ok_or_else(|| LayoutError::LayoutOverflow {
            class: name.to_string(),
            field: "size".to_string(),
        })?;
        self.insert_checked(name, size, alignment.as_u64(), TypeKind::Composite(placed))
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<FieldType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn insert_checked(
        &mut self,
        name: &str,
        size: u64,
        alignment: u64,
        kind: TypeKind,
    ) -> Result<Arc<FieldType>, LayoutError> {
        if size == 0 {
            return Err(LayoutError::InvalidSize {
                name: name.to_string(),
                size,
            });
        }
        let alignment = Alignment::new(alignment)?;

        if let Some(existing) = self.types.get(name) {
            if existing.size().as_u64() != size || existing.alignment() != alignment {
                return Err(LayoutError::TypeConflict {
                    name: name.to_string(),
                    existing_size: existing.size().as_u64(),
                    existing_align: existing.alignment().as_u64(),
                    size,
                    alignment: alignment.as_u64(),
                });
            }
            return Ok(Arc::clone(existing));
        }

        log::trace!("registered type {} size={} align={}", name, size, alignment);
        let ty = Arc::new(FieldType::new(name, Size::new(size), alignment, kind));
        self.types.insert(name.to_string(), Arc::clone(&ty));
        Ok(ty)
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new(8)
    }
}
