// Tue Jan 13 2026 - Alex

pub mod alignment;
pub mod builder;
pub mod cache;
pub mod catalog;
pub mod comparison;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod graph;
pub mod layout;
pub mod offset;
pub mod packing;
pub mod resolved;
pub mod resolver;
pub mod serializer;
pub mod size;
pub mod type_info;
pub mod validator;
pub mod vtable;

pub use alignment::Alignment;
pub use builder::ClassDecl;
pub use cache::{LayoutCache, StructureCache};
pub use catalog::TypeCatalog;
pub use comparison::{DifferenceSeverity, LayoutComparator, LayoutComparison, LayoutDifference};
pub use descriptor::{ClassDescriptor, DescriptorIdentity, TypeDescriptorRecord};
pub use error::{LayoutError, Result};
pub use field::Field;
pub use graph::{ClassGraph, Hierarchies};
pub use layout::{FieldPlacement, PaddingRegion, ResolvedLayout, StructureLayout};
pub use offset::Offset;
pub use packing::PackingReport;
pub use resolved::ResolvedGraph;
pub use resolver::LayoutResolver;
pub use serializer::{SerializableField, SerializableLayout, SerializablePadding};
pub use size::Size;
pub use type_info::{CompositeMember, FieldType, PrimitiveType, TypeKind};
pub use validator::{Finding, FindingKind, LayoutValidator, StructureValidator};
pub use vtable::{SlotDecision, SlotPlacement, VtableSlot, VtableSlotAllocator, VPTR_NAME};
