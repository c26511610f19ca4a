// Tue Jan 15 2026 - Alex

use crate::config::LayoutConfig;
use crate::structure::{
    Alignment, ClassDescriptor, ClassGraph, FieldPlacement, LayoutError, Offset, PaddingRegion,
    ResolvedGraph, ResolvedLayout, Size, VtableSlotAllocator, VPTR_NAME,
};
use indexmap::IndexMap;
use rayon::prelude::*;

/// Computes field offsets, size, alignment and dispatch-pointer placement
/// for every class of a graph.
///
/// Per class, in declaration order: seed at the end of the base's data
/// (before its tail rounding), let the allocator place the dispatch
/// pointer, round each field up to its alignment and advance by its size,
/// then round the end up to the class alignment.
pub struct LayoutResolver {
    config: LayoutConfig,
    allocator: VtableSlotAllocator,
}

type HierarchyResult = Result<IndexMap<String, ResolvedLayout>, LayoutError>;

impl LayoutResolver {
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate().map_err(LayoutError::Config)?;
        let allocator = VtableSlotAllocator::new(config.pointer_size)?;
        Ok(Self { config, allocator })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Resolves every hierarchy of `graph`. A hierarchy that hits a
    /// structural impossibility is dropped as a whole and reported in
    /// `ResolvedGraph::failures`; the others are unaffected.
    pub fn resolve(&self, graph: &ClassGraph) -> ResolvedGraph {
        if graph.catalog().pointer_size() != self.config.pointer_size {
            log::warn!(
                "catalog pointer size {} differs from configured {}",
                graph.catalog().pointer_size(),
                self.config.pointer_size
            );
        }

        let hierarchies = graph.hierarchies();
        let groups: Vec<(&String, &Vec<String>)> = hierarchies.groups.iter().collect();

        let results: Vec<(String, HierarchyResult)> = if self.config.parallel_hierarchies {
            groups
                .par_iter()
                .map(|(root, members)| (root.to_string(), self.resolve_hierarchy(graph, members)))
                .collect()
        } else {
            groups
                .iter()
                .map(|(root, members)| (root.to_string(), self.resolve_hierarchy(graph, members)))
                .collect()
        };

        let mut merged = IndexMap::new();
        let mut failures = IndexMap::new();
        let mut failed_classes = IndexMap::new();

        for (root, result) in results {
            match result {
                Ok(layouts) => merged.extend(layouts),
                Err(e) => {
                    log::warn!("hierarchy {} not resolved: {}", root, e);
                    for member in &hierarchies.groups[&root] {
                        failed_classes.insert(member.clone(), e.clone());
                    }
                    failures.insert(root, e);
                }
            }
        }
        for (class, e) in hierarchies.broken {
            log::warn!("class {} not resolved: {}", class, e);
            failed_classes.insert(class.clone(), e.clone());
            failures.insert(class, e);
        }

        // Report in graph insertion order whatever the scheduling was.
        let layouts: IndexMap<String, ResolvedLayout> = graph
            .classes()
            .filter_map(|c| merged.swap_remove_entry(c.name()))
            .collect();

        log::info!(
            "resolved {} of {} classes ({} failed hierarchies)",
            layouts.len(),
            graph.len(),
            failures.len()
        );

        ResolvedGraph::new(layouts, failures, failed_classes, graph.generation())
    }

    /// Resolves one root hierarchy sequentially. Members must be base-first.
    pub fn resolve_hierarchy(&self, graph: &ClassGraph, members: &[String]) -> HierarchyResult {
        let mut resolved: IndexMap<String, ResolvedLayout> = IndexMap::with_capacity(members.len());

        for name in members {
            let class = graph
                .get(name)
                .ok_or_else(|| LayoutError::UnknownClass(name.clone()))?;
            let base = match class.base() {
                Some(base) => Some(resolved.get(base).ok_or_else(|| LayoutError::CycleDetected {
                    class: name.clone(),
                    base: base.to_string(),
                })?),
                None => None,
            };
            let layout = self.resolve_class(class, base)?;
            resolved.insert(name.clone(), layout);
        }

        Ok(resolved)
    }

    /// Lays out one class on top of its already-resolved base.
    pub fn resolve_class(
        &self,
        class: &ClassDescriptor,
        base: Option<&ResolvedLayout>,
    ) -> Result<ResolvedLayout, LayoutError> {
        let placement = self.allocator.allocate(class, base)?;
        let overflow = |at: &str| LayoutError::LayoutOverflow {
            class: class.name().to_string(),
            field: at.to_string(),
        };

        let mut fields = base.map(|b| b.fields.clone()).unwrap_or_default();
        let mut field_index = base.map(|b| b.field_index.clone()).unwrap_or_default();
        // The base's tail padding is reused by this class.
        let mut padding: Vec<PaddingRegion> = base
            .map(|b| b.padding.iter().filter(|p| !p.is_tail()).cloned().collect())
            .unwrap_or_default();

        let mut alignment = class.alignment_override().unwrap_or(Alignment::ONE);
        if let Some(base) = base {
            alignment = alignment.max(base.alignment);
        }
        if let Some(slot) = &placement.slot {
            alignment = alignment.max(self.allocator.pointer_alignment());
            if placement.gap > 0 {
                padding.push(PaddingRegion {
                    offset: Offset::new(slot.offset.as_u64() - placement.gap),
                    size: placement.gap,
                    before: Some(VPTR_NAME.to_string()),
                });
            }
        }

        log::debug!(
            "{}: seed 0x{:x}, vtable {:?}",
            class.name(),
            placement.seed,
            placement.decision
        );

        let mut offset = placement.seed;
        for field in class.fields() {
            let aligned = field
                .alignment()
                .align(offset)
                .ok_or_else(|| overflow(field.name()))?;
            let padding_before = aligned - offset;
            if padding_before > 0 {
                padding.push(PaddingRegion {
                    offset: Offset::new(offset),
                    size: padding_before,
                    before: Some(field.name().to_string()),
                });
            }

            log::debug!(
                "{}::{} @ 0x{:x} (+{} padding)",
                class.name(),
                field.name(),
                aligned,
                padding_before
            );
            field_index.insert(field.name().to_string(), fields.len());
            fields.push(FieldPlacement {
                name: field.name().to_string(),
                type_name: field.field_type().name().to_string(),
                declared_in: class.name().to_string(),
                order: field.order(),
                offset: Offset::new(aligned),
                size: field.size(),
                alignment: field.alignment(),
                padding_before,
            });

            offset = aligned
                .checked_add(field.size().as_u64())
                .ok_or_else(|| overflow(field.name()))?;
            alignment = alignment.max(field.alignment());
        }

        let size = alignment.align(offset).ok_or_else(|| overflow("size"))?;
        if size > offset {
            padding.push(PaddingRegion {
                offset: Offset::new(offset),
                size: size - offset,
                before: None,
            });
        }
        log::debug!("{}: size 0x{:x}, align {}", class.name(), size, alignment);

        Ok(ResolvedLayout {
            class: class.name().to_string(),
            base: class.base().map(str::to_string),
            seed: Offset::new(placement.seed),
            data_size: Size::new(offset),
            size: Size::new(size),
            alignment,
            alignment_override: class.alignment_override(),
            fields,
            field_index,
            vtable: placement.slot,
            vtable_decision: placement.decision,
            padding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{ClassDecl, TypeCatalog};
    use std::sync::Arc;

    fn catalog() -> Arc<TypeCatalog> {
        let mut catalog = TypeCatalog::with_primitives(8).unwrap();
        catalog.register("MtString", 8, 8).unwrap();
        catalog
            .register_composite("MtFloat3", &[("x", "f32"), ("y", "f32"), ("z", "f32")], None)
            .unwrap();
        Arc::new(catalog)
    }

    fn resolver() -> LayoutResolver {
        LayoutResolver::new(LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_vtable_only_root() {
        let mut graph = ClassGraph::new(catalog());
        graph.add_class(ClassDecl::new("MtObject").with_vtable()).unwrap();
        let resolved = resolver().resolve(&graph);

        assert_eq!(resolved.size_of("MtObject").unwrap(), Size::new(8));
        assert_eq!(resolved.alignment_of("MtObject").unwrap().as_u64(), 8);
        assert_eq!(resolved.vtable_offset_of("MtObject").unwrap(), Some(Offset::zero()));
    }

    #[test]
    fn test_empty_root_without_vtable() {
        let mut graph = ClassGraph::new(catalog());
        graph.add_class(ClassDecl::new("Empty")).unwrap();
        let resolved = resolver().resolve(&graph);
        assert_eq!(resolved.size_of("Empty").unwrap(), Size::zero());
        assert_eq!(resolved.alignment_of("Empty").unwrap(), Alignment::ONE);
    }

    #[test]
    fn test_field_padding_and_tail() {
        let mut graph = ClassGraph::new(catalog());
        graph
            .add_class(ClassDecl::new("Mixed").field("flag", "bool").field("count", "u32").field("big", "u64").field("tail", "u16"))
            .unwrap();
        let resolved = resolver().resolve(&graph);
        let layout = resolved.layout("Mixed").unwrap();

        assert_eq!(layout.offset_of("flag"), Some(Offset::new(0)));
        assert_eq!(layout.offset_of("count"), Some(Offset::new(4)));
        assert_eq!(layout.offset_of("big"), Some(Offset::new(8)));
        assert_eq!(layout.offset_of("tail"), Some(Offset::new(16)));
        assert_eq!(layout.data_size(), Size::new(18));
        assert_eq!(layout.size(), Size::new(24));
        assert_eq!(layout.field("count").unwrap().padding_before, 3);
        assert_eq!(layout.total_padding(), 3 + 6);
        assert_eq!(layout.tail_padding(), 6);
    }

    #[test]
    fn test_override_raises_alignment() {
        let mut graph = ClassGraph::new(catalog());
        graph.add_class(ClassDecl::new("Small").field("a", "u32").aligned(16)).unwrap();
        let resolved = resolver().resolve(&graph);
        assert_eq!(resolved.alignment_of("Small").unwrap().as_u64(), 16);
        assert_eq!(resolved.size_of("Small").unwrap(), Size::new(16));
    }

    #[test]
    fn test_inherited_prefix_preserved() {
        let mut graph = ClassGraph::new(catalog());
        graph
            .add_class(ClassDecl::new("Base").with_vtable().field("name", "MtString").field("id", "s32"))
            .unwrap();
        graph
            .add_class(ClassDecl::new("Derived").with_base("Base").field("flag", "bool").field("pos", "MtFloat3"))
            .unwrap();
        let resolved = resolver().resolve(&graph);
        let base = resolved.layout("Base").unwrap();
        let derived = resolved.layout("Derived").unwrap();

        for field in base.fields() {
            assert_eq!(derived.offset_of(&field.name), Some(field.offset));
        }
        // Placed in the base's tail padding, right after `id`.
        assert_eq!(derived.seed(), Offset::new(20));
        assert_eq!(derived.offset_of("flag"), Some(Offset::new(20)));
        assert_eq!(derived.offset_of("pos"), Some(Offset::new(24)));
        assert_eq!(derived.size(), Size::new(40));
        assert!(derived.size() >= base.size());
        assert_eq!(derived.own_fields().count(), 2);
        assert_eq!(derived.inherited_fields().count(), 2);
    }

    #[test]
    fn test_shadowed_field_resolves_to_derived() {
        let mut graph = ClassGraph::new(catalog());
        graph.add_class(ClassDecl::new("Base").field("value", "u8")).unwrap();
        graph.add_class(ClassDecl::new("Derived").with_base("Base").field("value", "u32")).unwrap();
        let resolved = resolver().resolve(&graph);
        let derived = resolved.layout("Derived").unwrap();
        assert_eq!(derived.offset_of("value"), Some(Offset::new(4)));
        assert_eq!(derived.fields().len(), 2);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut graph = ClassGraph::new(catalog());
        graph.add_class(ClassDecl::new("A").with_vtable().field("x", "u16")).unwrap();
        graph.add_class(ClassDecl::new("B").with_base("A").field("y", "f64")).unwrap();
        graph.add_class(ClassDecl::new("Other").field("z", "bool")).unwrap();

        let resolver = resolver();
        let first = resolver.resolve(&graph);
        let second = resolver.resolve(&graph);
        assert_eq!(first.layouts(), second.layouts());

        let sequential = LayoutResolver::new(LayoutConfig::default().with_parallel(false))
            .unwrap()
            .resolve(&graph);
        assert_eq!(first.layouts(), sequential.layouts());
        let names: Vec<&str> = first.layouts().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["A", "B", "Other"]);
    }

    #[test]
    fn test_cycle_aborts_only_affected_hierarchy() {
        let mut graph = ClassGraph::new(catalog());
        graph.add_class(ClassDecl::new("Healthy").field("x", "u32")).unwrap();
        graph.add_class(ClassDecl::new("Root")).unwrap();
        // Derived inserted ahead of its base: base is unresolved when visited.
        graph.insert_unchecked(ClassDescriptor::new(
            "Early".into(),
            Some("Late".into()),
            vec![],
            None,
            false,
        ));
        graph.insert_unchecked(ClassDescriptor::new(
            "Late".into(),
            Some("Root".into()),
            vec![],
            None,
            false,
        ));

        let resolved = resolver().resolve(&graph);
        assert!(resolved.layout("Healthy").is_some());
        assert!(resolved.layout("Root").is_none());
        assert!(matches!(
            resolved.failures().get("Root"),
            Some(LayoutError::CycleDetected { class, .. }) if class == "Early"
        ));
        assert!(matches!(resolved.size_of("Late"), Err(LayoutError::CycleDetected { .. })));
        assert!(!resolved.is_complete());
    }

    #[test]
    fn test_overflow_drops_only_its_hierarchy() {
        let mut catalog = TypeCatalog::with_primitives(8).unwrap();
        catalog.register("Huge", 1 << 63, 8).unwrap();
        let mut graph = ClassGraph::new(Arc::new(catalog));
        graph.add_class(ClassDecl::new("Healthy").field("x", "u32")).unwrap();
        graph.add_class(ClassDecl::new("Blob").field("first", "Huge")).unwrap();
        graph
            .add_class(ClassDecl::new("TwoBlobs").with_base("Blob").field("second", "Huge"))
            .unwrap();

        for parallel in [true, false] {
            let resolved = LayoutResolver::new(LayoutConfig::default().with_parallel(parallel))
                .unwrap()
                .resolve(&graph);
            assert_eq!(resolved.size_of("Healthy").unwrap(), Size::new(4));
            assert_eq!(
                resolved.failures().get("Blob"),
                Some(&LayoutError::LayoutOverflow {
                    class: "TwoBlobs".to_string(),
                    field: "second".to_string(),
                })
            );
            assert!(resolved.layout("Blob").is_none());
            assert!(matches!(resolved.size_of("TwoBlobs"), Err(LayoutError::LayoutOverflow { .. })));
        }
    }

    #[test]
    fn test_vptr_after_maximal_base_overflows() {
        let mut catalog = TypeCatalog::with_primitives(8).unwrap();
        catalog.register("Tail", u64::MAX - 3, 1).unwrap();
        let mut graph = ClassGraph::new(Arc::new(catalog));
        graph.add_class(ClassDecl::new("Data").field("blob", "Tail")).unwrap();
        graph.add_class(ClassDecl::new("Virtual").with_base("Data").with_vtable()).unwrap();

        let resolved = resolver().resolve(&graph);
        assert_eq!(
            resolved.size_of("Virtual"),
            Err(LayoutError::LayoutOverflow {
                class: "Virtual".to_string(),
                field: VPTR_NAME.to_string(),
            })
        );
    }
}
