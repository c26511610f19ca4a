// Tue Jan 13 2026 - Alex

use crate::structure::{Alignment, ClassGraph, LayoutError, ResolvedGraph, ResolvedLayout, VPTR_NAME};
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    NonMonotonicOffsets,
    OverlappingFields,
    MisalignedSize,
    MisalignedField,
    AlignmentViolation,
    InheritedFieldMoved,
}

/// One validation finding. Never fatal on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub class: String,
    pub field: Option<String>,
    /// Second member involved, for overlaps.
    pub related: Option<String>,
    pub kind: FindingKind,
    pub message: String,
}

impl Finding {
    fn new(class: &str, field: Option<&str>, kind: FindingKind, message: String) -> Self {
        Self {
            class: class.to_string(),
            field: field.map(str::to_string),
            related: None,
            kind,
            message,
        }
    }

    /// Error equivalent, for callers that decide to treat the finding as fatal.
    pub fn to_error(&self) -> LayoutError {
        let field = self.field.clone().unwrap_or_default();
        match self.kind {
            FindingKind::OverlappingFields => LayoutError::OverlappingFields {
                class: self.class.clone(),
                first: self.related.clone().unwrap_or_default(),
                second: field,
            },
            FindingKind::NonMonotonicOffsets | FindingKind::InheritedFieldMoved => {
                LayoutError::NonMonotonicOffsets {
                    class: self.class.clone(),
                    field,
                }
            }
            FindingKind::MisalignedSize
            | FindingKind::MisalignedField
            | FindingKind::AlignmentViolation => LayoutError::AlignmentViolation {
                class: self.class.clone(),
                field: self.field.clone(),
                message: self.message.clone(),
            },
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.class)?;
        if let Some(field) = &self.field {
            write!(f, "::{}", field)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Post-pass over a resolved graph. Each class is checked on its own.
pub struct StructureValidator<'a> {
    graph: &'a ClassGraph,
    resolved: &'a ResolvedGraph,
    check_field_alignment: bool,
}

pub type LayoutValidator<'a> = StructureValidator<'a>;

impl<'a> StructureValidator<'a> {
    pub fn new(graph: &'a ClassGraph, resolved: &'a ResolvedGraph) -> Self {
        Self {
            graph,
            resolved,
            check_field_alignment: true,
        }
    }

    pub fn with_field_alignment_check(mut self, enabled: bool) -> Self {
        self.check_field_alignment = enabled;
        self
    }

    /// Lazily yields findings class by class. Each call starts over.
    pub fn findings(&self) -> impl Iterator<Item = Finding> + '_ {
        self.resolved
            .layouts()
            .values()
            .flat_map(move |layout| self.validate_layout(layout))
    }

    pub fn validate_class(&self, class: &str) -> Result<Vec<Finding>, LayoutError> {
        let layout = self
            .resolved
            .layout(class)
            .ok_or_else(|| LayoutError::UnknownClass(class.to_string()))?;
        Ok(self.validate_layout(layout))
    }

    pub fn validate_layout(&self, layout: &ResolvedLayout) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.check_monotonic(layout, &mut findings);
        self.check_overlaps(layout, &mut findings);
        self.check_size(layout, &mut findings);
        if self.check_field_alignment {
            self.check_field_alignment(layout, &mut findings);
        }
        self.check_override(layout, &mut findings);
        self.check_inherited(layout, &mut findings);
        findings
    }

    fn check_monotonic(&self, layout: &ResolvedLayout, out: &mut Vec<Finding>) {
        for (prev, next) in layout.fields().iter().tuple_windows() {
            if next.offset < prev.offset {
                out.push(Finding::new(
                    layout.class(),
                    Some(next.name.as_str()),
                    FindingKind::NonMonotonicOffsets,
                    format!("{} at {} precedes {} at {}", next.name, next.offset, prev.name, prev.offset),
                ));
            }
        }
    }

    fn check_overlaps(&self, layout: &ResolvedLayout, out: &mut Vec<Finding>) {
        let mut ranges: Vec<(&str, u64, u64)> = layout
            .fields()
            .iter()
            .map(|f| (f.name.as_str(), f.offset.as_u64(), f.end_offset()))
            .collect();
        if let Some(slot) = layout.vtable() {
            ranges.push((VPTR_NAME, slot.offset.as_u64(), slot.end_offset()));
        }
        ranges.sort_by_key(|&(_, start, _)| start);

        for ((first, _, first_end), (second, second_start, _)) in ranges.iter().tuple_windows() {
            if *second_start < *first_end {
                let mut finding = Finding::new(
                    layout.class(),
                    Some(*second),
                    FindingKind::OverlappingFields,
                    format!("{} starts at 0x{:x} inside {} (ends 0x{:x})", second, second_start, first, first_end),
                );
                finding.related = Some(first.to_string());
                out.push(finding);
            }
        }
    }

    fn check_size(&self, layout: &ResolvedLayout, out: &mut Vec<Finding>) {
        if !layout.alignment().is_aligned(layout.size().as_u64()) {
            out.push(Finding::new(
                layout.class(),
                None,
                FindingKind::MisalignedSize,
                format!("size {} is not a multiple of alignment {}", layout.size(), layout.alignment()),
            ));
        }
    }

    fn check_field_alignment(&self, layout: &ResolvedLayout, out: &mut Vec<Finding>) {
        for field in layout.fields() {
            if !field.alignment.is_aligned(field.offset.as_u64()) {
                out.push(Finding::new(
                    layout.class(),
                    Some(field.name.as_str()),
                    FindingKind::MisalignedField,
                    format!("offset {} is not a multiple of {}", field.offset, field.alignment),
                ));
            }
        }
    }

    /// An override weaker than what the contents need is a contradiction.
    fn check_override(&self, layout: &ResolvedLayout, out: &mut Vec<Finding>) {
        let Some(forced) = layout.alignment_override() else {
            return;
        };

        if layout.alignment() < forced {
            out.push(Finding::new(
                layout.class(),
                None,
                FindingKind::AlignmentViolation,
                format!("resolved alignment {} below forced {}", layout.alignment(), forced),
            ));
        }

        for field in layout.own_fields().filter(|f| f.alignment > forced) {
            out.push(Finding::new(
                layout.class(),
                Some(field.name.as_str()),
                FindingKind::AlignmentViolation,
                format!("forced alignment {} weaker than {} required by {}", forced, field.alignment, field.type_name),
            ));
        }

        // Only the introducing class; descendants are covered by the base check.
        let vptr_alignment = layout
            .vtable()
            .filter(|slot| slot.introduced_by == layout.class())
            .and_then(|slot| Alignment::new(slot.size.as_u64()).ok());
        if let Some(required) = vptr_alignment.filter(|&a| a > forced) {
            out.push(Finding::new(
                layout.class(),
                Some(VPTR_NAME),
                FindingKind::AlignmentViolation,
                format!("forced alignment {} weaker than {} required by the dispatch pointer", forced, required),
            ));
        }

        let base_alignment = layout
            .base()
            .and_then(|base| self.resolved.layout(base))
            .map(|base| base.alignment());
        if let Some(required) = base_alignment.filter(|&a| a > forced) {
            out.push(Finding::new(
                layout.class(),
                None,
                FindingKind::AlignmentViolation,
                format!("forced alignment {} weaker than base alignment {}", forced, required),
            ));
        }
    }

    fn check_inherited(&self, layout: &ResolvedLayout, out: &mut Vec<Finding>) {
        let Some(base) = layout.base().and_then(|b| self.resolved.layout(b)) else {
            return;
        };
        for inherited in base.fields() {
            let placed = layout
                .fields()
                .iter()
                .find(|f| f.declared_in == inherited.declared_in && f.name == inherited.name);
            match placed {
                Some(field) if field.offset == inherited.offset => {}
                Some(field) => out.push(Finding::new(
                    layout.class(),
                    Some(field.name.as_str()),
                    FindingKind::InheritedFieldMoved,
                    format!("moved from {} in {} to {}", inherited.offset, base.class(), field.offset),
                )),
                None => out.push(Finding::new(
                    layout.class(),
                    Some(inherited.name.as_str()),
                    FindingKind::InheritedFieldMoved,
                    format!("inherited from {} but missing", base.class()),
                )),
            }
        }
    }

    /// Number of classes in the source graph that have no layout to validate.
    pub fn unresolved_count(&self) -> usize {
        self.graph
            .classes()
            .filter(|c| self.resolved.layout(c.name()).is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::structure::{ClassDecl, LayoutResolver, Offset, Size, TypeCatalog};
    use std::sync::Arc;

    fn setup(decls: Vec<ClassDecl>) -> (ClassGraph, ResolvedGraph) {
        let mut catalog = TypeCatalog::with_primitives(8).unwrap();
        catalog.register("MtString", 8, 8).unwrap();
        let mut graph = ClassGraph::new(Arc::new(catalog));
        for decl in decls {
            graph.add_class(decl).unwrap();
        }
        let resolved = LayoutResolver::new(LayoutConfig::default())
            .unwrap()
            .resolve(&graph);
        (graph, resolved)
    }

    fn corrupt(resolved: &ResolvedGraph, class: &str, edit: impl FnOnce(&mut ResolvedLayout)) -> ResolvedGraph {
        let mut layouts = resolved.layouts().clone();
        edit(&mut layouts[class]);
        ResolvedGraph::new(layouts, Default::default(), Default::default(), resolved.generation())
    }

    #[test]
    fn test_clean_graph_has_no_findings() {
        let (graph, resolved) = setup(vec![
            ClassDecl::new("Root").with_vtable().field("name", "MtString"),
            ClassDecl::new("Child").with_base("Root").field("id", "s32").field("flag", "bool").aligned(8),
        ]);
        let validator = StructureValidator::new(&graph, &resolved);
        assert_eq!(validator.findings().count(), 0);
        assert_eq!(validator.unresolved_count(), 0);
    }

    #[test]
    fn test_weak_override_is_violation() {
        let (graph, resolved) = setup(vec![ClassDecl::new("Weak")
            .field("flag", "bool")
            .field("name", "MtString")
            .aligned(2)]);
        let validator = StructureValidator::new(&graph, &resolved);
        let findings: Vec<Finding> = validator.findings().collect();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::AlignmentViolation);
        assert_eq!(findings[0].field.as_deref(), Some("name"));
        assert!(matches!(findings[0].to_error(), LayoutError::AlignmentViolation { .. }));
    }

    #[test]
    fn test_overlap_and_non_monotonic() {
        let (graph, resolved) = setup(vec![ClassDecl::new("A").field("a", "u32").field("b", "u32")]);
        let broken = corrupt(&resolved, "A", |layout| layout.fields[1].offset = Offset::new(2));
        let validator = StructureValidator::new(&graph, &broken);
        let kinds: Vec<FindingKind> = validator.findings().map(|f| f.kind).collect();

        assert!(kinds.contains(&FindingKind::OverlappingFields));
        assert!(kinds.contains(&FindingKind::MisalignedField));

        let reordered = corrupt(&resolved, "A", |layout| layout.fields[0].offset = Offset::new(6));
        let validator = StructureValidator::new(&graph, &reordered);
        let findings: Vec<Finding> = validator.findings().collect();
        assert!(findings.iter().any(|f| f.kind == FindingKind::NonMonotonicOffsets));
        let overlap = findings
            .iter()
            .find(|f| f.kind == FindingKind::OverlappingFields)
            .unwrap();
        assert!(matches!(overlap.to_error(), LayoutError::OverlappingFields { .. }));
    }

    #[test]
    fn test_misaligned_size_and_moved_field() {
        let (graph, resolved) = setup(vec![
            ClassDecl::new("Base").field("x", "u64"),
            ClassDecl::new("Derived").with_base("Base").field("y", "u8"),
        ]);
        let broken = corrupt(&resolved, "Derived", |layout| {
            layout.size = Size::new(17);
            layout.fields[0].offset = Offset::new(8);
            layout.fields[1].offset = Offset::new(16);
        });
        let validator = StructureValidator::new(&graph, &broken).with_field_alignment_check(false);

        let findings = validator.validate_class("Derived").unwrap();
        assert!(findings.iter().any(|f| f.kind == FindingKind::MisalignedSize));
        assert!(findings
            .iter()
            .any(|f| f.kind == FindingKind::InheritedFieldMoved && f.field.as_deref() == Some("x")));
        // Base is untouched and still reports nothing.
        assert!(validator.validate_class("Base").unwrap().is_empty());
    }

    #[test]
    fn test_findings_are_lazy_and_restartable() {
        let (graph, resolved) = setup(vec![
            ClassDecl::new("One").field("a", "u64").aligned(4),
            ClassDecl::new("Two").field("b", "u64").aligned(4),
        ]);
        let validator = StructureValidator::new(&graph, &resolved);
        let first = validator.findings().next().unwrap();
        assert_eq!(first.class, "One");
        assert_eq!(validator.findings().count(), 2);
        assert_eq!(validator.findings().next().unwrap(), first);
    }

    #[test]
    fn test_override_weaker_than_base() {
        let (graph, resolved) = setup(vec![
            ClassDecl::new("Base").field("x", "u64"),
            ClassDecl::new("Derived").with_base("Base").field("y", "u32").aligned(4),
        ]);
        let validator = StructureValidator::new(&graph, &resolved);
        assert!(validator.validate_class("Base").unwrap().is_empty());

        let findings = validator.validate_class("Derived").unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::AlignmentViolation);
        assert_eq!(findings[0].field, None);
        assert!(findings[0].message.contains("base alignment 8"));
    }

    #[test]
    fn test_resolved_alignment_below_override() {
        let (graph, resolved) = setup(vec![ClassDecl::new("Forced").field("a", "u32").aligned(16)]);
        assert!(StructureValidator::new(&graph, &resolved).findings().next().is_none());

        let broken = corrupt(&resolved, "Forced", |layout| {
            layout.alignment = Alignment::new(4).unwrap();
            layout.size = Size::new(4);
        });
        let findings: Vec<Finding> = StructureValidator::new(&graph, &broken).findings().collect();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::AlignmentViolation);
        assert!(findings[0].message.contains("below forced 16"));
    }

    #[test]
    fn test_override_weaker_than_vptr() {
        let (graph, resolved) = setup(vec![
            ClassDecl::new("Root").with_vtable().field("id", "u32").aligned(4),
            ClassDecl::new("Child").with_base("Root").field("flag", "bool"),
        ]);
        assert_eq!(resolved.alignment_of("Root").unwrap().as_u64(), 8);

        let validator = StructureValidator::new(&graph, &resolved);
        let findings: Vec<Finding> = validator.findings().collect();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].class, "Root");
        assert_eq!(findings[0].kind, FindingKind::AlignmentViolation);
        assert_eq!(findings[0].field.as_deref(), Some(VPTR_NAME));
    }
}
