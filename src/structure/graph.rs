// Tue Jan 15 2026 - Alex

use crate::structure::{
    Alignment, ClassDecl, ClassDescriptor, DescriptorIdentity, Field, LayoutError, TypeCatalog,
    TypeDescriptorRecord,
};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Forest of class descriptors linked by base identity.
///
/// Classes must be added base-first, so insertion order is always a valid
/// topological order. Every failed mutation leaves the graph untouched.
#[derive(Debug, Clone)]
pub struct ClassGraph {
    catalog: Arc<TypeCatalog>,
    classes: IndexMap<String, ClassDescriptor>,
    /// Flat table: owning class -> records keyed by nested name.
    type_descriptors: IndexMap<String, IndexMap<String, TypeDescriptorRecord>>,
    generation: u64,
}

/// Classes grouped under the root they descend from.
#[derive(Debug, Default)]
pub struct Hierarchies {
    pub groups: IndexMap<String, Vec<String>>,
    /// Classes whose base chain never reaches a root.
    pub broken: Vec<(String, LayoutError)>,
}

impl ClassGraph {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            catalog,
            classes: IndexMap::new(),
            type_descriptors: IndexMap::new(),
            generation: 0,
        }
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    /// Bumped by every successful mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn add_class(&mut self, decl: ClassDecl) -> Result<&ClassDescriptor, LayoutError> {
        if self.classes.contains_key(&decl.name) {
            return Err(LayoutError::DuplicateClass(decl.name));
        }
        if let Some(base) = &decl.base {
            if !self.classes.contains_key(base) {
                return Err(LayoutError::UnknownBase {
                    class: decl.name.clone(),
                    base: base.clone(),
                });
            }
        }
        let alignment_override = decl.alignment.map(Alignment::new).transpose()?;

        let mut seen = IndexSet::with_capacity(decl.fields.len());
        let mut fields = Vec::with_capacity(decl.fields.len());
        for (order, (field_name, type_name)) in decl.fields.iter().enumerate() {
            if !seen.insert(field_name.as_str()) {
                return Err(LayoutError::DuplicateField {
                    class: decl.name.clone(),
                    field: field_name.clone(),
                });
            }
            let field_type = self.catalog.lookup(type_name).ok_or_else(|| LayoutError::UnknownType {
                class: decl.name.clone(),
                field: field_name.clone(),
                type_name: type_name.clone(),
            })?;
            fields.push(Field::new(field_name, field_type, order));
        }

        let name = decl.name.clone();
        let descriptor = ClassDescriptor::new(
            decl.name,
            decl.base,
            fields,
            alignment_override,
            decl.vtable,
        );
        log::debug!("added class {}", descriptor);
        self.classes.insert(name.clone(), descriptor);

        for (record_name, parent) in decl.descriptors {
            let mut record = TypeDescriptorRecord::new(&name, &record_name);
            record.parent = parent;
            self.insert_descriptor(record);
        }

        self.generation += 1;
        Ok(&self.classes[&name])
    }

    /// Attaches a type-descriptor record to `class`. Attaching a name that is
    /// already present on that class keeps the first record.
    pub fn attach_type_descriptor(
        &mut self,
        class: &str,
        name: &str,
        parent: Option<&str>,
    ) -> Result<(), LayoutError> {
        if !self.classes.contains_key(class) {
            return Err(LayoutError::UnknownClass(class.to_string()));
        }
        let mut record = TypeDescriptorRecord::new(class, name);
        record.parent = parent.map(str::to_string);
        self.insert_descriptor(record);
        self.generation += 1;
        Ok(())
    }

    fn insert_descriptor(&mut self, record: TypeDescriptorRecord) {
        let records = self.type_descriptors.entry(record.owner.clone()).or_default();
        if let Some(existing) = records.get(&record.name) {
            if existing != &record {
                log::warn!("keeping {} over re-attached {}", existing, record);
            }
            return;
        }
        records.insert(record.name.clone(), record);
    }

    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes in insertion (base-first) order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    pub fn children(&self, name: &str) -> Vec<&str> {
        self.classes
            .values()
            .filter(|c| c.base() == Some(name))
            .map(|c| c.name())
            .collect()
    }

    /// Base chain of `name`, nearest base first.
    pub fn ancestors(&self, name: &str) -> Result<Vec<&str>, LayoutError> {
        let mut current = self
            .classes
            .get(name)
            .ok_or_else(|| LayoutError::UnknownClass(name.to_string()))?;
        let mut visited = IndexSet::new();
        visited.insert(current.name());

        while let Some(base) = current.base() {
            let next = self.classes.get(base).filter(|_| !visited.contains(base));
            match next {
                Some(node) => {
                    visited.insert(node.name());
                    current = node;
                }
                None => {
                    return Err(LayoutError::CycleDetected {
                        class: current.name().to_string(),
                        base: base.to_string(),
                    })
                }
            }
        }

        Ok(visited.into_iter().skip(1).collect())
    }

    /// Root of the hierarchy `name` belongs to (itself for a root).
    pub fn root_of(&self, name: &str) -> Result<&str, LayoutError> {
        let ancestors = self.ancestors(name)?;
        Ok(ancestors.last().copied().unwrap_or(self.classes[name].name()))
    }

    /// Root-to-`name` chain, base first.
    pub fn chain(&self, name: &str) -> Result<Vec<&str>, LayoutError> {
        let mut chain = self.ancestors(name)?;
        chain.reverse();
        chain.push(self.classes[name].name());
        Ok(chain)
    }

    pub fn depth(&self, name: &str) -> Result<usize, LayoutError> {
        Ok(self.ancestors(name)?.len())
    }

    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        self.ancestors(descendant)
            .map(|chain| chain.contains(&ancestor))
            .unwrap_or(false)
    }

    pub fn roots(&self) -> Vec<&str> {
        self.classes.values().filter(|c| c.is_root()).map(|c| c.name()).collect()
    }

    /// Partitions the graph into independent root hierarchies. Members of a
    /// group keep insertion order.
    pub fn hierarchies(&self) -> Hierarchies {
        let mut result = Hierarchies::default();
        for class in self.classes.values() {
            match self.root_of(class.name()) {
                Ok(root) => result
                    .groups
                    .entry(root.to_string())
                    .or_default()
                    .push(class.name().to_string()),
                Err(e) => result.broken.push((class.name().to_string(), e)),
            }
        }
        result
    }

    pub fn type_descriptors(&self, class: &str) -> Vec<&TypeDescriptorRecord> {
        self.type_descriptors
            .get(class)
            .map(|records| records.values().collect())
            .unwrap_or_default()
    }

    /// Every record whose identity under `policy` equals `identity`.
    pub fn descriptor_levels(&self, identity: &str, policy: DescriptorIdentity) -> Vec<&TypeDescriptorRecord> {
        self.type_descriptors
            .values()
            .flat_map(|records| records.values())
            .filter(|r| r.identity(policy) == identity)
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, descriptor: ClassDescriptor) {
        self.classes.insert(descriptor.name().to_string(), descriptor);
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> ClassGraph {
        let mut catalog = TypeCatalog::with_primitives(8).unwrap();
        catalog.register("MtString", 8, 8).unwrap();
        ClassGraph::new(Arc::new(catalog))
    }

    #[test]
    fn test_class_hierarchy() {
        let mut graph = graph();
        graph.add_class(ClassDecl::new("Base").with_vtable()).unwrap();
        graph.add_class(ClassDecl::new("Derived1").with_base("Base")).unwrap();
        graph.add_class(ClassDecl::new("Derived2").with_base("Base")).unwrap();
        graph.add_class(ClassDecl::new("GrandChild").with_base("Derived1")).unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.depth("GrandChild").unwrap(), 2);
        assert!(graph.is_ancestor("Base", "GrandChild"));
        assert!(!graph.is_ancestor("Derived2", "GrandChild"));
        assert_eq!(graph.root_of("GrandChild").unwrap(), "Base");
        assert_eq!(graph.root_of("Base").unwrap(), "Base");
        assert_eq!(graph.chain("GrandChild").unwrap(), vec!["Base", "Derived1", "GrandChild"]);
        assert_eq!(graph.children("Base"), vec!["Derived1", "Derived2"]);
    }

    #[test]
    fn test_unknown_base() {
        let mut graph = graph();
        let err = graph.add_class(ClassDecl::new("Derived").with_base("Missing")).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownBase { .. }));
        assert!(graph.is_empty());
        assert_eq!(graph.generation(), 0);
    }

    #[test]
    fn test_duplicate_class_keeps_original() {
        let mut graph = graph();
        graph.add_class(ClassDecl::new("A").field("x", "u32")).unwrap();
        let err = graph.add_class(ClassDecl::new("A").field("y", "u64")).unwrap_err();
        assert_eq!(err, LayoutError::DuplicateClass("A".to_string()));
        assert!(graph.get("A").unwrap().get_field("x").is_some());
        assert!(graph.get("A").unwrap().get_field("y").is_none());
    }

    #[test]
    fn test_duplicate_field() {
        let mut graph = graph();
        let err = graph
            .add_class(ClassDecl::new("A").field("x", "u32").field("x", "bool"))
            .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateField { ref field, .. } if field == "x"));
        assert!(!graph.contains("A"));
    }

    #[test]
    fn test_unregistered_field_type() {
        let mut graph = graph();
        let err = graph
            .add_class(ClassDecl::new("A").field("mPos", "MtFloat3"))
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownType { ref type_name, .. } if type_name == "MtFloat3"));
        assert!(!graph.contains("A"));
    }

    #[test]
    fn test_invalid_override() {
        let mut graph = graph();
        let err = graph.add_class(ClassDecl::new("A").aligned(6)).unwrap_err();
        assert_eq!(err, LayoutError::InvalidAlignment(6));
    }

    #[test]
    fn test_field_order_recorded() {
        let mut graph = graph();
        let class = graph
            .add_class(ClassDecl::new("A").field("name", "MtString").field("id", "s32"))
            .unwrap();
        assert_eq!(class.fields()[0].order(), 0);
        assert_eq!(class.fields()[1].order(), 1);
        assert_eq!(class.fields()[1].field_type().name(), "s32");
    }

    #[test]
    fn test_attach_type_descriptor() {
        let mut graph = graph();
        graph.add_class(ClassDecl::new("Root").with_vtable()).unwrap();
        graph
            .add_class(ClassDecl::new("Leaf").with_base("Root").with_descriptor("MyDTI", Some("MtDTI")))
            .unwrap();
        graph.attach_type_descriptor("Root", "MyDTI", Some("MtDTI")).unwrap();
        graph.attach_type_descriptor("Root", "MyDTI", None).unwrap();

        assert_eq!(graph.type_descriptors("Root").len(), 1);
        assert_eq!(graph.type_descriptors("Root")[0].parent.as_deref(), Some("MtDTI"));
        assert_eq!(graph.type_descriptors("Leaf").len(), 1);

        let err = graph.attach_type_descriptor("Nope", "MyDTI", None).unwrap_err();
        assert_eq!(err, LayoutError::UnknownClass("Nope".to_string()));

        assert_eq!(graph.descriptor_levels("MyDTI", DescriptorIdentity::SharedByName).len(), 2);
        assert_eq!(graph.descriptor_levels("Leaf::MyDTI", DescriptorIdentity::PerLevel).len(), 1);
    }

    #[test]
    fn test_hierarchies_partition() {
        let mut graph = graph();
        graph.add_class(ClassDecl::new("A")).unwrap();
        graph.add_class(ClassDecl::new("B")).unwrap();
        graph.add_class(ClassDecl::new("A1").with_base("A")).unwrap();
        graph.add_class(ClassDecl::new("B1").with_base("B")).unwrap();
        graph.add_class(ClassDecl::new("A2").with_base("A1")).unwrap();

        let hierarchies = graph.hierarchies();
        assert!(hierarchies.broken.is_empty());
        assert_eq!(hierarchies.groups["A"], vec!["A", "A1", "A2"]);
        assert_eq!(hierarchies.groups["B"], vec!["B", "B1"]);
        assert_eq!(graph.roots(), vec!["A", "B"]);
    }

    #[test]
    fn test_corrupted_cycle_reported() {
        let mut graph = graph();
        graph.insert_unchecked(ClassDescriptor::new("X".into(), Some("Y".into()), vec![], None, false));
        graph.insert_unchecked(ClassDescriptor::new("Y".into(), Some("X".into()), vec![], None, false));

        let hierarchies = graph.hierarchies();
        assert!(hierarchies.groups.is_empty());
        assert_eq!(hierarchies.broken.len(), 2);
        assert!(matches!(hierarchies.broken[0].1, LayoutError::CycleDetected { .. }));
    }
}
