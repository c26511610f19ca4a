// Tue Jan 16 2026 - Alex

//! Already-tokenized structural facts, as produced by a dump parser, and
//! their replay into a catalog and a class graph.

use crate::structure::{ClassDecl, ClassGraph, LayoutError, TypeCatalog};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactSheet {
    #[serde(default)]
    pub types: Vec<TypeFact>,
    #[serde(default)]
    pub classes: Vec<ClassFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeFact {
    Opaque {
        name: String,
        size: u64,
        alignment: u64,
    },
    Composite {
        name: String,
        members: Vec<MemberFact>,
        #[serde(default)]
        alignment: Option<u64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberFact {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorFact {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassFact {
    pub name: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub fields: Vec<MemberFact>,
    #[serde(default)]
    pub alignment: Option<u64>,
    #[serde(default)]
    pub vtable: bool,
    #[serde(default)]
    pub type_descriptors: Vec<DescriptorFact>,
}

impl ClassFact {
    pub fn to_decl(&self) -> ClassDecl {
        let mut decl = ClassDecl::new(&self.name)
            .fields(self.fields.iter().map(|f| (f.name.as_str(), f.type_name.as_str())));
        if let Some(base) = &self.base {
            decl = decl.with_base(base);
        }
        if let Some(alignment) = self.alignment {
            decl = decl.aligned(alignment);
        }
        if self.vtable {
            decl = decl.with_vtable();
        }
        for descriptor in &self.type_descriptors {
            decl = decl.with_descriptor(&descriptor.name, descriptor.parent.as_deref());
        }
        decl
    }
}

impl FactSheet {
    pub fn from_json_str(text: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(text).map_err(|e| LayoutError::Facts(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, LayoutError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LayoutError::Facts(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Primitive catalog extended with every type fact, in order.
    pub fn build_catalog(&self, pointer_size: u64) -> Result<TypeCatalog, LayoutError> {
        let mut catalog = TypeCatalog::with_primitives(pointer_size)?;
        for fact in &self.types {
            match fact {
                TypeFact::Opaque { name, size, alignment } => {
                    catalog.register(name, *size, *alignment)?;
                }
                TypeFact::Composite { name, members, alignment } => {
                    let members: Vec<(&str, &str)> = members
                        .iter()
                        .map(|m| (m.name.as_str(), m.type_name.as_str()))
                        .collect();
                    catalog.register_composite(name, &members, *alignment)?;
                }
            }
        }
        Ok(catalog)
    }

    /// Replays the class facts; stops at the first construction error.
    pub fn build_graph(&self, catalog: Arc<TypeCatalog>) -> Result<ClassGraph, LayoutError> {
        let mut graph = ClassGraph::new(catalog);
        for class in &self.classes {
            graph.add_class(class.to_decl())?;
        }
        log::info!("built graph with {} classes", graph.len());
        Ok(graph)
    }

    pub fn into_graph(&self, pointer_size: u64) -> Result<ClassGraph, LayoutError> {
        let catalog = self.build_catalog(pointer_size)?;
        self.build_graph(Arc::new(catalog))
    }
}
