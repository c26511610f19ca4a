// Tue Jan 13 2026 - Alex

use crate::structure::{ClassGraph, LayoutResolver, ResolvedGraph};
use parking_lot::RwLock;
use std::sync::Arc;

/// Memoizes the resolution of one graph. The entry is keyed by the graph's
/// generation, so any mutation since the last resolve forces a recompute.
pub struct StructureCache {
    entry: RwLock<Option<Arc<ResolvedGraph>>>,
}

pub type LayoutCache = StructureCache;

impl StructureCache {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
        }
    }

    pub fn get(&self, graph: &ClassGraph) -> Option<Arc<ResolvedGraph>> {
        self.entry
            .read()
            .as_ref()
            .filter(|cached| cached.generation() == graph.generation())
            .cloned()
    }

    pub fn get_or_resolve(&self, graph: &ClassGraph, resolver: &LayoutResolver) -> Arc<ResolvedGraph> {
        if let Some(cached) = self.get(graph) {
            return cached;
        }

        let mut entry = self.entry.write();
        if let Some(cached) = entry.as_ref().filter(|c| c.generation() == graph.generation()) {
            return Arc::clone(cached);
        }
        log::debug!("resolving graph generation {}", graph.generation());
        let resolved = Arc::new(resolver.resolve(graph));
        *entry = Some(Arc::clone(&resolved));
        resolved
    }

    pub fn clear(&self) {
        *self.entry.write() = None;
    }
}

impl Default for StructureCache {
    fn default() -> Self {
        Self::new()
    }
}
