// Tue Jan 15 2026 - Alex

use crate::structure::{Alignment, LayoutError, Offset, ResolvedLayout, Size};
use indexmap::IndexMap;

/// Output of one resolution pass: the layouts that resolved, and the
/// hierarchies that did not. Owned separately from the graph it came from.
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    layouts: IndexMap<String, ResolvedLayout>,
    /// Root (or broken class) -> reason the hierarchy was dropped.
    failures: IndexMap<String, LayoutError>,
    failed_classes: IndexMap<String, LayoutError>,
    generation: u64,
}

impl ResolvedGraph {
    pub(crate) fn new(
        layouts: IndexMap<String, ResolvedLayout>,
        failures: IndexMap<String, LayoutError>,
        failed_classes: IndexMap<String, LayoutError>,
        generation: u64,
    ) -> Self {
        Self {
            layouts,
            failures,
            failed_classes,
            generation,
        }
    }

    /// Graph generation this result was computed from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layouts(&self) -> &IndexMap<String, ResolvedLayout> {
        &self.layouts
    }

    pub fn layout(&self, class: &str) -> Option<&ResolvedLayout> {
        self.layouts.get(class)
    }

    pub fn failures(&self) -> &IndexMap<String, LayoutError> {
        &self.failures
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turns any dropped hierarchy into an error.
    pub fn into_result(self) -> Result<Self, LayoutError> {
        match self.failures.values().next() {
            Some(e) => Err(e.clone()),
            None => Ok(self),
        }
    }

    fn require(&self, class: &str) -> Result<&ResolvedLayout, LayoutError> {
        if let Some(layout) = self.layouts.get(class) {
            return Ok(layout);
        }
        Err(self
            .failed_classes
            .get(class)
            .cloned()
            .unwrap_or_else(|| LayoutError::UnknownClass(class.to_string())))
    }

    pub fn size_of(&self, class: &str) -> Result<Size, LayoutError> {
        self.require(class).map(|l| l.size())
    }

    pub fn alignment_of(&self, class: &str) -> Result<Alignment, LayoutError> {
        self.require(class).map(|l| l.alignment())
    }

    pub fn offset_of(&self, class: &str, field: &str) -> Result<Offset, LayoutError> {
        self.require(class)?
            .offset_of(field)
            .ok_or_else(|| LayoutError::FieldNotFound {
                class: class.to_string(),
                field: field.to_string(),
            })
    }

    /// `Ok(None)` when no class in the ancestry has a vtable.
    pub fn vtable_offset_of(&self, class: &str) -> Result<Option<Offset>, LayoutError> {
        self.require(class).map(|l| l.vtable_offset())
    }
}
