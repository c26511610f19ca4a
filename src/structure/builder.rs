// Tue Jan 13 2026 - Alex

/// Raw structural facts for one class, as handed over by an input adapter.
///
/// Nothing is checked here; `ClassGraph::add_class` validates the whole
/// declaration before anything is inserted.
#[derive(Debug, Clone, Default)]
pub struct ClassDecl {
    pub(crate) name: String,
    pub(crate) base: Option<String>,
    pub(crate) fields: Vec<(String, String)>,
    pub(crate) alignment: Option<u64>,
    pub(crate) vtable: bool,
    pub(crate) descriptors: Vec<(String, Option<String>)>,
}

impl ClassDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    pub fn field(mut self, name: &str, type_name: &str) -> Self {
        self.fields.push((name.to_string(), type_name.to_string()));
        self
    }

    pub fn fields<'a, I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.fields
            .extend(fields.into_iter().map(|(n, t)| (n.to_string(), t.to_string())));
        self
    }

    pub fn aligned(mut self, alignment: u64) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_vtable(mut self) -> Self {
        self.vtable = true;
        self
    }

    /// Declares a nested type-descriptor record (`Name : Parent`) on this class.
    pub fn with_descriptor(mut self, name: &str, parent: Option<&str>) -> Self {
        self.descriptors
            .push((name.to_string(), parent.map(str::to_string)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
