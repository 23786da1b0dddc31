//! Existence check for the record type a cart may be associated with.

use std::collections::HashSet;

/// Answers whether a record type name is known to the host.
pub trait TypeRegistry: Send + Sync {
    fn exists(&self, type_name: &str) -> bool;
}

impl<F> TypeRegistry for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn exists(&self, type_name: &str) -> bool {
        self(type_name)
    }
}

/// Registry backed by a fixed set of type names.
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    names: HashSet<String>,
}

impl KnownTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    pub fn with(mut self, type_name: impl Into<String>) -> Self {
        self.names.insert(type_name.into());
        self
    }

    pub fn register(&mut self, type_name: impl Into<String>) {
        self.names.insert(type_name.into());
    }
}

impl TypeRegistry for KnownTypes {
    fn exists(&self, type_name: &str) -> bool {
        self.names.contains(type_name)
    }
}

impl<S: Into<String>> FromIterator<S> for KnownTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_lookup() {
        let types = KnownTypes::new().with("Product").with("Bundle");
        assert!(types.exists("Product"));
        assert!(types.exists("Bundle"));
        assert!(!types.exists("product"));
    }

    #[test]
    fn empty_registry_knows_nothing() {
        assert!(!KnownTypes::default().exists("Product"));
    }

    #[test]
    fn closures_act_as_registries() {
        let registry = |name: &str| name.starts_with("App");
        assert!(registry.exists("AppProduct"));
        assert!(!registry.exists("Product"));
    }

    #[test]
    fn collect_from_names() {
        let mut types: KnownTypes = ["Product"].into_iter().collect();
        types.register("Bundle");
        assert!(types.exists("Bundle"));
    }
}
