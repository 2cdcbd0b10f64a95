//! Immutable method catalog grouped into categories

use crate::descriptor::MethodDescriptor;
use crate::error::{RegistryError, RegistryResult};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// A titled group of descriptors, in declaration order
#[derive(Debug, Clone)]
pub struct MethodCategory {
    pub key: String,
    pub title: String,
    methods: IndexMap<String, Arc<MethodDescriptor>>,
}

impl MethodCategory {
    pub fn methods(&self) -> &IndexMap<String, Arc<MethodDescriptor>> {
        &self.methods
    }
}

/// Entry of a method picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodOption {
    pub value: String,
    pub label: String,
}

/// Catalog of invocable methods.
///
/// Names are expected to be unique across categories. If two categories declare the
/// same name, the flattened view keeps the later descriptor (at the earlier position)
/// and the name is reported by [`MethodRegistry::duplicate_names`].
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    categories: Vec<MethodCategory>,
    all: IndexMap<String, Arc<MethodDescriptor>>,
    duplicates: Vec<String>,
}

impl MethodRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn categories(&self) -> &[MethodCategory] {
        &self.categories
    }

    pub fn category(&self, key: &str) -> RegistryResult<&MethodCategory> {
        self.categories
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| RegistryError::CategoryNotFound(key.to_string()))
    }

    /// Flattened `name -> descriptor` view across all categories
    pub fn all_methods(&self) -> &IndexMap<String, Arc<MethodDescriptor>> {
        &self.all
    }

    pub fn get(&self, name: &str) -> Option<Arc<MethodDescriptor>> {
        self.all.get(name).cloned()
    }

    pub fn require(&self, name: &str) -> RegistryResult<Arc<MethodDescriptor>> {
        self.get(name).ok_or_else(|| RegistryError::MethodNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all.contains_key(name)
    }

    /// Every method name, in catalog order
    pub fn method_names(&self) -> Vec<String> {
        self.all.keys().cloned().collect()
    }

    /// Picker options; value and label are both the method name
    pub fn method_options(&self) -> Vec<MethodOption> {
        self.all
            .keys()
            .map(|name| MethodOption {
                value: name.clone(),
                label: name.clone(),
            })
            .collect()
    }

    /// Names declared more than once while building
    pub fn duplicate_names(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Builds a [`MethodRegistry`]; methods go into the most recently opened category
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    categories: Vec<MethodCategory>,
}

impl RegistryBuilder {
    /// Open a new category
    pub fn category(mut self, key: impl Into<String>, title: impl Into<String>) -> Self {
        self.categories.push(MethodCategory {
            key: key.into(),
            title: title.into(),
            methods: IndexMap::new(),
        });
        self
    }

    /// Add a descriptor to the current category, opening a "general" one if needed
    pub fn method(mut self, descriptor: MethodDescriptor) -> Self {
        if self.categories.is_empty() {
            self = self.category("general", "General Methods");
        }
        if let Some(current) = self.categories.last_mut() {
            current.methods.insert(descriptor.name().to_string(), Arc::new(descriptor));
        }
        self
    }

    pub fn build(self) -> MethodRegistry {
        let mut all: IndexMap<String, Arc<MethodDescriptor>> = IndexMap::new();
        let mut duplicates = Vec::new();

        for category in &self.categories {
            for (name, descriptor) in &category.methods {
                if all.insert(name.clone(), Arc::clone(descriptor)).is_some() {
                    warn!(
                        method = %name,
                        category = %category.key,
                        "duplicate method name; later declaration wins"
                    );
                    if !duplicates.contains(name) {
                        duplicates.push(name.clone());
                    }
                }
            }
        }

        MethodRegistry {
            categories: self.categories,
            all,
            duplicates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CallFn, CallFuture};
    use futures::FutureExt;
    use rpcdeck_core::ParamValue;
    use serde_json::json;

    fn constant(value: &'static str) -> CallFn {
        Arc::new(move |_: Vec<ParamValue>| -> CallFuture {
            async move { Ok(json!(value)) }.boxed()
        })
    }

    fn desc(name: &str, result: &'static str) -> MethodDescriptor {
        MethodDescriptor::new(name, name, "x", constant(result))
    }

    #[test]
    fn flattens_in_category_order() {
        let registry = MethodRegistry::builder()
            .category("a", "A")
            .method(desc("one", ""))
            .method(desc("two", ""))
            .category("b", "B")
            .method(desc("three", ""))
            .build();

        assert_eq!(registry.method_names(), vec!["one", "two", "three"]);
        assert_eq!(registry.categories().len(), 2);
        assert_eq!(registry.category("b").unwrap().methods().len(), 1);
        assert!(registry.category("c").is_err());
        assert!(registry.duplicate_names().is_empty());
        for (name, descriptor) in registry.all_methods() {
            assert_eq!(descriptor.name(), name);
        }
    }

    #[tokio::test]
    async fn later_duplicate_wins_and_is_reported() {
        let registry = MethodRegistry::builder()
            .category("a", "A")
            .method(desc("same", "first"))
            .method(desc("other", ""))
            .category("b", "B")
            .method(desc("same", "second"))
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.method_names(), vec!["same", "other"]);
        assert_eq!(registry.duplicate_names(), ["same".to_string()]);
        let result = registry.require("same").unwrap().invoke(vec![]).await.unwrap();
        assert_eq!(result, json!("second"));
    }

    #[test]
    fn methods_without_category_go_to_general() {
        let registry = MethodRegistry::builder().method(desc("solo", "")).build();
        assert_eq!(registry.categories()[0].key, "general");
        assert!(registry.contains("solo"));
    }

    #[test]
    fn options_mirror_names() {
        let registry =
            MethodRegistry::builder().method(desc("x", "")).method(desc("y", "")).build();
        assert_eq!(
            registry.method_options(),
            vec![
                MethodOption {
                    value: "x".into(),
                    label: "x".into()
                },
                MethodOption {
                    value: "y".into(),
                    label: "y".into()
                },
            ]
        );
        assert!(matches!(registry.require("z"), Err(RegistryError::MethodNotFound(_))));
    }
}
