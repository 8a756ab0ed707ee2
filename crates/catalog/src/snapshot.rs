//! Catalog backed by a snapshot file
//!
//! Snapshots map provider namespaces to their resource types:
//!
//! ```json
//! {
//!   "Microsoft.Storage": [
//!     { "resourceType": "storageAccounts", "apiVersions": ["2023-01-01", "2022-09-01"] }
//!   ]
//! }
//! ```
//!
//! YAML snapshots (`.yaml`/`.yml`) use the same shape.

use provisioning_generator_common::{
    GeneratorError, ResourceCatalog, ResourceTypeVersions, Result,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    /// Keyed by lowercased namespace; namespaces are case-insensitive
    namespaces: HashMap<String, Vec<ResourceTypeVersions>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the resource types of a namespace
    pub fn with_namespace(
        mut self,
        namespace: &str,
        resource_types: Vec<ResourceTypeVersions>,
    ) -> Self {
        self.insert(namespace, resource_types);
        self
    }

    pub fn insert(&mut self, namespace: &str, resource_types: Vec<ResourceTypeVersions>) {
        self.namespaces
            .insert(namespace.to_ascii_lowercase(), resource_types);
    }

    /// Load a JSON or YAML snapshot, chosen by file extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Catalog(format!("Failed to read catalog snapshot {:?}: {}", path, e))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let catalog = if is_yaml {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };
        debug!(
            "Loaded catalog snapshot {:?} with {} namespaces",
            path,
            catalog.namespaces.len()
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<ResourceTypeVersions>> = serde_json::from_str(content)?;
        Ok(Self::from_map(raw))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<ResourceTypeVersions>> = serde_yaml::from_str(content)?;
        Ok(Self::from_map(raw))
    }

    fn from_map(raw: HashMap<String, Vec<ResourceTypeVersions>>) -> Self {
        let mut catalog = Self::new();
        for (namespace, resource_types) in raw {
            catalog.insert(&namespace, resource_types);
        }
        catalog
    }
}

impl ResourceCatalog for StaticCatalog {
    fn resource_types(&self, namespace: &str) -> Result<Vec<ResourceTypeVersions>> {
        self.namespaces
            .get(&namespace.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| {
                GeneratorError::Catalog(format!("Namespace {} is not in the snapshot", namespace))
            })
    }
}
