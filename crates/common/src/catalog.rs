//! Resource type catalog seam
//!
//! A catalog answers which API versions a provider namespace publishes for
//! each of its resource types. The live implementation talks to the
//! management endpoint; tests and offline runs use snapshots.

use crate::Result;
use serde::{Deserialize, Serialize};

/// API versions published for one resource type of a provider namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeVersions {
    /// Resource type without the namespace (e.g., "storageAccounts/blobServices")
    pub resource_type: String,
    /// Versions in the order the service returns them
    #[serde(default)]
    pub api_versions: Vec<String>,
}

/// Read-only lookup of resource types by provider namespace
pub trait ResourceCatalog {
    /// List every resource type registered under `namespace`
    fn resource_types(&self, namespace: &str) -> Result<Vec<ResourceTypeVersions>>;
}

impl<T: ResourceCatalog + ?Sized> ResourceCatalog for Box<T> {
    fn resource_types(&self, namespace: &str) -> Result<Vec<ResourceTypeVersions>> {
        (**self).resource_types(namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"resourceType": "parents", "apiVersions": ["2021-01-01"]}"#;
        let parsed: ResourceTypeVersions = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.resource_type, "parents");
        assert_eq!(parsed.api_versions, vec!["2021-01-01"]);
    }
}
