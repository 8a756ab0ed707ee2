//! Resource type catalogs
//!
//! The generator asks a [`ResourceCatalog`] which API versions each resource
//! type of a provider namespace supports. This crate provides the live ARM
//! implementation, a snapshot-backed one for offline and reproducible runs,
//! and an empty one.

mod arm;
mod snapshot;

pub use arm::ArmCatalog;
pub use snapshot::StaticCatalog;

use provisioning_generator_common::{
    CatalogConfig, CatalogKind, GeneratorError, ResourceCatalog, ResourceTypeVersions, Result,
};
use tracing::debug;

/// Catalog that knows no resource types; resources stay unversioned
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCatalog;

impl ResourceCatalog for NoCatalog {
    fn resource_types(&self, namespace: &str) -> Result<Vec<ResourceTypeVersions>> {
        debug!("No catalog configured, skipping {}", namespace);
        Ok(Vec::new())
    }
}

/// Build the catalog a configuration asks for
pub fn from_config(config: &CatalogConfig) -> Result<Box<dyn ResourceCatalog>> {
    match config.kind {
        CatalogKind::None => Ok(Box::new(NoCatalog)),
        CatalogKind::Static => {
            let path = config.path.as_ref().ok_or_else(|| {
                GeneratorError::Config("catalog.path is required for a static catalog".to_string())
            })?;
            Ok(Box::new(StaticCatalog::load(path)?))
        },
        CatalogKind::Arm => Ok(Box::new(ArmCatalog::from_config(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_catalog_is_empty() {
        assert!(NoCatalog.resource_types("Microsoft.Foo").unwrap().is_empty());
    }

    #[test]
    fn test_from_config_none() {
        let catalog = from_config(&CatalogConfig::default()).unwrap();
        assert!(catalog.resource_types("Microsoft.Foo").unwrap().is_empty());
    }

    #[test]
    fn test_from_config_static() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(
            br#"{"Microsoft.Foo": [{"resourceType": "parents", "apiVersions": ["2021-01-01"]}]}"#,
        )
        .unwrap();

        let config = CatalogConfig {
            kind: CatalogKind::Static,
            path: Some(file.path().to_path_buf()),
            ..CatalogConfig::default()
        };
        let catalog = from_config(&config).unwrap();
        let types = catalog.resource_types("Microsoft.Foo").unwrap();
        assert_eq!(types[0].api_versions, vec!["2021-01-01"]);
    }

    #[test]
    fn test_from_config_static_without_path() {
        let config = CatalogConfig {
            kind: CatalogKind::Static,
            ..CatalogConfig::default()
        };
        assert!(matches!(
            from_config(&config),
            Err(GeneratorError::Config(_))
        ));
    }
}
