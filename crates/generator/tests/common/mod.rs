//! Shared fixtures for generator integration tests

#![allow(dead_code)]

use provisioning_generator_common::{
    ClientModel, GeneratorConfig, ResourceCatalog, ResourceTypeVersions, Result,
};
use provisioning_generator_parser::{ClientModelParser, DocumentFormat};
use std::path::Path;

pub const STORAGE_YAML: &str = r#"
provider: Microsoft.Storage
package: com.azure.resourcemanager.storage
resources:
  - model: StorageAccountInner
    description: A storage account
    create:
      path: /subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Storage/storageAccounts/{accountName}
  - model: BlobServicePropertiesInner
    create:
      path: /subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Storage/storageAccounts/{accountName}/blobServices/{blobServicesName}
  - model: UsageInner
models:
  - name: StorageAccountInner
    properties:
      - name: id
        type: string
        readOnly: true
      - name: location
        type: string
        required: true
      - name: tags
        type: map<string, string>
      - name: sku
        type: Sku
      - name: properties
        type: StorageAccountProperties
        flatten: true
  - name: StorageAccountProperties
    properties:
      - name: accessTier
        type: AccessTier
      - name: creationTime
        type: date-time
        readOnly: true
      - name: primaryEndpoints
        type: list<list<string>>
  - name: Sku
    description: The SKU of the storage account.
    properties:
      - name: name
        type: SkuName
        required: true
  - name: SkuName
    enum: [Standard_LRS, Premium_LRS]
  - name: AccessTier
    enum: [Hot, Cool]
  - name: BlobServicePropertiesInner
    properties:
      - name: isVersioningEnabled
        type: boolean
      - name: defaultAccessTier
        type: AccessTier
  - name: UsageInner
    properties:
      - name: currentValue
        type: int32
"#;

pub fn storage_model() -> ClientModel {
    ClientModelParser::from_content(STORAGE_YAML, DocumentFormat::Yaml)
        .unwrap()
        .parse()
        .unwrap()
}

pub fn storage_config(output: &Path) -> GeneratorConfig {
    let mut config = GeneratorConfig::new(
        "Storage",
        "com.azure.provisioning.storage",
        "Microsoft.Storage",
    );
    config.output.base_dir = output.to_path_buf();
    config
}

/// Catalog answering from a fixed listing for Microsoft.Storage
pub struct StorageCatalog;

impl ResourceCatalog for StorageCatalog {
    fn resource_types(&self, namespace: &str) -> Result<Vec<ResourceTypeVersions>> {
        if namespace != "Microsoft.Storage" {
            return Ok(vec![]);
        }
        Ok(vec![
            ResourceTypeVersions {
                resource_type: "storageAccounts".to_string(),
                api_versions: vec![
                    "2023-01-01".to_string(),
                    "2022-09-01".to_string(),
                    "2023-04-01-preview".to_string(),
                ],
            },
            ResourceTypeVersions {
                resource_type: "storageAccounts/blobServices".to_string(),
                api_versions: vec!["2023-01-01".to_string()],
            },
        ])
    }
}
