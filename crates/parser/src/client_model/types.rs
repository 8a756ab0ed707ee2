//! Client model document type definitions
//!
//! The on-disk shape of a client model. Types are either textual expressions
//! (`"list<Sku>"`) or structured references to external types.

use serde::{Deserialize, Serialize};

/// Client model document root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientModelDocument {
    /// Provider namespace (e.g., "Microsoft.Storage")
    pub provider: String,

    /// Default package for models that don't declare one
    pub package: String,

    /// Provisionable resources
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,

    /// Composite and enum models
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

/// Resource entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    /// Model carrying the resource schema (simple or qualified name)
    pub model: String,

    /// Create operation
    #[serde(default)]
    pub create: Option<CreateEntry>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Create operation entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntry {
    /// URL path template
    pub path: String,
}

/// Model entry: an object when `enum` is absent, an enum otherwise
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub name: String,

    #[serde(default)]
    pub package: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub properties: Vec<PropertyEntry>,

    /// Base model (simple or qualified name)
    #[serde(default)]
    pub base: Option<String>,

    #[serde(default)]
    pub discriminator: Option<DiscriminatorEntry>,

    /// Enum values
    #[serde(default, rename = "enum")]
    pub values: Option<Vec<String>>,
}

/// Discriminator entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscriminatorEntry {
    pub property: String,

    #[serde(default)]
    pub value: Option<String>,
}

/// Property entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEntry {
    pub name: String,

    /// Wire name, defaults to `name`
    #[serde(default)]
    pub serialized_name: Option<String>,

    #[serde(rename = "type")]
    pub ty: TypeEntry,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub read_only: bool,

    /// Inferred from the property name when absent
    #[serde(default)]
    pub secure: Option<bool>,

    #[serde(default)]
    pub flatten: bool,

    #[serde(default)]
    pub description: Option<String>,
}

/// Property type: expression or external type reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeEntry {
    /// Type expression (e.g., "map<string, list<Sku>>")
    Expression(String),

    /// Type living outside the client model
    External { name: String, package: String },
}
