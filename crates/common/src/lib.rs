//! Common types and utilities for the Provisioning Generator
//!
//! This crate contains the intermediate representation of a management-plane
//! client model, the shared error type, the resource type catalog seam and
//! the YAML generator configuration used by the parser, generator and CLI.

pub mod catalog;
pub mod config;

pub use catalog::{ResourceCatalog, ResourceTypeVersions};
pub use config::{
    artifact_name, CatalogConfig, CatalogKind, GeneratorConfig, LintConfig, OutputConfig,
    SpecificationInfo,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during provisioning model generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Unsupported wire type: {0}")]
    UnsupportedType(String),

    #[error("Unknown model reference: {0}")]
    UnknownModel(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// A management-plane client model: the resources a service exposes and
/// every composite or enum model reachable from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientModel {
    /// Provider namespace (e.g., "Microsoft.Storage")
    pub provider: String,
    /// Package the client models live in
    pub package: String,
    /// Resources, in declaration order
    pub resources: Vec<SourceResource>,
    /// Composite and enum models, in declaration order
    pub models: Vec<SourceModel>,
}

/// A provisionable resource described by the client model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceResource {
    /// Qualified name of the model carrying the resource's wire schema
    pub model: String,
    /// The operation creating the resource, if the service exposes one
    pub create: Option<CreateOperation>,
    /// Human readable description
    pub description: Option<String>,
}

/// Create (PUT) operation of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOperation {
    /// URL path template, e.g.
    /// `/subscriptions/{subscriptionId}/resourceGroups/{rg}/providers/Microsoft.Foo/parents/{p}`
    pub path: String,
}

/// A composite or enum model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceModel {
    pub name: String,
    pub package: String,
    pub description: Option<String>,
    pub kind: SourceModelKind,
}

impl SourceModel {
    /// Identity of the model inside a client model
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, SourceModelKind::Enum { .. })
    }
}

/// Shape of a source model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceModelKind {
    Object {
        properties: Vec<SourceProperty>,
        /// Qualified name of the base model
        base: Option<String>,
        discriminator: Option<Discriminator>,
    },
    Enum {
        values: Vec<String>,
    },
}

/// Polymorphic discriminator of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discriminator {
    /// Wire name of the discriminator property
    pub property: String,
    /// Value identifying this model; absent on abstract bases
    pub value: Option<String>,
}

/// One field of a source model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProperty {
    pub name: String,
    /// Name on the wire
    pub serialized_name: String,
    pub ty: WireType,
    pub required: bool,
    pub read_only: bool,
    pub secure: bool,
    /// Inline the referenced model's properties into the owner
    pub flatten: bool,
    pub description: Option<String>,
}

/// Type of a field as described by the client model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireType {
    Primitive(PrimitiveType),
    External { name: String, package: String },
    List(Box<WireType>),
    /// Keys are always strings
    Map(Box<WireType>),
    /// Qualified reference to an object or enum model
    Model(String),
    /// A type expression the parser could not classify
    Unsupported(String),
}

/// Builtin wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveType {
    String,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    DateTime,
    Duration,
    Uuid,
    Url,
    Binary,
    Object,
}

impl PrimitiveType {
    /// Java type name used to reference the primitive
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Int32 => "Integer",
            PrimitiveType::Int64 => "Long",
            PrimitiveType::Float32 => "Float",
            PrimitiveType::Float64 => "Double",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::DateTime => "OffsetDateTime",
            PrimitiveType::Duration => "Duration",
            PrimitiveType::Uuid => "UUID",
            PrimitiveType::Url => "URL",
            PrimitiveType::Binary => "byte[]",
            PrimitiveType::Object => "Object",
        }
    }

    /// Package the Java type lives in
    pub fn package(&self) -> &'static str {
        match self {
            PrimitiveType::DateTime | PrimitiveType::Duration => "java.time",
            PrimitiveType::Uuid => "java.util",
            PrimitiveType::Url => "java.net",
            _ => "java.lang",
        }
    }
}
