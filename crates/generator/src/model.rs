//! Generated type graph nodes
//!
//! Every emitted or referenced type is a [`ModelBase`] living in the
//! [`TypeRegistry`](crate::TypeRegistry) arena. Composite kinds carry a
//! [`TypeModel`]; collections point at their element by [`ModelId`].

use crate::naming;
use crate::registry::{BackingRef, ModelId};
use crate::resource::Resource;
use crate::type_model::TypeModel;
use provisioning_generator_common::Result;

/// Package Java collections live in
pub const COLLECTIONS_PACKAGE: &str = "java.util";

/// Any named type: primitive, external, enum, list, dictionary, simple model or resource
#[derive(Debug, Clone)]
pub struct ModelBase {
    /// Source name of the type
    pub name: String,
    /// Package the generated (or external) type lives in
    pub package: String,
    /// Source model this type represents
    pub backing: Option<BackingRef>,
    pub description: Option<String>,
    /// Not generated by us (language builtins, library types)
    pub external: bool,
    pub kind: ModelKind,
}

/// Variant-specific data of a [`ModelBase`]
#[derive(Debug, Clone)]
pub enum ModelKind {
    External,
    Enum(EnumModel),
    List(ModelId),
    Dictionary(ModelId),
    Simple(TypeModel),
    Resource(Box<Resource>),
}

/// Named set of string values, immutable after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumModel {
    values: Vec<String>,
}

impl EnumModel {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// (constant name, wire value) pairs in declaration order
    pub fn members(&self) -> Result<Vec<(String, String)>> {
        self.values
            .iter()
            .map(|v| Ok((naming::enum_member_name(v)?, v.clone())))
            .collect()
    }
}

impl ModelBase {
    /// Type defined outside the generated code
    pub fn external(name: &str, package: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            backing: Some(BackingRef::External(qualify(package, name))),
            description: None,
            external: true,
            kind: ModelKind::External,
        }
    }

    pub fn list(element: ModelId) -> Self {
        Self {
            name: "List".to_string(),
            package: COLLECTIONS_PACKAGE.to_string(),
            backing: None,
            description: None,
            external: false,
            kind: ModelKind::List(element),
        }
    }

    /// String-keyed dictionary
    pub fn dictionary(element: ModelId) -> Self {
        Self {
            name: "Map".to_string(),
            package: COLLECTIONS_PACKAGE.to_string(),
            backing: None,
            description: None,
            external: false,
            kind: ModelKind::Dictionary(element),
        }
    }

    pub fn enumeration(name: &str, package: &str, backing: BackingRef, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            backing: Some(backing),
            description: None,
            external: false,
            kind: ModelKind::Enum(EnumModel::new(values)),
        }
    }

    pub fn simple(name: &str, package: &str, backing: BackingRef) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            backing: Some(backing),
            description: None,
            external: false,
            kind: ModelKind::Simple(TypeModel::default()),
        }
    }

    pub fn resource(name: &str, package: &str, backing: BackingRef, resource: Resource) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            backing: Some(backing),
            description: None,
            external: false,
            kind: ModelKind::Resource(Box::new(resource)),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Name the type is referenced by in emitted source
    pub fn type_name(&self) -> String {
        match &self.kind {
            ModelKind::Resource(_) => Resource::class_name(&self.name),
            _ => self.name.clone(),
        }
    }

    /// Fully qualified name of the emitted (or external) type
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.type_name())
    }

    /// Composite part of simple models and resources
    pub fn type_model(&self) -> Option<&TypeModel> {
        match &self.kind {
            ModelKind::Simple(model) => Some(model),
            ModelKind::Resource(resource) => Some(&resource.type_model),
            _ => None,
        }
    }

    pub fn type_model_mut(&mut self) -> Option<&mut TypeModel> {
        match &mut self.kind {
            ModelKind::Simple(model) => Some(model),
            ModelKind::Resource(resource) => Some(&mut resource.type_model),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match &self.kind {
            ModelKind::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_resource_mut(&mut self) -> Option<&mut Resource> {
        match &mut self.kind {
            ModelKind::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumModel> {
        match &self.kind {
            ModelKind::Enum(model) => Some(model),
            _ => None,
        }
    }

    /// Element of a list or dictionary
    pub fn element_type(&self) -> Option<ModelId> {
        match self.kind {
            ModelKind::List(element) | ModelKind::Dictionary(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.element_type().is_some()
    }

    /// Whether a source file is emitted for this type
    pub fn is_generated(&self) -> bool {
        !self.external
            && matches!(
                self.kind,
                ModelKind::Enum(_) | ModelKind::Simple(_) | ModelKind::Resource(_)
            )
    }
}

pub(crate) fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}
