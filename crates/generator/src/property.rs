//! Properties of composite types

use crate::model::ModelKind;
use crate::naming;
use crate::registry::{ModelId, TypeRegistry};
use std::hash::{Hash, Hasher};

/// One field of a [`TypeModel`](crate::TypeModel)
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub ty: ModelId,
    pub description: Option<String>,
    /// Location of the field inside the wire payload, outermost first
    pub path: Vec<String>,
    pub read_only: bool,
    pub required: bool,
    pub secure: bool,
    /// Initialize a nested model property with a fresh instance
    pub generate_default: bool,
    /// Emit the field without public accessors
    pub hide_accessors: bool,
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.ty.hash(state);
    }
}

impl Property {
    /// Property whose wire path is its own name
    pub fn new(name: impl Into<String>, ty: ModelId) -> Self {
        let name = name.into();
        Self {
            path: vec![name.clone()],
            name,
            ty,
            description: None,
            read_only: false,
            required: false,
            secure: false,
            generate_default: false,
            hide_accessors: false,
        }
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Name of the backing field, e.g. `_accessTier`
    pub fn field_name(&self) -> String {
        format!("_{}", naming::to_camel_case(&self.name))
    }

    /// Accessor suffix, e.g. `AccessTier` for `getAccessTier`
    pub fn accessor_name(&self) -> String {
        naming::to_pascal_case(&self.name)
    }

    /// Declared type of the backing field
    ///
    /// Collections become `BicepList`/`BicepDictionary` of their element;
    /// everything else is wrapped in a `BicepValue`.
    pub fn bicep_type_reference(&self, registry: &TypeRegistry) -> String {
        bicep_reference(registry, self.ty)
    }

    /// Plain type accepted by the convenience setter
    pub fn plain_type_reference(&self, registry: &TypeRegistry) -> String {
        registry.type_reference(self.ty)
    }

    /// Right-hand side initializing the backing field
    pub fn bicep_definition(&self, registry: &TypeRegistry) -> String {
        let path = self
            .path
            .iter()
            .map(|segment| format!("\"{}\"", segment))
            .collect::<Vec<_>>()
            .join(", ");

        let name = naming::to_pascal_case(&self.name);
        let collection = match registry.model(self.ty).kind {
            ModelKind::List(_) => Some("BicepList"),
            ModelKind::Dictionary(_) => Some("BicepDictionary"),
            _ => None,
        };

        // Collections have no secure flag and no default value
        match collection {
            Some(wrapper) => format!(
                "{}.defineProperty(this, \"{}\", new String[] {{ {} }}, {}, {})",
                wrapper, name, path, self.read_only, self.required
            ),
            None => format!(
                "BicepValue.defineProperty(this, \"{}\", new String[] {{ {} }}, {}, {}, {}, {})",
                name,
                path,
                self.read_only,
                self.required,
                self.secure,
                self.default_value(registry)
            ),
        }
    }

    /// Default argument of a `BicepValue` definition
    fn default_value(&self, registry: &TypeRegistry) -> String {
        match registry.model(self.ty).kind {
            ModelKind::Simple(_) if self.generate_default => {
                format!("new {}()", registry.type_reference(self.ty))
            },
            _ => "null".to_string(),
        }
    }
}

fn bicep_reference(registry: &TypeRegistry, id: ModelId) -> String {
    let model = registry.model(id);
    let (wrapper, element) = match model.kind {
        ModelKind::List(element) => ("BicepList", element),
        ModelKind::Dictionary(element) => ("BicepDictionary", element),
        _ => return format!("BicepValue<{}>", model.type_name()),
    };

    let element_reference = if registry.model(element).is_collection() {
        bicep_reference(registry, element)
    } else {
        registry.type_reference(element)
    };
    format!("{}<{}>", wrapper, element_reference)
}
