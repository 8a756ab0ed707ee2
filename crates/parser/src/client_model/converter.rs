//! Converts a client model document to the ClientModel IR

use super::types::{ClientModelDocument, ModelEntry, PropertyEntry, TypeEntry};
use crate::TypeMapper;
use provisioning_generator_common::{
    ClientModel, CreateOperation, Discriminator, GeneratorError, Result, SourceModel,
    SourceModelKind, SourceProperty, SourceResource, WireType,
};
use std::collections::HashMap;
use tracing::warn;

/// Convert a client model document to ClientModel
pub fn convert_document(doc: &ClientModelDocument) -> Result<ClientModel> {
    let names = NameIndex::build(doc)?;

    let models = doc
        .models
        .iter()
        .map(|entry| convert_model(doc, &names, entry))
        .collect::<Result<Vec<_>>>()?;

    let resources = doc
        .resources
        .iter()
        .map(|entry| {
            let model = names.resolve(&entry.model)?.ok_or_else(|| {
                GeneratorError::Parse(format!(
                    "Resource references unknown model '{}'",
                    entry.model
                ))
            })?;
            Ok(SourceResource {
                model,
                create: entry.create.as_ref().map(|c| CreateOperation {
                    path: c.path.clone(),
                }),
                description: entry.description.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ClientModel {
        provider: doc.provider.clone(),
        package: doc.package.clone(),
        resources,
        models,
    })
}

/// Lookup of model names, simple and qualified
struct NameIndex {
    qualified: HashMap<String, usize>,
    simple: HashMap<String, Vec<String>>,
}

impl NameIndex {
    fn build(doc: &ClientModelDocument) -> Result<Self> {
        let mut qualified = HashMap::new();
        let mut simple: HashMap<String, Vec<String>> = HashMap::new();

        for (i, entry) in doc.models.iter().enumerate() {
            let name = qualify(doc, entry);
            if qualified.insert(name.clone(), i).is_some() {
                return Err(GeneratorError::Parse(format!(
                    "Duplicate model definition '{}'",
                    name
                )));
            }
            simple.entry(entry.name.clone()).or_default().push(name);
        }

        Ok(Self { qualified, simple })
    }

    /// Resolve a simple or qualified name to a qualified one
    fn resolve(&self, name: &str) -> Result<Option<String>> {
        if self.qualified.contains_key(name) {
            return Ok(Some(name.to_string()));
        }
        match self.simple.get(name).map(Vec::as_slice) {
            Some([only]) => Ok(Some(only.clone())),
            Some(candidates) if candidates.len() > 1 => Err(GeneratorError::Parse(format!(
                "Ambiguous model reference '{}' (candidates: {})",
                name,
                candidates.join(", ")
            ))),
            _ => Ok(None),
        }
    }
}

fn qualify(doc: &ClientModelDocument, entry: &ModelEntry) -> String {
    let package = entry.package.as_deref().unwrap_or(&doc.package);
    if package.is_empty() {
        entry.name.clone()
    } else {
        format!("{}.{}", package, entry.name)
    }
}

fn convert_model(
    doc: &ClientModelDocument,
    names: &NameIndex,
    entry: &ModelEntry,
) -> Result<SourceModel> {
    let kind = match &entry.values {
        Some(values) => {
            if !entry.properties.is_empty() {
                return Err(GeneratorError::Parse(format!(
                    "Enum '{}' cannot declare properties",
                    entry.name
                )));
            }
            SourceModelKind::Enum {
                values: values.clone(),
            }
        },
        None => {
            let properties = entry
                .properties
                .iter()
                .map(|p| convert_property(names, p))
                .collect::<Result<Vec<_>>>()?;
            let base = match &entry.base {
                Some(base) => Some(resolve_or_keep(names, base)?),
                None => None,
            };
            SourceModelKind::Object {
                properties,
                base,
                discriminator: entry.discriminator.as_ref().map(|d| Discriminator {
                    property: d.property.clone(),
                    value: d.value.clone(),
                }),
            }
        },
    };

    Ok(SourceModel {
        name: entry.name.clone(),
        package: entry
            .package
            .clone()
            .unwrap_or_else(|| doc.package.clone()),
        description: entry.description.clone(),
        kind,
    })
}

fn convert_property(names: &NameIndex, entry: &PropertyEntry) -> Result<SourceProperty> {
    let ty = match &entry.ty {
        TypeEntry::Expression(expr) => resolve_references(names, TypeMapper::map_type(expr))?,
        TypeEntry::External { name, package } => WireType::External {
            name: name.clone(),
            package: package.clone(),
        },
    };

    Ok(SourceProperty {
        name: entry.name.clone(),
        serialized_name: entry
            .serialized_name
            .clone()
            .unwrap_or_else(|| entry.name.clone()),
        ty,
        required: entry.required,
        read_only: entry.read_only,
        secure: entry
            .secure
            .unwrap_or_else(|| TypeMapper::is_sensitive(&entry.name)),
        flatten: entry.flatten,
        description: entry.description.clone(),
    })
}

/// Rewrite model references inside a wire type to qualified names
fn resolve_references(names: &NameIndex, ty: WireType) -> Result<WireType> {
    Ok(match ty {
        WireType::Model(name) => WireType::Model(resolve_or_keep(names, &name)?),
        WireType::List(element) => WireType::List(Box::new(resolve_references(names, *element)?)),
        WireType::Map(value) => WireType::Map(Box::new(resolve_references(names, *value)?)),
        other => other,
    })
}

fn resolve_or_keep(names: &NameIndex, name: &str) -> Result<String> {
    match names.resolve(name)? {
        Some(qualified) => Ok(qualified),
        None => {
            warn!(model = name, "reference to a model missing from the document");
            Ok(name.to_string())
        },
    }
}
