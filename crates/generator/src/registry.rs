//! Identity-keyed type registry
//!
//! The registry owns every [`ModelBase`] of one specification run in an
//! arena addressed by [`ModelId`]. Source models are mapped to at most one
//! arena entry through their [`BackingRef`], which is what lets mutually
//! recursive models resolve to each other instead of recursing forever.

use crate::model::{ModelBase, ModelKind};
use provisioning_generator_common::{GeneratorError, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Handle of a model in the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(usize);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of the source type a generated model represents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BackingRef {
    /// Object or enum model of the client model, by qualified name
    Model(String),
    /// Type outside the client model, by qualified name
    External(String),
}

impl fmt::Display for BackingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackingRef::Model(name) => write!(f, "model {}", name),
            BackingRef::External(name) => write!(f, "external {}", name),
        }
    }
}

/// Arena of models plus the backing reference index
#[derive(Debug, Default)]
pub struct TypeRegistry {
    models: Vec<ModelBase>,
    registered: Vec<bool>,
    by_backing: HashMap<BackingRef, ModelId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a model in the arena without registering it
    pub fn insert(&mut self, model: ModelBase) -> ModelId {
        let id = ModelId(self.models.len());
        self.models.push(model);
        self.registered.push(false);
        id
    }

    /// Register an allocated model under its backing reference
    ///
    /// Registering the same model twice, or a second model for an already
    /// registered backing reference, is a generator bug and fails.
    pub fn register(&mut self, id: ModelId) -> Result<()> {
        let model = self.models.get(id.0).ok_or_else(|| {
            GeneratorError::Registry(format!("{} was never allocated by this registry", id))
        })?;

        if self.registered[id.0] {
            return Err(GeneratorError::Registry(format!(
                "{} ({}) is already registered",
                model.name, id
            )));
        }

        if let Some(backing) = &model.backing {
            if let Some(existing) = self.by_backing.get(backing) {
                return Err(GeneratorError::Registry(format!(
                    "{} is already registered as {} ({}), cannot register {} ({})",
                    backing, self.models[existing.0].name, existing, model.name, id
                )));
            }
            self.by_backing.insert(backing.clone(), id);
        }

        self.registered[id.0] = true;
        Ok(())
    }

    /// Allocate and register in one step
    pub fn add(&mut self, model: ModelBase) -> Result<ModelId> {
        let id = self.insert(model);
        self.register(id)?;
        Ok(id)
    }

    /// Previously registered model for a backing reference
    pub fn get(&self, backing: &BackingRef) -> Option<ModelId> {
        self.by_backing.get(backing).copied()
    }

    pub fn is_registered(&self, id: ModelId) -> bool {
        self.registered.get(id.0).copied().unwrap_or(false)
    }

    /// Model behind a handle minted by this registry
    pub fn model(&self, id: ModelId) -> &ModelBase {
        &self.models[id.0]
    }

    pub fn model_mut(&mut self, id: ModelId) -> &mut ModelBase {
        &mut self.models[id.0]
    }

    /// Registered models in registration order
    pub fn registered(&self) -> impl Iterator<Item = (ModelId, &ModelBase)> {
        self.models
            .iter()
            .enumerate()
            .filter(|(i, _)| self.registered[*i])
            .map(|(i, m)| (ModelId(i), m))
    }

    /// Source-level reference to a type, e.g. `List<Map<String, Sku>>`
    pub fn type_reference(&self, id: ModelId) -> String {
        let model = self.model(id);
        match model.kind {
            ModelKind::List(element) => format!("List<{}>", self.type_reference(element)),
            ModelKind::Dictionary(element) => {
                format!("Map<String, {}>", self.type_reference(element))
            },
            _ => model.type_name(),
        }
    }

    /// Packages needed to reference the given types
    ///
    /// Descends into the properties (and base types) of simple models and
    /// resources and into collection elements. Models are visited once each,
    /// keyed by identity, so cyclic graphs terminate.
    pub fn collect_namespaces<I>(&self, types: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = ModelId>,
    {
        let mut namespaces = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut pending: Vec<ModelId> = types.into_iter().collect();

        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }

            let model = self.model(id);
            if !model.package.is_empty() {
                namespaces.insert(model.package.clone());
            }

            if let Some(element) = model.element_type() {
                pending.push(element);
            }

            if let Some(type_model) = model.type_model() {
                pending.extend(type_model.base_type);
                pending.extend(type_model.properties().iter().map(|p| p.ty));
            }
        }

        namespaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;

    fn simple(name: &str) -> ModelBase {
        ModelBase::simple(
            name,
            "com.foo.models",
            BackingRef::Model(format!("com.foo.{}", name)),
        )
    }

    #[test]
    fn test_register_same_model_twice_fails() {
        let mut registry = TypeRegistry::new();
        let id = registry.add(simple("A")).unwrap();

        let err = registry.register(id).unwrap_err();
        assert!(matches!(err, GeneratorError::Registry(_)));
    }

    #[test]
    fn test_register_same_backing_twice_fails() {
        let mut registry = TypeRegistry::new();
        registry.add(simple("A")).unwrap();

        let err = registry.add(simple("A")).unwrap_err();
        assert!(matches!(err, GeneratorError::Registry(_)));
    }

    #[test]
    fn test_get_by_backing() {
        let mut registry = TypeRegistry::new();
        let id = registry.add(simple("A")).unwrap();

        assert_eq!(
            registry.get(&BackingRef::Model("com.foo.A".to_string())),
            Some(id)
        );
        assert_eq!(registry.get(&BackingRef::Model("com.foo.B".to_string())), None);
    }

    #[test]
    fn test_unregistered_collections_are_not_indexed() {
        let mut registry = TypeRegistry::new();
        let string = registry
            .add(ModelBase::external("String", "java.lang"))
            .unwrap();
        let list = registry.insert(ModelBase::list(string));

        assert!(!registry.is_registered(list));
        assert_eq!(registry.registered().count(), 1);
    }

    #[test]
    fn test_type_reference_nesting() {
        let mut registry = TypeRegistry::new();
        let string = registry
            .add(ModelBase::external("String", "java.lang"))
            .unwrap();
        let inner = registry.insert(ModelBase::list(string));
        let outer = registry.insert(ModelBase::list(inner));
        let dict = registry.insert(ModelBase::dictionary(outer));

        assert_eq!(registry.type_reference(outer), "List<List<String>>");
        assert_eq!(
            registry.type_reference(dict),
            "Map<String, List<List<String>>>"
        );
    }

    #[test]
    fn test_collect_namespaces_self_referential_list() {
        let mut registry = TypeRegistry::new();
        let node = registry.add(simple("Node")).unwrap();
        let children = registry.insert(ModelBase::list(node));
        registry
            .model_mut(node)
            .type_model_mut()
            .unwrap()
            .add_property(Property::new("children", children));

        let namespaces = registry.collect_namespaces([node]);
        assert_eq!(
            namespaces.into_iter().collect::<Vec<_>>(),
            vec!["com.foo.models".to_string(), "java.util".to_string()]
        );
    }

    #[test]
    fn test_collect_namespaces_mutual_recursion() {
        let mut registry = TypeRegistry::new();
        let a = registry.add(simple("A")).unwrap();
        let b = registry.add(simple("B")).unwrap();
        let time = registry
            .add(ModelBase::external("OffsetDateTime", "java.time"))
            .unwrap();
        registry
            .model_mut(a)
            .type_model_mut()
            .unwrap()
            .add_property(Property::new("b", b));
        let b_model = registry.model_mut(b).type_model_mut().unwrap();
        b_model.add_property(Property::new("a", a));
        b_model.add_property(Property::new("createdAt", time));

        let namespaces = registry.collect_namespaces([a]);
        assert_eq!(namespaces.len(), 2);
        assert!(namespaces.contains("com.foo.models"));
        assert!(namespaces.contains("java.time"));
    }
}
